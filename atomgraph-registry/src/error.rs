//! Registry loading errors

use atomgraph_core::AtomError;
use std::path::PathBuf;
use thiserror::Error;

/// Error raised while building or loading an atom registry
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read atom table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid atom table JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("atom '{atom}': {reason}")]
    InvalidDescriptor { atom: String, reason: String },

    #[error("call name '{0}' is registered twice")]
    DuplicateCallName(String),

    #[error("wire tag '{0}' is registered twice")]
    DuplicateWireTag(String),
}

impl From<RegistryError> for AtomError {
    fn from(err: RegistryError) -> Self {
        AtomError::registry_invalid(err.to_string())
    }
}
