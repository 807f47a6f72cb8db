//! Process-wide registry
//!
//! The registry is installed once and then only read. Reinstalling swaps
//! the whole registry; parses already holding the previous `Arc` finish
//! against it, so callers must quiesce parsing first if they need every
//! parse to observe the new table.

use crate::AtomRegistry;
use atomgraph_core::AtomError;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;

static GLOBAL: RwLock<Option<Arc<AtomRegistry>>> = RwLock::new(None);

/// Install `registry` as the process-wide registry, replacing any previous one
pub fn install(registry: AtomRegistry) -> Arc<AtomRegistry> {
    let shared = Arc::new(registry);
    let previous = GLOBAL.write()
        .unwrap_or_else(PoisonError::into_inner)
        .replace(Arc::clone(&shared));
    info!(atoms = shared.len(), replaced = previous.is_some(), "atom registry installed");
    shared
}

/// Currently installed registry
pub fn current() -> Result<Arc<AtomRegistry>, AtomError> {
    GLOBAL.read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
        .ok_or_else(AtomError::registry_not_initialized)
}

pub fn is_installed() -> bool {
    GLOBAL.read().unwrap_or_else(PoisonError::into_inner).is_some()
}

/// Remove the installed registry, returning it
pub fn uninstall() -> Option<Arc<AtomRegistry>> {
    GLOBAL.write().unwrap_or_else(PoisonError::into_inner).take()
}
