//! Atomgraph Registry
//!
//! Metadata that drives both directions of the compiler:
//! - `AtomDescriptor` / `FieldDescriptor`: the shape of each callable atom
//! - `AtomRegistry`: lookup by call name and by wire tag
//! - `global`: the process-wide, install-once registry

mod descriptor;
mod error;
pub mod global;
mod registry;

pub use descriptor::{AtomDescriptor, BaseKind, FieldDescriptor, FieldKind};
pub use error::RegistryError;
pub use registry::{AtomRegistry, AtomTable};

/// Re-export core types for registry users
pub mod prelude {
    pub use crate::{AtomDescriptor, AtomRegistry, BaseKind, FieldDescriptor, FieldKind};
    pub use atomgraph_core::prelude::*;
}
