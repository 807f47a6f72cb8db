//! Atomgraph Standard Library
//!
//! A ready-made atom table covering actor selectors, numeric formulas,
//! conditions, actions and tasks. Editors normally load their own table
//! from JSON; this one backs the server's default mode and the tests.

pub mod atoms;

use atomgraph_registry::{AtomRegistry, RegistryError};

/// Load the standard atoms into `registry`
pub fn load_standard_library(mut registry: AtomRegistry) -> Result<AtomRegistry, RegistryError> {
    for atom in atoms::all() {
        registry.register(atom)?;
    }
    Ok(registry)
}

/// Create registry with the standard library
pub fn standard_registry() -> Result<AtomRegistry, RegistryError> {
    load_standard_library(AtomRegistry::new())
}
