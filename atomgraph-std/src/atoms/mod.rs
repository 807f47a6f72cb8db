//! Standard atoms, grouped by the node family they produce

mod actions;
mod actors;
mod conditions;
mod numeric;
mod tasks;

use atomgraph_registry::AtomDescriptor;

/// Every standard atom in registration order
pub fn all() -> Vec<AtomDescriptor> {
    let mut atoms = Vec::new();
    atoms.extend(actors::atoms());
    atoms.extend(numeric::atoms());
    atoms.extend(conditions::atoms());
    atoms.extend(actions::atoms());
    atoms.extend(tasks::atoms());
    atoms
}
