//! Actor and event selectors

use atomgraph_registry::prelude::*;

const CATEGORY: &str = "actor";

pub fn atoms() -> Vec<AtomDescriptor> {
    vec![
        AtomDescriptor::new("Self", "ActorSelf")
            .describe("The actor that owns the running skill")
            .in_category(CATEGORY),
        AtomDescriptor::new("Target", "ActorTarget")
            .describe("The current target of the running skill")
            .in_category(CATEGORY),
        AtomDescriptor::new("Caster", "ActorCaster")
            .describe("The actor that applied the current buff")
            .in_category(CATEGORY),
        AtomDescriptor::new("Nearest", "ActorNearest")
            .field(FieldDescriptor::required("Team", FieldKind::Choice).describe("Ally, Enemy or Anyone"))
            .field(FieldDescriptor::node("Range", BaseKind::Numeric).optional())
            .describe("Closest actor of the given team")
            .in_category(CATEGORY),
        AtomDescriptor::new("OnHit", "EventOnHit")
            .describe("Raised when the owner lands a hit")
            .in_category("event"),
        AtomDescriptor::new("OnDamaged", "EventOnDamaged")
            .describe("Raised when the owner takes damage")
            .in_category("event"),
    ]
}
