//! Boolean conditions

use atomgraph_registry::prelude::*;

const CATEGORY: &str = "condition";

pub fn atoms() -> Vec<AtomDescriptor> {
    vec![
        AtomDescriptor::new("HasBuff", "BoolHasBuff")
            .field(FieldDescriptor::node("Actor", BaseKind::Actor))
            .field(FieldDescriptor::required("BuffId", FieldKind::String))
            .describe("True if the actor carries the buff")
            .in_category(CATEGORY),
        AtomDescriptor::new("IsAlive", "BoolIsAlive")
            .field(FieldDescriptor::node("Actor", BaseKind::Actor))
            .in_category(CATEGORY),
        AtomDescriptor::new("Chance", "BoolChance")
            .field(FieldDescriptor::node("Probability", BaseKind::Numeric).describe("0 to 1"))
            .describe("True with the given probability")
            .in_category(CATEGORY),
        AtomDescriptor::new("All", "BoolAll")
            .field(FieldDescriptor::array("Conditions", BaseKind::Boolean))
            .describe("True if every condition holds")
            .in_category(CATEGORY),
        AtomDescriptor::new("Any", "BoolAny")
            .field(FieldDescriptor::array("Conditions", BaseKind::Boolean))
            .describe("True if any condition holds")
            .in_category(CATEGORY),
    ]
}
