//! Actions

use atomgraph_registry::prelude::*;

const CATEGORY: &str = "action";

pub fn atoms() -> Vec<AtomDescriptor> {
    vec![
        AtomDescriptor::new("Heal", "ActionHeal")
            .field(FieldDescriptor::node("Target", BaseKind::Actor))
            .field(FieldDescriptor::node("Amount", BaseKind::Numeric))
            .describe("Restore health to an actor")
            .in_category(CATEGORY),
        AtomDescriptor::new("Damage", "ActionDamage")
            .field(FieldDescriptor::node("Target", BaseKind::Actor))
            .field(FieldDescriptor::node("Amount", BaseKind::Numeric))
            .field(FieldDescriptor::required("Element", FieldKind::Choice).optional())
            .describe("Deal damage to an actor")
            .in_category(CATEGORY),
        AtomDescriptor::new("AddBuff", "ActionAddBuff")
            .field(FieldDescriptor::node("Target", BaseKind::Actor))
            .field(FieldDescriptor::required("BuffId", FieldKind::String))
            .field(FieldDescriptor::required("Duration", FieldKind::Number).optional().describe("Seconds"))
            .field(FieldDescriptor::required("Refresh", FieldKind::Bool).optional())
            .describe("Apply a buff to an actor")
            .in_category(CATEGORY),
        AtomDescriptor::new("RemoveBuff", "ActionRemoveBuff")
            .field(FieldDescriptor::node("Target", BaseKind::Actor))
            .field(FieldDescriptor::required("BuffId", FieldKind::String))
            .in_category(CATEGORY),
        AtomDescriptor::new("If", "ActionIf")
            .field(FieldDescriptor::node("Condition", BaseKind::Boolean))
            .field(FieldDescriptor::node("Then", BaseKind::Action))
            .field(FieldDescriptor::node("Else", BaseKind::Action).optional())
            .describe("Run one of two actions depending on a condition")
            .in_category(CATEGORY),
        AtomDescriptor::new("Sequence", "ActionSequence")
            .field(FieldDescriptor::array("Actions", BaseKind::Action))
            .describe("Run actions in order")
            .in_category(CATEGORY),
        AtomDescriptor::new("Combine", "ActionCombine")
            .field(FieldDescriptor::array("Actions", BaseKind::Action).optional())
            .describe("Run several actions as one")
            .in_category(CATEGORY),
        AtomDescriptor::new("Log", "ActionLog")
            .field(FieldDescriptor::required("Message", FieldKind::String))
            .in_category(CATEGORY),
    ]
}
