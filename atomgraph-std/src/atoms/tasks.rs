//! Scheduled tasks

use atomgraph_registry::prelude::*;

const CATEGORY: &str = "task";

pub fn atoms() -> Vec<AtomDescriptor> {
    vec![
        AtomDescriptor::new("Delay", "TaskDelay")
            .field(FieldDescriptor::required("Seconds", FieldKind::Number))
            .field(FieldDescriptor::node("Action", BaseKind::Action))
            .describe("Run an action once after a delay")
            .in_category(CATEGORY),
        AtomDescriptor::new("Repeat", "TaskRepeat")
            .field(FieldDescriptor::required("Interval", FieldKind::Number))
            .field(FieldDescriptor::required("Count", FieldKind::Number))
            .field(FieldDescriptor::node("Action", BaseKind::Action))
            .describe("Run an action Count times, Interval seconds apart")
            .in_category(CATEGORY),
        AtomDescriptor::new("OnEvent", "TaskOnEvent")
            .field(FieldDescriptor::node("Event", BaseKind::Event))
            .field(FieldDescriptor::node("Action", BaseKind::Action))
            .field(FieldDescriptor::node("Filter", BaseKind::Boolean).optional())
            .describe("Run an action whenever an event fires")
            .in_category(CATEGORY),
    ]
}
