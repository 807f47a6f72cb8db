//! Numeric formulas

use atomgraph_registry::prelude::*;

const CATEGORY: &str = "numeric";

fn pair(call: &str, tag: &str, description: &str) -> AtomDescriptor {
    AtomDescriptor::new(call, tag)
        .field(FieldDescriptor::node("A", BaseKind::Numeric))
        .field(FieldDescriptor::node("B", BaseKind::Numeric))
        .describe(description)
        .in_category(CATEGORY)
}

pub fn atoms() -> Vec<AtomDescriptor> {
    vec![
        pair("Max", "FloatMax", "Larger of two values"),
        pair("Min", "FloatMin", "Smaller of two values"),
        AtomDescriptor::new("Abs", "FloatAbs")
            .field(FieldDescriptor::node("Value", BaseKind::Numeric))
            .describe("Absolute value")
            .in_category(CATEGORY),
        AtomDescriptor::new("Clamp", "FloatClamp")
            .field(FieldDescriptor::node("Value", BaseKind::Numeric))
            .field(FieldDescriptor::node("Low", BaseKind::Numeric))
            .field(FieldDescriptor::node("High", BaseKind::Numeric))
            .describe("Value limited to [Low, High]")
            .in_category(CATEGORY),
        AtomDescriptor::new("Random", "FloatRandom")
            .field(FieldDescriptor::node("Low", BaseKind::Numeric))
            .field(FieldDescriptor::node("High", BaseKind::Numeric))
            .describe("Uniform random value in [Low, High)")
            .in_category(CATEGORY),
        AtomDescriptor::new("Sum", "FloatSum")
            .field(FieldDescriptor::array("Values", BaseKind::Numeric))
            .describe("Sum of every argument")
            .in_category(CATEGORY),
        AtomDescriptor::new("GetAttr", "FloatGetAttr")
            .field(FieldDescriptor::required("Attr", FieldKind::Choice).describe("Attribute name"))
            .field(FieldDescriptor::node("Actor", BaseKind::Actor).optional().describe("Defaults to Self"))
            .describe("Current value of an actor attribute")
            .in_category(CATEGORY),
        AtomDescriptor::new("BuffStacks", "FloatBuffStacks")
            .field(FieldDescriptor::node("Actor", BaseKind::Actor))
            .field(FieldDescriptor::required("BuffId", FieldKind::String))
            .describe("Stack count of a buff on an actor")
            .in_category(CATEGORY),
    ]
}
