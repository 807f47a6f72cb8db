//! Expression renderer
//!
//! Turns an atom graph back into expression text that parses to the same
//! graph. Operator nodes are always fully parenthesized, so no precedence
//! information is needed on the way out.

use atomgraph_core::{format_number, ArithOp, CallNode, CompareOp, LogicOp, Node, Value};
use atomgraph_registry::AtomRegistry;
use tracing::warn;

/// Symbol rendered for an operator code outside the table
const FALLBACK_SYMBOL: &str = "+";

/// Graph to text renderer
pub struct Deparser<'a> {
    registry: &'a AtomRegistry,
}

impl<'a> Deparser<'a> {
    pub fn new(registry: &'a AtomRegistry) -> Self {
        Self { registry }
    }

    /// Render a node
    pub fn render(&self, node: &Node) -> String {
        match node {
            // A bound constant reads back as its key; the stored value is dropped.
            Node::Constant { key, .. } if !key.is_empty() => format!("{{{}}}", key),
            Node::Constant { value, .. } => format_number(*value),
            Node::Bool(b) => b.to_string(),
            Node::Negate(inner) => format!("-({})", self.render(inner)),
            Node::Not(inner) => format!("!({})", self.render(inner)),
            Node::Arithmetic { lhs, op, rhs } => {
                let symbol = ArithOp::from_code(*op).map_or(FALLBACK_SYMBOL, ArithOp::symbol);
                self.binary(lhs, symbol, rhs)
            }
            Node::Logical { lhs, op, rhs } => {
                let symbol = LogicOp::from_code(*op).map_or(FALLBACK_SYMBOL, LogicOp::symbol);
                self.binary(lhs, symbol, rhs)
            }
            Node::Relational { lhs, op, rhs } => {
                let symbol = CompareOp::from_code(*op).map_or(FALLBACK_SYMBOL, CompareOp::symbol);
                self.binary(lhs, symbol, rhs)
            }
            Node::Call(call) => self.render_call(call),
        }
    }

    /// Render any field value: text is double-quoted, lists are comma-joined
    pub fn render_value(&self, value: &Value) -> String {
        match value {
            Value::Number(n) => format_number(*n),
            Value::Bool(b) => b.to_string(),
            Value::Text(s) => format!("\"{}\"", s),
            Value::Node(node) => self.render(node),
            Value::List(items) => items.iter()
                .map(|item| self.render_value(item))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    fn binary(&self, lhs: &Node, symbol: &str, rhs: &Node) -> String {
        format!("({} {} {})", self.render(lhs), symbol, self.render(rhs))
    }

    fn render_call(&self, call: &CallNode) -> String {
        let Some(atom) = self.registry.resolve_tag(&call.tag) else {
            warn!(tag = %call.tag, "no atom registered for wire tag, rendering tag verbatim");
            return call.tag.clone();
        };

        let mut args = Vec::new();
        for field in &atom.fields {
            let Some(value) = call.get(&field.key) else {
                continue;
            };
            match value {
                Value::List(items) if field.kind.is_array() => {
                    args.extend(items.iter().map(|item| self.render_value(item)));
                }
                other => args.push(self.render_value(other)),
            }
        }

        format!("{}({})", atom.call_name, args.join(", "))
    }
}
