//! Graph simplification hook
//!
//! The builder offers every operator node it creates to a `Simplifier`
//! before pushing it. The default leaves the graph exactly as written.

use atomgraph_core::{ArithOp, CompareOp, LogicOp, Node};

/// Rewrite hook applied to freshly built operator nodes
pub trait Simplifier: Send + Sync {
    /// Replacement for `node`, or `None` to keep it unchanged
    fn simplify(&self, node: &Node) -> Option<Node>;

    fn name(&self) -> &'static str;
}

/// Keep every node as written
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFold;

impl Simplifier for NoFold {
    fn simplify(&self, _node: &Node) -> Option<Node> {
        None
    }

    fn name(&self) -> &'static str {
        "none"
    }
}

/// Collapse operators whose operands are all unbound literals.
///
/// Division and modulo by zero are left unfolded.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantFolder;

impl Simplifier for ConstantFolder {
    fn simplify(&self, node: &Node) -> Option<Node> {
        match node {
            Node::Negate(inner) => inner.literal_number().map(|n| Node::constant(-n)),
            Node::Not(inner) => inner.literal_bool().map(|b| Node::boolean(!b)),
            Node::Arithmetic { lhs, op, rhs } => {
                let (a, b) = (lhs.literal_number()?, rhs.literal_number()?);
                let value = match ArithOp::from_code(*op)? {
                    ArithOp::Add => a + b,
                    ArithOp::Sub => a - b,
                    ArithOp::Mul => a * b,
                    ArithOp::Div if b != 0.0 => a / b,
                    ArithOp::Mod if b != 0.0 => a % b,
                    ArithOp::Div | ArithOp::Mod => return None,
                };
                Some(Node::constant(value))
            }
            Node::Logical { lhs, op, rhs } => {
                let (a, b) = (lhs.literal_bool()?, rhs.literal_bool()?);
                let value = match LogicOp::from_code(*op)? {
                    LogicOp::And => a && b,
                    LogicOp::Or => a || b,
                };
                Some(Node::boolean(value))
            }
            Node::Relational { lhs, op, rhs } => {
                let op = CompareOp::from_code(*op)?;
                if let (Some(a), Some(b)) = (lhs.literal_number(), rhs.literal_number()) {
                    return Some(Node::boolean(compare(op, a, b)));
                }
                let (a, b) = (lhs.literal_bool()?, rhs.literal_bool()?);
                match op {
                    CompareOp::Eq => Some(Node::boolean(a == b)),
                    CompareOp::Ne => Some(Node::boolean(a != b)),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        "constant"
    }
}

fn compare(op: CompareOp, a: f64, b: f64) -> bool {
    match op {
        CompareOp::Ge => a >= b,
        CompareOp::Gt => a > b,
        CompareOp::Le => a <= b,
        CompareOp::Lt => a < b,
        CompareOp::Eq => a == b,
        CompareOp::Ne => a != b,
    }
}
