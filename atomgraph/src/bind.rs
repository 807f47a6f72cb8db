//! Positional argument binding
//!
//! Arguments are assigned to an atom's fields in declaration order. A
//! trailing array field takes every remaining argument. Each value passes
//! through the coercion table on its way in. Arguments past the last field
//! of an atom without an array field are dropped.

use atomgraph_core::{AtomError, CallNode, Node, Value};
use atomgraph_registry::{AtomDescriptor, BaseKind, FieldDescriptor, FieldKind};
use tracing::warn;

type Coercion = fn(Value) -> Value;

/// Bind call arguments to `atom`'s fields
pub fn bind(atom: &AtomDescriptor, args: Vec<Value>) -> Result<Node, AtomError> {
    let required = atom.required_count();
    if args.len() < required {
        return Err(AtomError::arg_count(&atom.call_name, required, args.len())
            .with_suggestion(format!("Usage: {}", atom.usage())));
    }

    let mut call = CallNode::new(&atom.wire_tag);
    let mut args = args.into_iter();

    for field in &atom.fields {
        if field.kind.is_array() {
            let items: Vec<Value> = args.by_ref().map(|v| coerce(field, v)).collect();
            if items.is_empty() {
                if field.optional {
                    continue;
                }
                return Err(AtomError::empty_array(&atom.call_name, &field.key));
            }
            call.fields.push((field.key.clone(), Value::List(items)));
            continue;
        }
        match args.next() {
            Some(value) => call.fields.push((field.key.clone(), coerce(field, value))),
            None => break,
        }
    }

    let surplus = args.len();
    if surplus > 0 {
        warn!(call = %atom.call_name, surplus, "ignoring arguments past the last field");
    }

    Ok(Node::Call(call))
}

fn coerce(field: &FieldDescriptor, value: Value) -> Value {
    let convert = if field.kind.takes_node() {
        field.base.and_then(node_wrapper)
    } else {
        primitive_unwrapper(field.kind)
    };
    match convert {
        Some(f) => f(value),
        None => value,
    }
}

/// Wrapping for nested-node fields, keyed by node family
fn node_wrapper(base: BaseKind) -> Option<Coercion> {
    match base {
        BaseKind::Numeric => Some(wrap_number),
        BaseKind::Boolean => Some(wrap_bool),
        _ => None,
    }
}

/// Primitive fields take the literal back out of a constant node
fn primitive_unwrapper(kind: FieldKind) -> Option<Coercion> {
    match kind {
        FieldKind::Number => Some(unwrap_number),
        FieldKind::Bool => Some(unwrap_bool),
        _ => None,
    }
}

fn wrap_number(value: Value) -> Value {
    match value {
        Value::Number(n) => Node::constant(n).into(),
        other => other,
    }
}

fn wrap_bool(value: Value) -> Value {
    match value {
        Value::Bool(b) => Node::boolean(b).into(),
        other => other,
    }
}

fn unwrap_number(value: Value) -> Value {
    let literal = match value.as_node() {
        Some(Node::Negate(inner)) => inner.literal_number().map(|n| -n),
        Some(node) => node.literal_number(),
        None => None,
    };
    match literal {
        Some(n) => Value::Number(n),
        None => value,
    }
}

fn unwrap_bool(value: Value) -> Value {
    match value.as_node().and_then(Node::literal_bool) {
        Some(b) => Value::Bool(b),
        None => value,
    }
}
