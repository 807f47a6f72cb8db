//! Postfix program to atom graph
//!
//! Runs the postfix program against an evaluation stack. Literal tokens are
//! classified on the way in, operators pop their operands, and a call pops
//! everything above its marker and binds it to the atom's fields.

use crate::bind::bind;
use crate::postfix::{Instr, Operator, OperatorShape};
use crate::render::Deparser;
use crate::simplify::Simplifier;
use atomgraph_core::{AtomError, Node, Value};
use atomgraph_registry::AtomRegistry;
use regex::Regex;
use std::sync::OnceLock;
use tracing::trace;

fn bound_key_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\{(\w+)\}$").unwrap())
}

fn number_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[+-]?\d+(\.\d+)?$").unwrap())
}

/// Classify a literal token
pub fn classify(token: &str) -> Value {
    if let Some(caps) = bound_key_pattern().captures(token) {
        return Value::from(Node::bound(&caps[1]));
    }
    if token == "Infinity" {
        return Value::from(Node::constant(f64::INFINITY));
    }
    if number_pattern().is_match(token) {
        if let Ok(n) = token.parse::<f64>() {
            return Value::from(Node::constant(n));
        }
    }
    match token {
        "true" | "True" | "TRUE" => return Value::from(Node::boolean(true)),
        "false" | "False" | "FALSE" => return Value::from(Node::boolean(false)),
        _ => {}
    }
    Value::Text(unquote(token).unwrap_or(token).to_string())
}

/// Inner text of a `'...'` or `"..."` token
fn unquote(token: &str) -> Option<&str> {
    ['"', '\''].into_iter().find_map(|q| {
        token.strip_prefix(q)
            .and_then(|rest| rest.strip_suffix(q))
    })
}

enum Item {
    Value(Value),
    Marker,
}

/// Builds one graph from one postfix program
pub struct GraphBuilder<'a> {
    registry: &'a AtomRegistry,
    simplifier: &'a dyn Simplifier,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(registry: &'a AtomRegistry, simplifier: &'a dyn Simplifier) -> Self {
        Self { registry, simplifier }
    }

    pub fn build(&self, program: Vec<Instr>) -> Result<Value, AtomError> {
        let mut stack: Vec<Item> = Vec::new();

        for instr in program {
            match instr {
                Instr::Operand(token) => stack.push(Item::Value(classify(&token))),
                Instr::OpenMarker => stack.push(Item::Marker),
                Instr::Operator(op) => {
                    let node = self.apply(op, &mut stack)?;
                    let node = self.simplifier.simplify(&node).unwrap_or(node);
                    stack.push(Item::Value(node.into()));
                }
                Instr::Call(name) => {
                    let node = self.call(&name, &mut stack)?;
                    stack.push(Item::Value(node.into()));
                }
            }
        }

        match stack.len() {
            0 => Err(AtomError::empty_expression()),
            1 => match stack.pop() {
                Some(Item::Value(value)) => Ok(value),
                _ => Err(AtomError::mismatched_parens()),
            },
            _ => Err(self.leftover(&stack)),
        }
    }

    fn apply(&self, op: Operator, stack: &mut Vec<Item>) -> Result<Node, AtomError> {
        let node = match op.shape() {
            OperatorShape::Negate => Node::negate(pop_operand(op, stack)?),
            OperatorShape::Not => Node::not(pop_operand(op, stack)?),
            OperatorShape::Arithmetic(code) => {
                let (lhs, rhs) = pop_pair(op, stack)?;
                Node::arithmetic(lhs, code, rhs)
            }
            OperatorShape::Logical(code) => {
                let (lhs, rhs) = pop_pair(op, stack)?;
                Node::logical(lhs, code, rhs)
            }
            OperatorShape::Relational(code) => {
                let (lhs, rhs) = pop_pair(op, stack)?;
                Node::relational(lhs, code, rhs)
            }
        };
        Ok(node)
    }

    fn call(&self, name: &str, stack: &mut Vec<Item>) -> Result<Node, AtomError> {
        let mut args = Vec::new();
        loop {
            match stack.pop() {
                Some(Item::Marker) => break,
                Some(Item::Value(value)) => args.push(value),
                None => return Err(AtomError::mismatched_parens().with_token(name)),
            }
        }
        args.reverse();

        let atom = self.registry.resolve_call(name)
            .ok_or_else(|| AtomError::leftover_tokens(vec![name.to_string()]))?;
        trace!(call = name, args = args.len(), "binding call");
        bind(atom, args)
    }

    fn leftover(&self, stack: &[Item]) -> AtomError {
        let deparser = Deparser::new(self.registry);
        let listed: Vec<String> = stack.iter()
            .map(|item| match item {
                Item::Value(Value::Text(text)) => text.clone(),
                Item::Value(value) => deparser.render_value(value),
                Item::Marker => "(".to_string(),
            })
            .collect();

        let mut err = AtomError::leftover_tokens(listed);
        let unknown = stack.iter().find_map(|item| match item {
            Item::Value(Value::Text(text)) => Some(text.as_str()),
            _ => None,
        });
        if let Some(name) = unknown {
            let similar = self.registry.similar_names(name);
            if let Some(best) = similar.first() {
                err = err.with_suggestion(format!("Unknown call '{}'. Did you mean {}?", name, best));
            }
        }
        err
    }
}

fn pop_pair(op: Operator, stack: &mut Vec<Item>) -> Result<(Node, Node), AtomError> {
    let rhs = pop_operand(op, stack)?;
    let lhs = pop_operand(op, stack)?;
    Ok((lhs, rhs))
}

fn pop_operand(op: Operator, stack: &mut Vec<Item>) -> Result<Node, AtomError> {
    match stack.pop() {
        Some(Item::Value(value)) => value.into_node()
            .map_err(|bare| AtomError::invalid_operand(op.symbol(), &bare.to_string())),
        Some(Item::Marker) | None => Err(AtomError::missing_operand(op.symbol())),
    }
}
