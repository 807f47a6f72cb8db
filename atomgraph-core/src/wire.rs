//! `_ClassName` record codec
//!
//! Nodes serialize as JSON objects whose `_ClassName` member holds the wire
//! tag and whose remaining members are the bound fields. Integral numbers
//! are written as integers; non-finite numbers as the strings `Infinity`,
//! `-Infinity` and `NaN`, and those three strings always read back as
//! numbers, in call fields as well as in constants.

use crate::node::{fields, tags};
use crate::{AtomError, CallNode, Node, Value};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value as JsonValue};

/// Largest magnitude at which every integer is exactly representable
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

struct WireNumber(f64);

impl Serialize for WireNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let n = self.0;
        if n.is_nan() {
            serializer.serialize_str("NaN")
        } else if n.is_infinite() {
            serializer.serialize_str(if n > 0.0 { "Infinity" } else { "-Infinity" })
        } else if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
            serializer.serialize_i64(n as i64)
        } else {
            serializer.serialize_f64(n)
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(fields::CLASS_NAME, self.wire_tag())?;
        match self {
            Node::Constant { value, key } => {
                map.serialize_entry(fields::CONSTANT, &WireNumber(*value))?;
                map.serialize_entry(fields::CONSTANT_KEY, key)?;
            }
            Node::Bool(b) => map.serialize_entry(fields::BOOL_CONST, b)?,
            Node::Negate(operand) => map.serialize_entry(fields::OPERAND, operand.as_ref())?,
            Node::Not(operand) => map.serialize_entry(fields::VALUE, operand.as_ref())?,
            Node::Arithmetic { lhs, op, rhs }
            | Node::Logical { lhs, op, rhs }
            | Node::Relational { lhs, op, rhs } => {
                map.serialize_entry(fields::LHS, lhs.as_ref())?;
                map.serialize_entry(fields::OPERATOR, op)?;
                map.serialize_entry(fields::RHS, rhs.as_ref())?;
            }
            Node::Call(call) => {
                for (key, value) in &call.fields {
                    map.serialize_entry(key, value)?;
                }
            }
        }
        map.end()
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Number(n) => WireNumber(*n).serialize(serializer),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Node(n) => n.serialize(serializer),
            Value::List(items) => serializer.collect_seq(items),
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = JsonValue::deserialize(deserializer)?;
        Node::from_json(&json).map_err(<D::Error as serde::de::Error>::custom)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = JsonValue::deserialize(deserializer)?;
        Value::from_json(&json).map_err(<D::Error as serde::de::Error>::custom)
    }
}

impl Node {
    pub fn to_json(&self) -> JsonValue {
        // Serializing into a JsonValue only fails for non-string map keys.
        serde_json::to_value(self).unwrap_or(JsonValue::Null)
    }

    pub fn from_json(json: &JsonValue) -> Result<Node, AtomError> {
        let obj = json.as_object()
            .ok_or_else(|| AtomError::wire_format(format!("expected an object, got {}", json)))?;
        let tag = obj.get(fields::CLASS_NAME)
            .and_then(JsonValue::as_str)
            .ok_or_else(|| AtomError::wire_format(format!("missing '{}'", fields::CLASS_NAME)))?;

        let node = match tag {
            tags::NUMBER_CONST => Node::Constant {
                value: match present(obj, fields::CONSTANT) {
                    Some(v) => number_from_json(v)?,
                    None => 0.0,
                },
                key: present(obj, fields::CONSTANT_KEY)
                    .and_then(JsonValue::as_str)
                    .unwrap_or_default()
                    .to_string(),
            },
            tags::BOOL_CONST => Node::Bool(
                present(obj, fields::BOOL_CONST).and_then(JsonValue::as_bool).unwrap_or(false),
            ),
            tags::NEGATE => Node::Negate(Box::new(child(obj, tag, fields::OPERAND)?)),
            tags::NOT => Node::Not(Box::new(child(obj, tag, fields::VALUE)?)),
            tags::ARITHMETIC => Node::Arithmetic {
                lhs: Box::new(child(obj, tag, fields::LHS)?),
                op: operator_code(obj, tag)?,
                rhs: Box::new(child(obj, tag, fields::RHS)?),
            },
            tags::LOGICAL => Node::Logical {
                lhs: Box::new(child(obj, tag, fields::LHS)?),
                op: operator_code(obj, tag)?,
                rhs: Box::new(child(obj, tag, fields::RHS)?),
            },
            tags::RELATIONAL => Node::Relational {
                lhs: Box::new(child(obj, tag, fields::LHS)?),
                op: operator_code(obj, tag)?,
                rhs: Box::new(child(obj, tag, fields::RHS)?),
            },
            _ => {
                let mut call = CallNode::new(tag);
                for (key, value) in obj {
                    if key == fields::CLASS_NAME || value.is_null() {
                        continue;
                    }
                    call.fields.push((key.clone(), Value::from_json(value)?));
                }
                Node::Call(call)
            }
        };
        Ok(node)
    }
}

impl Value {
    pub fn to_json(&self) -> JsonValue {
        serde_json::to_value(self).unwrap_or(JsonValue::Null)
    }

    pub fn from_json(json: &JsonValue) -> Result<Value, AtomError> {
        match json {
            JsonValue::Number(_) => Ok(Value::Number(number_from_json(json)?)),
            JsonValue::Bool(b) => Ok(Value::Bool(*b)),
            JsonValue::String(s) => Ok(match non_finite(s) {
                Some(n) => Value::Number(n),
                None => Value::Text(s.clone()),
            }),
            JsonValue::Object(_) => Ok(Value::Node(Box::new(Node::from_json(json)?))),
            JsonValue::Array(items) => items.iter()
                .filter(|item| !item.is_null())
                .map(Value::from_json)
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            JsonValue::Null => Err(AtomError::wire_format("null is not a value")),
        }
    }
}

fn present<'a>(obj: &'a Map<String, JsonValue>, key: &str) -> Option<&'a JsonValue> {
    obj.get(key).filter(|v| !v.is_null())
}

fn child(obj: &Map<String, JsonValue>, tag: &str, key: &str) -> Result<Node, AtomError> {
    let json = present(obj, key)
        .ok_or_else(|| AtomError::wire_format(format!("{} is missing '{}'", tag, key)))?;
    Node::from_json(json)
}

fn operator_code(obj: &Map<String, JsonValue>, tag: &str) -> Result<u8, AtomError> {
    present(obj, fields::OPERATOR)
        .and_then(JsonValue::as_u64)
        .and_then(|code| u8::try_from(code).ok())
        .ok_or_else(|| AtomError::wire_format(format!("{} has no valid '{}'", tag, fields::OPERATOR)))
}

/// The strings `WireNumber` writes for non-finite numbers
fn non_finite(text: &str) -> Option<f64> {
    match text {
        "Infinity" => Some(f64::INFINITY),
        "-Infinity" => Some(f64::NEG_INFINITY),
        "NaN" => Some(f64::NAN),
        _ => None,
    }
}

fn number_from_json(json: &JsonValue) -> Result<f64, AtomError> {
    match json {
        JsonValue::Number(n) => n.as_f64()
            .ok_or_else(|| AtomError::wire_format(format!("number out of range: {}", n))),
        JsonValue::String(s) => non_finite(s)
            .ok_or_else(|| AtomError::wire_format(format!("expected a number, got \"{}\"", s))),
        other => Err(AtomError::wire_format(format!("expected a number, got {}", other))),
    }
}
