//! Atom and field descriptors
//!
//! A descriptor is the whole shape of a callable atom: its call name, its
//! wire tag and its ordered fields. Field order is the positional argument
//! order used for both binding and rendering.

use crate::RegistryError;
use atomgraph_core::{fields, tags};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Storage kind of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    String,
    Number,
    Bool,
    /// One of a fixed set of names; stored as a string
    Choice,
    Node,
    NodeArray,
}

impl FieldKind {
    pub fn is_array(self) -> bool {
        matches!(self, FieldKind::NodeArray)
    }

    pub fn takes_node(self) -> bool {
        matches!(self, FieldKind::Node | FieldKind::NodeArray)
    }

    pub fn name(self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Bool => "bool",
            FieldKind::Choice => "choice",
            FieldKind::Node => "node",
            FieldKind::NodeArray => "node_array",
        }
    }
}

/// Node family a nested node must belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseKind {
    Numeric,
    Boolean,
    Actor,
    Event,
    Action,
    Task,
}

impl BaseKind {
    pub fn name(self) -> &'static str {
        match self {
            BaseKind::Numeric => "numeric",
            BaseKind::Boolean => "boolean",
            BaseKind::Actor => "actor",
            BaseKind::Event => "event",
            BaseKind::Action => "action",
            BaseKind::Task => "task",
        }
    }
}

/// One positional field of an atom
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub key: String,
    pub kind: FieldKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<BaseKind>,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub rest: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl FieldDescriptor {
    /// Required primitive field
    pub fn required(key: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            key: key.into(),
            kind,
            base: None,
            optional: false,
            rest: false,
            description: String::new(),
        }
    }

    /// Required nested-node field of the given family
    pub fn node(key: impl Into<String>, base: BaseKind) -> Self {
        Self { base: Some(base), ..Self::required(key, FieldKind::Node) }
    }

    /// Trailing array field that consumes every remaining argument
    pub fn array(key: impl Into<String>, base: BaseKind) -> Self {
        Self { base: Some(base), rest: true, ..Self::required(key, FieldKind::NodeArray) }
    }

    /// Builder: mark optional
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Builder: add description
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    fn usage(&self) -> String {
        match (self.kind.is_array(), self.optional) {
            (true, true) => format!("[{}...]", self.key),
            (true, false) => format!("{}...", self.key),
            (false, true) => format!("[{}]", self.key),
            (false, false) => self.key.clone(),
        }
    }
}

/// Shape of one callable atom
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomDescriptor {
    pub call_name: String,
    pub wire_tag: String,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub category: String,
}

impl AtomDescriptor {
    pub fn new(call_name: impl Into<String>, wire_tag: impl Into<String>) -> Self {
        Self {
            call_name: call_name.into(),
            wire_tag: wire_tag.into(),
            fields: Vec::new(),
            description: String::new(),
            category: String::new(),
        }
    }

    /// Builder: append the next positional field
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Number of arguments a call must supply at minimum
    pub fn required_count(&self) -> usize {
        self.fields.iter().filter(|f| !f.optional).count()
    }

    pub fn array_field(&self) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.kind.is_array())
    }

    pub fn get_field(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Call signature, e.g. `Damage(Target, Amount, [Element])`
    pub fn usage(&self) -> String {
        let args: Vec<String> = self.fields.iter().map(FieldDescriptor::usage).collect();
        format!("{}({})", self.call_name, args.join(", "))
    }

    /// Check the structural invariants binding and rendering rely on
    pub fn validate(&self) -> Result<(), RegistryError> {
        let invalid = |reason: String| RegistryError::InvalidDescriptor {
            atom: self.call_name.clone(),
            reason,
        };

        if self.call_name.trim().is_empty() {
            return Err(invalid("call name is empty".to_string()));
        }
        if !is_identifier(&self.call_name) {
            return Err(invalid(format!("call name '{}' is not an identifier", self.call_name)));
        }
        if is_literal_word(&self.call_name) {
            return Err(invalid(format!("call name '{}' always parses as a literal", self.call_name)));
        }
        if self.wire_tag.trim().is_empty() {
            return Err(invalid("wire tag is empty".to_string()));
        }
        if is_builtin_tag(&self.wire_tag) {
            return Err(invalid(format!("wire tag '{}' is reserved for a built-in node", self.wire_tag)));
        }

        let mut seen = HashSet::new();
        let last = self.fields.len().saturating_sub(1);
        for (i, field) in self.fields.iter().enumerate() {
            if field.key.is_empty() || field.key == fields::CLASS_NAME {
                return Err(invalid(format!("field {} has an unusable key '{}'", i, field.key)));
            }
            if !seen.insert(field.key.as_str()) {
                return Err(invalid(format!("field key '{}' appears twice", field.key)));
            }
            match (field.kind.takes_node(), field.base) {
                (true, None) => {
                    return Err(invalid(format!("field '{}' needs a base kind", field.key)));
                }
                (false, Some(base)) => {
                    return Err(invalid(format!(
                        "{} field '{}' cannot have base kind {}",
                        field.kind.name(), field.key, base.name()
                    )));
                }
                _ => {}
            }
            if field.kind.is_array() && i != last {
                return Err(invalid(format!("array field '{}' must be the last field", field.key)));
            }
            if field.rest && !field.kind.is_array() {
                return Err(invalid(format!("only an array field can be a rest field, not '{}'", field.key)));
            }
        }
        Ok(())
    }
}

/// Letter or underscore, then letters, digits or underscores
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Words the expression parser reads as literals before trying a call
fn is_literal_word(name: &str) -> bool {
    matches!(
        name,
        "true" | "True" | "TRUE" | "false" | "False" | "FALSE" | "Infinity"
    )
}

fn is_builtin_tag(tag: &str) -> bool {
    matches!(
        tag,
        tags::NUMBER_CONST
            | tags::BOOL_CONST
            | tags::NEGATE
            | tags::NOT
            | tags::ARITHMETIC
            | tags::LOGICAL
            | tags::RELATIONAL
    )
}
