//! Atom graph nodes
//!
//! The four built-in leaf shapes and the three binary operator shapes have
//! fixed wire tags and field names. Every other node is a `CallNode` whose
//! shape comes from its atom descriptor.

use crate::Value;

/// Wire tags of the built-in node shapes
pub mod tags {
    pub const NUMBER_CONST: &str = "NumberConst";
    pub const BOOL_CONST: &str = "BoolConst";
    pub const NEGATE: &str = "NegateNumber";
    pub const NOT: &str = "NotBool";
    pub const ARITHMETIC: &str = "ArithmeticOp";
    pub const LOGICAL: &str = "LogicalOp";
    pub const RELATIONAL: &str = "RelationalOp";
}

/// Record member names used by the built-in node shapes
pub mod fields {
    pub const CLASS_NAME: &str = "_ClassName";
    pub const CONSTANT: &str = "Constant";
    pub const CONSTANT_KEY: &str = "ConstantKey";
    pub const BOOL_CONST: &str = "BoolConst";
    pub const OPERAND: &str = "Operand";
    pub const VALUE: &str = "Value";
    pub const LHS: &str = "lhs";
    pub const OPERATOR: &str = "operator";
    pub const RHS: &str = "rhs";
}

/// Arithmetic operator codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add = 0,
    Sub = 1,
    Mul = 2,
    Div = 3,
    Mod = 4,
}

impl ArithOp {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(ArithOp::Add),
            1 => Some(ArithOp::Sub),
            2 => Some(ArithOp::Mul),
            3 => Some(ArithOp::Div),
            4 => Some(ArithOp::Mod),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
            ArithOp::Mod => "%",
        }
    }
}

/// Logical operator codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicOp {
    And = 0,
    Or = 1,
}

impl LogicOp {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(LogicOp::And),
            1 => Some(LogicOp::Or),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            LogicOp::And => "&&",
            LogicOp::Or => "||",
        }
    }
}

/// Relational operator codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Ge = 0,
    Gt = 1,
    Le = 2,
    Lt = 3,
    Eq = 4,
    Ne = 5,
}

impl CompareOp {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(CompareOp::Ge),
            1 => Some(CompareOp::Gt),
            2 => Some(CompareOp::Le),
            3 => Some(CompareOp::Lt),
            4 => Some(CompareOp::Eq),
            5 => Some(CompareOp::Ne),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Ge => ">=",
            CompareOp::Gt => ">",
            CompareOp::Le => "<=",
            CompareOp::Lt => "<",
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
        }
    }
}

/// Instance of a registered atom: wire tag plus bound fields in binding order
#[derive(Debug, Clone, PartialEq)]
pub struct CallNode {
    pub tag: String,
    pub fields: Vec<(String, Value)>,
}

impl CallNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into(), fields: Vec::new() }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push((key.into(), value.into()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

/// One node of an atom graph
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Numeric constant; a non-empty key binds it to an external table
    Constant { value: f64, key: String },
    Bool(bool),
    Negate(Box<Node>),
    Not(Box<Node>),
    Arithmetic { lhs: Box<Node>, op: u8, rhs: Box<Node> },
    Logical { lhs: Box<Node>, op: u8, rhs: Box<Node> },
    Relational { lhs: Box<Node>, op: u8, rhs: Box<Node> },
    Call(CallNode),
}

impl Node {
    pub fn constant(value: f64) -> Self {
        Node::Constant { value, key: String::new() }
    }

    /// Constant resolved from an external table at runtime
    pub fn bound(key: impl Into<String>) -> Self {
        Node::Constant { value: 0.0, key: key.into() }
    }

    pub fn boolean(value: bool) -> Self {
        Node::Bool(value)
    }

    pub fn negate(operand: Node) -> Self {
        Node::Negate(Box::new(operand))
    }

    pub fn not(operand: Node) -> Self {
        Node::Not(Box::new(operand))
    }

    pub fn arithmetic(lhs: Node, op: ArithOp, rhs: Node) -> Self {
        Node::Arithmetic { lhs: Box::new(lhs), op: op.code(), rhs: Box::new(rhs) }
    }

    pub fn logical(lhs: Node, op: LogicOp, rhs: Node) -> Self {
        Node::Logical { lhs: Box::new(lhs), op: op.code(), rhs: Box::new(rhs) }
    }

    pub fn relational(lhs: Node, op: CompareOp, rhs: Node) -> Self {
        Node::Relational { lhs: Box::new(lhs), op: op.code(), rhs: Box::new(rhs) }
    }

    pub fn wire_tag(&self) -> &str {
        match self {
            Node::Constant { .. } => tags::NUMBER_CONST,
            Node::Bool(_) => tags::BOOL_CONST,
            Node::Negate(_) => tags::NEGATE,
            Node::Not(_) => tags::NOT,
            Node::Arithmetic { .. } => tags::ARITHMETIC,
            Node::Logical { .. } => tags::LOGICAL,
            Node::Relational { .. } => tags::RELATIONAL,
            Node::Call(call) => &call.tag,
        }
    }

    pub fn as_call(&self) -> Option<&CallNode> {
        match self {
            Node::Call(call) => Some(call),
            _ => None,
        }
    }

    /// Literal number without an external binding
    pub fn literal_number(&self) -> Option<f64> {
        match self {
            Node::Constant { value, key } if key.is_empty() => Some(*value),
            _ => None,
        }
    }

    pub fn literal_bool(&self) -> Option<bool> {
        match self {
            Node::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<CallNode> for Node {
    fn from(call: CallNode) -> Self {
        Node::Call(call)
    }
}
