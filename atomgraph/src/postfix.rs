//! Infix to postfix conversion
//!
//! A shunting-yard pass over the token list. Smaller precedence values
//! bind tighter; an operator pops every pending entry whose value is less
//! than or equal to its own, which makes all binary operators
//! left-associative.
//!
//! A call name emits an `OpenMarker` into the output so the builder knows
//! where its arguments begin, and stays on the pending stack until its
//! closing parenthesis (or the next operator, when written without one).

use atomgraph_core::{AtomError, ArithOp, CompareOp, LogicOp};
use atomgraph_registry::AtomRegistry;

/// Pending call names are flushed by any operator that follows them
const CALL_PRECEDENCE: u16 = 1;
const COMMA_PRECEDENCE: u16 = 15;
const OPEN_PAREN_PRECEDENCE: u16 = 1023;

/// Unary and binary operators of the expression language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Negate,
    Not,
    Mul,
    Div,
    Mod,
    Add,
    Sub,
    Gt,
    Ge,
    Lt,
    Le,
    Eq,
    Ne,
    And,
    Or,
}

/// Node shape an operator produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorShape {
    Negate,
    Not,
    Arithmetic(ArithOp),
    Logical(LogicOp),
    Relational(CompareOp),
}

impl Operator {
    /// Operator spelled by `token`. `-` always reads as subtraction here;
    /// the converter decides when it is a negation.
    pub fn from_token(token: &str) -> Option<Self> {
        let op = match token {
            "!" => Operator::Not,
            "*" => Operator::Mul,
            "/" => Operator::Div,
            "%" => Operator::Mod,
            "+" => Operator::Add,
            "-" => Operator::Sub,
            ">" => Operator::Gt,
            ">=" => Operator::Ge,
            "<" => Operator::Lt,
            "<=" => Operator::Le,
            "==" => Operator::Eq,
            "!=" => Operator::Ne,
            "&&" => Operator::And,
            "||" => Operator::Or,
            _ => return None,
        };
        Some(op)
    }

    pub fn precedence(self) -> u16 {
        match self {
            Operator::Negate | Operator::Not => 2,
            Operator::Mul | Operator::Div | Operator::Mod => 3,
            Operator::Add | Operator::Sub => 4,
            Operator::Gt | Operator::Ge | Operator::Lt | Operator::Le => 6,
            Operator::Eq | Operator::Ne => 7,
            Operator::And => 11,
            Operator::Or => 12,
        }
    }

    pub fn is_unary(self) -> bool {
        matches!(self, Operator::Negate | Operator::Not)
    }

    pub fn symbol(self) -> &'static str {
        match self.shape() {
            OperatorShape::Negate => "-",
            OperatorShape::Not => "!",
            OperatorShape::Arithmetic(op) => op.symbol(),
            OperatorShape::Logical(op) => op.symbol(),
            OperatorShape::Relational(op) => op.symbol(),
        }
    }

    pub fn shape(self) -> OperatorShape {
        match self {
            Operator::Negate => OperatorShape::Negate,
            Operator::Not => OperatorShape::Not,
            Operator::Mul => OperatorShape::Arithmetic(ArithOp::Mul),
            Operator::Div => OperatorShape::Arithmetic(ArithOp::Div),
            Operator::Mod => OperatorShape::Arithmetic(ArithOp::Mod),
            Operator::Add => OperatorShape::Arithmetic(ArithOp::Add),
            Operator::Sub => OperatorShape::Arithmetic(ArithOp::Sub),
            Operator::Gt => OperatorShape::Relational(CompareOp::Gt),
            Operator::Ge => OperatorShape::Relational(CompareOp::Ge),
            Operator::Lt => OperatorShape::Relational(CompareOp::Lt),
            Operator::Le => OperatorShape::Relational(CompareOp::Le),
            Operator::Eq => OperatorShape::Relational(CompareOp::Eq),
            Operator::Ne => OperatorShape::Relational(CompareOp::Ne),
            Operator::And => OperatorShape::Logical(LogicOp::And),
            Operator::Or => OperatorShape::Logical(LogicOp::Or),
        }
    }
}

/// One instruction of the postfix program
#[derive(Debug, Clone, PartialEq)]
pub enum Instr {
    /// Literal or bare-name token, classified by the builder
    Operand(String),
    Operator(Operator),
    /// Bind everything above the nearest marker to this atom
    Call(String),
    /// Start of a call's argument list
    OpenMarker,
}

enum Pending {
    Operator(Operator),
    OpenParen,
    Call(String),
}

impl Pending {
    fn precedence(&self) -> u16 {
        match self {
            Pending::Operator(op) => op.precedence(),
            Pending::OpenParen => OPEN_PAREN_PRECEDENCE,
            Pending::Call(_) => CALL_PRECEDENCE,
        }
    }

    /// Output instruction for a popped entry; `None` for a parenthesis
    fn into_instr(self) -> Option<Instr> {
        match self {
            Pending::Operator(op) => Some(Instr::Operator(op)),
            Pending::Call(name) => Some(Instr::Call(name)),
            Pending::OpenParen => None,
        }
    }
}

/// Convert infix tokens to a postfix program.
///
/// Tokens naming a registered atom become calls; every other non-operator
/// token passes through as an operand.
pub fn to_postfix(tokens: &[String], registry: &AtomRegistry) -> Result<Vec<Instr>, AtomError> {
    let mut output = Vec::with_capacity(tokens.len() + 4);
    let mut stack: Vec<Pending> = Vec::new();
    let mut prev: Option<&str> = None;

    for token in tokens {
        let tok = token.as_str();
        match tok {
            "(" => stack.push(Pending::OpenParen),
            ")" => {
                loop {
                    match stack.pop() {
                        Some(Pending::OpenParen) => break,
                        Some(entry) => output.extend(entry.into_instr()),
                        None => return Err(AtomError::mismatched_parens().with_token(")")),
                    }
                }
                if matches!(stack.last(), Some(Pending::Call(_))) {
                    output.extend(stack.pop().and_then(Pending::into_instr));
                }
            }
            "," => pop_while(&mut stack, &mut output, COMMA_PRECEDENCE),
            _ => {
                if let Some(op) = Operator::from_token(tok) {
                    let op = if op == Operator::Sub && starts_operand(prev) {
                        Operator::Negate
                    } else {
                        op
                    };
                    // `!` goes straight onto the stack; `-` (as negation)
                    // still pops pending unary operators first.
                    if op != Operator::Not {
                        pop_while(&mut stack, &mut output, op.precedence());
                    }
                    stack.push(Pending::Operator(op));
                } else if registry.is_call(tok) {
                    stack.push(Pending::Call(tok.to_string()));
                    output.push(Instr::OpenMarker);
                } else {
                    output.push(Instr::Operand(tok.to_string()));
                }
            }
        }
        prev = Some(tok);
    }

    while let Some(entry) = stack.pop() {
        match entry.into_instr() {
            Some(instr) => output.push(instr),
            None => return Err(AtomError::mismatched_parens().with_token("(")),
        }
    }

    Ok(output)
}

fn pop_while(stack: &mut Vec<Pending>, output: &mut Vec<Instr>, precedence: u16) {
    while stack.last().is_some_and(|top| top.precedence() <= precedence) {
        output.extend(stack.pop().and_then(Pending::into_instr));
    }
}

/// A `-` here begins an operand rather than subtracting one
fn starts_operand(prev: Option<&str>) -> bool {
    match prev {
        None | Some("(") | Some(",") => true,
        Some(token) => Operator::from_token(token).is_some(),
    }
}
