//! Structured compile errors
//!
//! Every failure in the parse/render pipeline is reported as an `AtomError`
//! value carrying a machine-readable code, a human-readable message and,
//! where available, the expression and token that caused it. Nothing in the
//! pipeline panics on user input.

use serde::{Deserialize, Serialize};

/// Standard error codes (machine-readable)
pub mod codes {
    // Lexical
    pub const FORBIDDEN_CHAR: &str = "FORBIDDEN_CHAR";
    pub const BARE_ASSIGNMENT: &str = "BARE_ASSIGNMENT";
    pub const UNTERMINATED_QUOTE: &str = "UNTERMINATED_QUOTE";
    // Structural
    pub const MISMATCHED_PARENS: &str = "MISMATCHED_PARENS";
    pub const LEFTOVER_TOKENS: &str = "LEFTOVER_TOKENS";
    pub const MISSING_OPERAND: &str = "MISSING_OPERAND";
    pub const INVALID_OPERAND: &str = "INVALID_OPERAND";
    pub const EMPTY_EXPRESSION: &str = "EMPTY_EXPRESSION";
    pub const NOT_A_NODE: &str = "NOT_A_NODE";
    // Binding
    pub const ARG_COUNT: &str = "ARG_COUNT";
    pub const EMPTY_ARRAY: &str = "EMPTY_ARRAY";
    // Resolution
    pub const REGISTRY_NOT_INITIALIZED: &str = "REGISTRY_NOT_INITIALIZED";
    pub const REGISTRY_INVALID: &str = "REGISTRY_INVALID";
    // Wire
    pub const WIRE_FORMAT: &str = "WIRE_FORMAT";
}

/// Broad family an error code belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Lexical,
    Structural,
    Binding,
    Resolution,
    Wire,
}

/// Where in the input an error occurred
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Expression text handed to the parser
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,

    /// Offending token or characters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Residual evaluation stack, rendered one entry per item
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub stack: Vec<String>,
}

/// Structured error returned by every fallible operation in the workspace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomError {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    /// Where the error occurred
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ErrorContext>,
}

impl AtomError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            suggestion: None,
            context: None,
        }
    }

    /// Builder: add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Builder: attach the expression being parsed (kept if already set)
    pub fn with_expression(mut self, expression: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::default);
        if ctx.expression.is_none() {
            ctx.expression = Some(expression.into());
        }
        self
    }

    /// Builder: attach the offending token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::default);
        ctx.token = Some(token.into());
        self
    }

    /// Builder: attach the residual stack
    pub fn with_stack(mut self, stack: Vec<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::default);
        ctx.stack = stack;
        self
    }

    pub fn category(&self) -> ErrorCategory {
        match self.code.as_str() {
            codes::FORBIDDEN_CHAR | codes::BARE_ASSIGNMENT | codes::UNTERMINATED_QUOTE => {
                ErrorCategory::Lexical
            }
            codes::ARG_COUNT | codes::EMPTY_ARRAY => ErrorCategory::Binding,
            codes::REGISTRY_NOT_INITIALIZED | codes::REGISTRY_INVALID => ErrorCategory::Resolution,
            codes::WIRE_FORMAT => ErrorCategory::Wire,
            _ => ErrorCategory::Structural,
        }
    }

    pub fn expression(&self) -> Option<&str> {
        self.context.as_ref().and_then(|c| c.expression.as_deref())
    }

    pub fn token(&self) -> Option<&str> {
        self.context.as_ref().and_then(|c| c.token.as_deref())
    }

    // ========== Lexical ==========

    pub fn forbidden_chars(found: &[char]) -> Self {
        let listed: String = found.iter().collect();
        Self::new(codes::FORBIDDEN_CHAR,
            format!("Expression contains full-width punctuation: {}", listed))
            .with_token(listed)
            .with_suggestion("Replace full-width colons, commas, quotes and parentheses with ASCII ones")
    }

    pub fn bare_assignment() -> Self {
        Self::new(codes::BARE_ASSIGNMENT, "Found '=' outside of a comparison operator")
            .with_token("=")
            .with_suggestion("Use '==' to compare; assignment is not part of the language")
    }

    pub fn unterminated_quote() -> Self {
        Self::new(codes::UNTERMINATED_QUOTE, "String literal is missing its closing '\"'")
            .with_token("\"")
    }

    // ========== Structural ==========

    pub fn mismatched_parens() -> Self {
        Self::new(codes::MISMATCHED_PARENS, "Mismatched parentheses")
            .with_suggestion("Check that every '(' has a matching ')'")
    }

    pub fn leftover_tokens(stack: Vec<String>) -> Self {
        Self::new(codes::LEFTOVER_TOKENS,
            format!("Expression did not reduce to a single value, left with: [{}]", stack.join(", ")))
            .with_stack(stack)
            .with_suggestion("Check for unknown function names or missing operators")
    }

    pub fn missing_operand(operator: &str) -> Self {
        Self::new(codes::MISSING_OPERAND, format!("Operator '{}' is missing an operand", operator))
            .with_token(operator)
    }

    pub fn invalid_operand(operator: &str, found: &str) -> Self {
        Self::new(codes::INVALID_OPERAND,
            format!("Operator '{}' cannot be applied to bare value '{}'", operator, found))
            .with_token(found)
            .with_suggestion("Operands must be numbers, booleans, bound constants or calls")
    }

    pub fn empty_expression() -> Self {
        Self::new(codes::EMPTY_EXPRESSION, "Empty expression")
    }

    pub fn not_a_node(found: &str) -> Self {
        Self::new(codes::NOT_A_NODE, format!("Expression produced a bare value, not a node: {}", found))
            .with_token(found)
    }

    // ========== Binding ==========

    pub fn arg_count(call: &str, expected: usize, got: usize) -> Self {
        Self::new(codes::ARG_COUNT,
            format!("{}() expects at least {} argument{}, got {}",
                call, expected, if expected == 1 { "" } else { "s" }, got))
            .with_token(call)
    }

    pub fn empty_array(call: &str, field: &str) -> Self {
        Self::new(codes::EMPTY_ARRAY,
            format!("{}() array field '{}' requires at least one element", call, field))
            .with_token(call)
    }

    // ========== Resolution ==========

    pub fn registry_not_initialized() -> Self {
        Self::new(codes::REGISTRY_NOT_INITIALIZED, "Atom registry not initialized")
            .with_suggestion("Install a registry before parsing or rendering")
    }

    pub fn registry_invalid(details: impl Into<String>) -> Self {
        Self::new(codes::REGISTRY_INVALID, format!("Invalid atom registry: {}", details.into()))
    }

    // ========== Wire ==========

    pub fn wire_format(details: impl Into<String>) -> Self {
        Self::new(codes::WIRE_FORMAT, format!("Malformed node record: {}", details.into()))
    }
}

impl std::fmt::Display for AtomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(expression) = self.expression() {
            write!(f, " in `{}`", expression)?;
        }
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for AtomError {}
