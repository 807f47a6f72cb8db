//! Atomgraph Core - Fundamental types
//!
//! This crate provides the core types shared by the parser, the deparser
//! and the registry:
//! - `Node`: one element of an atom graph, also the wire unit
//! - `Value`: field values and parse results
//! - `AtomError`: structured errors with codes and context

mod error;
mod node;
mod value;
mod wire;

pub use error::{codes, AtomError, ErrorCategory, ErrorContext};
pub use node::{fields, tags, ArithOp, CallNode, CompareOp, LogicOp, Node};
pub use value::{format_number, Value};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{AtomError, CallNode, Node, Value};
    pub use crate::{ArithOp, CompareOp, LogicOp};
    pub use crate::error::codes;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    mod node_tests {
        use super::*;

        #[test]
        fn test_builtin_wire_tags() {
            assert_eq!(Node::constant(1.0).wire_tag(), tags::NUMBER_CONST);
            assert_eq!(Node::boolean(true).wire_tag(), tags::BOOL_CONST);
            assert_eq!(Node::negate(Node::constant(1.0)).wire_tag(), tags::NEGATE);
            assert_eq!(Node::not(Node::boolean(true)).wire_tag(), tags::NOT);
            let call = Node::from(CallNode::new("FloatMax"));
            assert_eq!(call.wire_tag(), "FloatMax");
        }

        #[test]
        fn test_operator_codes() {
            assert_eq!(ArithOp::Mod.code(), 4);
            assert_eq!(ArithOp::from_code(2), Some(ArithOp::Mul));
            assert_eq!(ArithOp::from_code(9), None);
            assert_eq!(LogicOp::Or.symbol(), "||");
            assert_eq!(CompareOp::from_code(0).map(CompareOp::symbol), Some(">="));
            assert_eq!(CompareOp::Ne.code(), 5);
        }

        #[test]
        fn test_bound_constant_is_not_literal() {
            assert_eq!(Node::constant(3.0).literal_number(), Some(3.0));
            assert_eq!(Node::bound("Rate").literal_number(), None);
        }

        #[test]
        fn test_call_field_lookup() {
            let call = CallNode::new("FloatMax")
                .with_field("A", Node::constant(1.0))
                .with_field("B", 2.0);
            assert_eq!(call.get("B"), Some(&Value::Number(2.0)));
            assert!(call.get("C").is_none());
        }
    }

    mod value_tests {
        use super::*;

        #[test]
        fn test_format_number() {
            assert_eq!(format_number(50.0), "50");
            assert_eq!(format_number(0.02), "0.02");
            assert_eq!(format_number(-1.5), "-1.5");
            assert_eq!(format_number(f64::INFINITY), "Infinity");
            assert_eq!(format_number(1e20), "100000000000000000000");
        }

        #[test]
        fn test_into_node() {
            let v = Value::from(Node::boolean(false));
            assert_eq!(v.into_node(), Ok(Node::boolean(false)));
            let t = Value::from("hello");
            assert_eq!(t.clone().into_node(), Err(t));
        }
    }

    mod wire_tests {
        use super::*;

        #[test]
        fn test_constant_record() {
            let json = Node::constant(50.0).to_json();
            assert_eq!(json, json!({"_ClassName": "NumberConst", "Constant": 50, "ConstantKey": ""}));
        }

        #[test]
        fn test_class_name_written_first() {
            let text = serde_json::to_string(&Node::bound("Rate")).unwrap();
            assert!(text.starts_with(r#"{"_ClassName":"NumberConst""#), "{}", text);
        }

        #[test]
        fn test_binary_record() {
            let node = Node::arithmetic(Node::constant(1.0), ArithOp::Sub, Node::constant(0.5));
            let json = node.to_json();
            assert_eq!(json["_ClassName"], "ArithmeticOp");
            assert_eq!(json["operator"], 1);
            assert_eq!(json["rhs"]["Constant"], 0.5);
            assert_eq!(Node::from_json(&json).unwrap(), node);
        }

        #[test]
        fn test_unary_records() {
            let neg = Node::negate(Node::constant(5.0)).to_json();
            assert_eq!(neg["Operand"]["Constant"], 5);
            let not = Node::not(Node::boolean(true)).to_json();
            assert_eq!(not["Value"]["BoolConst"], true);
        }

        #[test]
        fn test_generic_record_with_list() {
            let json = json!({
                "_ClassName": "ActionSequence",
                "Actions": [
                    {"_ClassName": "ActionLog", "Message": "hi"},
                    {"_ClassName": "ActionLog", "Message": "bye", "Level": null}
                ]
            });
            let node = Node::from_json(&json).unwrap();
            let call = node.as_call().unwrap();
            let actions = call.get("Actions").and_then(Value::as_list).unwrap();
            assert_eq!(actions.len(), 2);
            let second = actions[1].as_node().and_then(Node::as_call).unwrap();
            assert!(second.get("Level").is_none());
            assert_eq!(node.to_json(), json!({
                "_ClassName": "ActionSequence",
                "Actions": [
                    {"_ClassName": "ActionLog", "Message": "hi"},
                    {"_ClassName": "ActionLog", "Message": "bye"}
                ]
            }));
        }

        #[test]
        fn test_infinity_survives() {
            let node = Node::constant(f64::INFINITY);
            let json = node.to_json();
            assert_eq!(json["Constant"], "Infinity");
            assert_eq!(Node::from_json(&json).unwrap(), node);
        }

        #[test]
        fn test_non_finite_call_field_reads_back_as_number() {
            let node = Node::from(CallNode::new("TaskRepeat")
                .with_field("Interval", Value::Number(f64::INFINITY))
                .with_field("Count", Value::Number(f64::NEG_INFINITY)));
            let json = node.to_json();
            assert_eq!(json["Interval"], "Infinity");
            assert_eq!(json["Count"], "-Infinity");
            assert_eq!(Node::from_json(&json).unwrap(), node);

            let nan = Value::from_json(&json!("NaN")).unwrap();
            assert!(matches!(nan, Value::Number(n) if n.is_nan()));
            assert_eq!(Value::from_json(&json!("Infinite")).unwrap(), Value::Text("Infinite".to_string()));
        }

        #[test]
        fn test_missing_class_name() {
            let err = Node::from_json(&json!({"Constant": 1})).unwrap_err();
            assert_eq!(err.code, codes::WIRE_FORMAT);
            assert_eq!(err.category(), ErrorCategory::Wire);
        }

        #[test]
        fn test_bad_operator_code() {
            let json = json!({
                "_ClassName": "LogicalOp",
                "lhs": {"_ClassName": "BoolConst", "BoolConst": true},
                "operator": "and",
                "rhs": {"_ClassName": "BoolConst", "BoolConst": false}
            });
            assert!(Node::from_json(&json).is_err());
        }

        #[test]
        fn test_serde_roundtrip_through_text() {
            let node = Node::from(CallNode::new("Heal")
                .with_field("Target", Node::from(CallNode::new("ActorSelf")))
                .with_field("Amount", Node::constant(0.25)));
            let text = serde_json::to_string(&node).unwrap();
            let back: Node = serde_json::from_str(&text).unwrap();
            assert_eq!(back, node);
        }
    }

    mod error_tests {
        use super::*;

        #[test]
        fn test_display_includes_expression() {
            let err = AtomError::arg_count("Max", 2, 1).with_expression("Max(1)");
            let text = err.to_string();
            assert!(text.contains("[ARG_COUNT]"));
            assert!(text.contains("Max(1)"));
            assert_eq!(err.category(), ErrorCategory::Binding);
        }

        #[test]
        fn test_expression_not_overwritten() {
            let err = AtomError::empty_expression()
                .with_expression("inner")
                .with_expression("outer");
            assert_eq!(err.expression(), Some("inner"));
        }

        #[test]
        fn test_arg_count_pluralizes() {
            assert_eq!(AtomError::arg_count("Abs", 1, 0).message, "Abs() expects at least 1 argument, got 0");
            assert_eq!(AtomError::arg_count("Max", 2, 1).message, "Max() expects at least 2 arguments, got 1");
        }

        #[test]
        fn test_forbidden_chars_lists_characters() {
            let err = AtomError::forbidden_chars(&['：', '，']);
            assert_eq!(err.token(), Some("：，"));
            assert_eq!(err.category(), ErrorCategory::Lexical);
        }

        #[test]
        fn test_serializes_without_empty_context() {
            let json = serde_json::to_value(AtomError::registry_not_initialized()).unwrap();
            assert_eq!(json["code"], "REGISTRY_NOT_INITIALIZED");
            assert!(json.get("context").is_none());
        }
    }
}
