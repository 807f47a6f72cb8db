//! Atomgraph - expression compiler for game atom graphs
//!
//! Turns expression text such as `Heal(Self(), GetAttr(MaxHealth) * 0.02)`
//! into a graph of typed atom nodes and renders graphs back to text. The
//! pipeline is tokenize, infix to postfix, then graph building; every step
//! reads atom shapes from an `AtomRegistry`.

mod bind;
mod builder;
mod postfix;
mod render;
mod simplify;
mod tokenizer;

pub use builder::{classify, GraphBuilder};
pub use postfix::{to_postfix, Instr, Operator, OperatorShape};
pub use render::Deparser;
pub use simplify::{ConstantFolder, NoFold, Simplifier};
pub use tokenizer::tokenize;

pub use atomgraph_core::{codes, AtomError, Node, Value};
pub use atomgraph_registry::{global, AtomRegistry, RegistryError};

use std::sync::Arc;
use tracing::{debug, trace};

/// Main compiler engine
#[derive(Clone)]
pub struct AtomCompiler {
    registry: Arc<AtomRegistry>,
    simplifier: Arc<dyn Simplifier>,
}

impl AtomCompiler {
    pub fn new(registry: AtomRegistry) -> Self {
        Self::from_shared(Arc::new(registry))
    }

    pub fn from_shared(registry: Arc<AtomRegistry>) -> Self {
        Self {
            registry,
            simplifier: Arc::new(NoFold),
        }
    }

    pub fn with_standard_library() -> Result<Self, RegistryError> {
        Ok(Self::new(atomgraph_std::standard_registry()?))
    }

    pub fn with_simplifier(mut self, simplifier: impl Simplifier + 'static) -> Self {
        self.simplifier = Arc::new(simplifier);
        self
    }

    pub fn registry(&self) -> &AtomRegistry {
        &self.registry
    }

    pub fn simplifier_name(&self) -> &'static str {
        self.simplifier.name()
    }

    pub fn tokenize(&self, text: &str) -> Result<Vec<String>, AtomError> {
        tokenize(text).map_err(|e| e.with_expression(text))
    }

    /// Parse expression text; a lone literal yields a bare value
    pub fn parse(&self, text: &str) -> Result<Value, AtomError> {
        parse_with(&self.registry, self.simplifier.as_ref(), text)
    }

    /// Parse expression text that must produce a node
    pub fn parse_node(&self, text: &str) -> Result<Node, AtomError> {
        require_node(self.parse(text)?, text)
    }

    pub fn render(&self, value: &Value) -> String {
        Deparser::new(&self.registry).render_value(value)
    }

    pub fn render_node(&self, node: &Node) -> String {
        Deparser::new(&self.registry).render(node)
    }
}

/// Parse against the process-wide registry
pub fn parse(text: &str) -> Result<Value, AtomError> {
    let registry = global::current()?;
    parse_with(&registry, &NoFold, text)
}

/// Parse against the process-wide registry, requiring a node
pub fn parse_node(text: &str) -> Result<Node, AtomError> {
    require_node(parse(text)?, text)
}

/// Render against the process-wide registry
pub fn render(node: &Node) -> Result<String, AtomError> {
    let registry = global::current()?;
    Ok(Deparser::new(&registry).render(node))
}

fn parse_with(registry: &AtomRegistry, simplifier: &dyn Simplifier, text: &str) -> Result<Value, AtomError> {
    debug!(expression = text, simplifier = simplifier.name(), "parsing expression");
    let run = || {
        let tokens = tokenize(text)?;
        trace!(?tokens, "tokenized");
        let program = to_postfix(&tokens, registry)?;
        trace!(?program, "postfix program");
        GraphBuilder::new(registry, simplifier).build(program)
    };
    run().map_err(|e| {
        debug!(code = %e.code, "parse failed");
        e.with_expression(text)
    })
}

fn require_node(value: Value, text: &str) -> Result<Node, AtomError> {
    value.into_node()
        .map_err(|bare| AtomError::not_a_node(&bare.to_string()).with_expression(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use atomgraph_core::{ArithOp, CallNode, CompareOp, LogicOp};

    fn compiler() -> AtomCompiler {
        AtomCompiler::with_standard_library().unwrap()
    }

    fn num(n: f64) -> Node {
        Node::constant(n)
    }

    fn node(text: &str) -> Node {
        compiler().parse_node(text).unwrap()
    }

    fn error_code(text: &str) -> String {
        compiler().parse(text).unwrap_err().code
    }

    fn assert_roundtrip(text: &str) {
        let c = compiler();
        let first = c.parse_node(text).unwrap();
        let rendered = c.render_node(&first);
        let second = c.parse_node(&rendered)
            .unwrap_or_else(|e| panic!("re-parse of `{}` failed: {}", rendered, e));
        assert_eq!(first, second, "`{}` rendered as `{}`", text, rendered);
    }

    mod precedence_tests {
        use super::*;

        #[test]
        fn test_mul_binds_tighter_than_add() {
            let expected = Node::arithmetic(
                num(1.0),
                ArithOp::Add,
                Node::arithmetic(num(2.0), ArithOp::Mul, num(3.0)),
            );
            assert_eq!(node("1 + 2 * 3"), expected);
            assert_eq!(node("1 + (2 * 3)"), expected);
        }

        #[test]
        fn test_parens_override() {
            let expected = Node::arithmetic(
                Node::arithmetic(num(1.0), ArithOp::Add, num(2.0)),
                ArithOp::Mul,
                num(3.0),
            );
            assert_eq!(node("(1 + 2) * 3"), expected);
        }

        #[test]
        fn test_subtraction_is_left_associative() {
            let expected = Node::arithmetic(
                Node::arithmetic(num(1.0), ArithOp::Sub, num(2.0)),
                ArithOp::Sub,
                num(3.0),
            );
            assert_eq!(node("1 - 2 - 3"), expected);
        }

        #[test]
        fn test_comparison_then_logic() {
            let expected = Node::logical(
                Node::relational(num(1.0), CompareOp::Lt, num(2.0)),
                LogicOp::Or,
                Node::logical(
                    Node::relational(num(3.0), CompareOp::Ge, num(4.0)),
                    LogicOp::And,
                    Node::relational(num(5.0), CompareOp::Eq, num(5.0)),
                ),
            );
            assert_eq!(node("1 < 2 || 3 >= 4 && 5 == 5"), expected);
        }

        #[test]
        fn test_call_without_parens_ends_at_operator() {
            let expected = Node::relational(
                CallNode::new("ActorSelf").into(),
                CompareOp::Eq,
                CallNode::new("ActorTarget").into(),
            );
            assert_eq!(node("Self()==Target"), expected);
            assert!(compiler().parse("Self()!=Target").is_ok());
        }
    }

    mod unary_tests {
        use super::*;

        #[test]
        fn test_leading_minus_negates() {
            assert_eq!(node("-5"), Node::negate(num(5.0)));
            assert_eq!(node("3 * -5"), Node::arithmetic(num(3.0), ArithOp::Mul, Node::negate(num(5.0))));
            assert_eq!(node("3 - 5"), Node::arithmetic(num(3.0), ArithOp::Sub, num(5.0)));
        }

        #[test]
        fn test_minus_after_comma_negates() {
            let max = node("Max(-5, 3)");
            let call = max.as_call().unwrap();
            assert_eq!(call.get("A"), Some(&Value::from(Node::negate(num(5.0)))));
            assert_eq!(call.get("B"), Some(&Value::from(num(3.0))));
        }

        #[test]
        fn test_negate_binds_tighter_than_mul() {
            let expected = Node::arithmetic(Node::negate(num(2.0)), ArithOp::Mul, num(3.0));
            assert_eq!(node("-2 * 3"), expected);
        }

        #[test]
        fn test_double_not() {
            assert_eq!(node("!!true"), Node::not(Node::not(Node::boolean(true))));
            assert_eq!(
                node("!true && false"),
                Node::logical(Node::not(Node::boolean(true)), LogicOp::And, Node::boolean(false))
            );
        }

        #[test]
        fn test_double_negate_needs_parens() {
            assert_eq!(error_code("--5"), codes::MISSING_OPERAND);
            assert_eq!(error_code("- -5"), codes::MISSING_OPERAND);
            assert_eq!(node("-(-5)"), Node::negate(Node::negate(num(5.0))));
        }

        // `!` is pushed without popping pending operators, `-` is not
        #[test]
        fn test_not_and_negate_stack_asymmetrically() {
            assert_eq!(node("-!true"), Node::negate(Node::not(Node::boolean(true))));
            assert_eq!(error_code("!-5"), codes::MISSING_OPERAND);
            assert_eq!(node("!(-5)"), Node::not(Node::negate(num(5.0))));
        }
    }

    mod call_tests {
        use super::*;

        #[test]
        fn test_every_team_choice_parses_unquoted() {
            let c = compiler();
            let nearest = c.registry().resolve_call("Nearest").unwrap();
            let teams: Vec<String> = nearest.fields[0].description
                .replace(" or ", ", ")
                .split(", ")
                .map(str::to_string)
                .collect();
            assert_eq!(teams, vec!["Ally", "Enemy", "Anyone"]);
            for team in &teams {
                let node = c.parse_node(&format!("Nearest({}, 5)", team))
                    .unwrap_or_else(|e| panic!("team {} failed: {}", team, e));
                let call = node.as_call().unwrap();
                assert_eq!(call.get("Team"), Some(&Value::Text(team.clone())));
            }
        }

        #[test]
        fn test_max_renders_back_exactly() {
            let c = compiler();
            let max = c.parse_node("Max(50, 100)").unwrap();
            let expected: Node = CallNode::new("FloatMax")
                .with_field("A", num(50.0))
                .with_field("B", num(100.0))
                .into();
            assert_eq!(max, expected);
            assert_eq!(c.render_node(&max), "Max(50, 100)");
        }

        #[test]
        fn test_heal_example() {
            let c = compiler();
            let heal = c.parse_node("Heal(Self(), GetAttr(MaxHealth) * 0.02)").unwrap();
            let expected: Node = CallNode::new("ActionHeal")
                .with_field("Target", Node::from(CallNode::new("ActorSelf")))
                .with_field("Amount", Node::arithmetic(
                    CallNode::new("FloatGetAttr").with_field("Attr", "MaxHealth").into(),
                    ArithOp::Mul,
                    num(0.02),
                ))
                .into();
            assert_eq!(heal, expected);
            assert_eq!(
                c.render_node(&heal),
                "Heal(Self(), (GetAttr(\"MaxHealth\") * 0.02))"
            );
        }

        #[test]
        fn test_arity_errors() {
            let err = compiler().parse("Max(50)").unwrap_err();
            assert_eq!(err.code, codes::ARG_COUNT);
            assert_eq!(err.expression(), Some("Max(50)"));
            assert_eq!(error_code("Sum()"), codes::ARG_COUNT);
        }

        #[test]
        fn test_surplus_arguments_ignored() {
            let c = compiler();
            let max = c.parse_node("Max(1, 2, 3)").unwrap();
            assert_eq!(max.as_call().unwrap().fields.len(), 2);
            assert_eq!(c.render_node(&max), "Max(1, 2)");
            assert_eq!(c.parse_node(&c.render_node(&max)).unwrap(), max);
        }

        #[test]
        fn test_optional_fields_left_absent() {
            let attr = node("GetAttr(MaxHealth)");
            let call = attr.as_call().unwrap();
            assert_eq!(call.fields.len(), 1);
            assert_eq!(compiler().render_node(&attr), "GetAttr(\"MaxHealth\")");
        }

        #[test]
        fn test_array_field_collects_rest() {
            let c = compiler();
            let sum = c.parse_node("Sum(1, 2, Max(3, 4))").unwrap();
            let values = sum.as_call().unwrap().get("Values").unwrap().as_list().unwrap();
            assert_eq!(values.len(), 3);
            assert_eq!(c.render_node(&sum), "Sum(1, 2, Max(3, 4))");
        }

        #[test]
        fn test_empty_required_array() {
            let registry = AtomRegistry::new()
                .with_atom(atomgraph_registry::AtomDescriptor::new("Tally", "FloatTally")
                    .field(atomgraph_registry::FieldDescriptor::required("Label", atomgraph_registry::FieldKind::String).optional())
                    .field(atomgraph_registry::FieldDescriptor::array("Items", atomgraph_registry::BaseKind::Numeric)))
                .unwrap();
            let err = AtomCompiler::new(registry).parse("Tally(\"hits\")").unwrap_err();
            assert_eq!(err.code, codes::EMPTY_ARRAY);
        }

        #[test]
        fn test_optional_array_may_be_empty() {
            assert_roundtrip("Combine()");
            assert_eq!(compiler().render_node(&node("Combine()")), "Combine()");
        }

        #[test]
        fn test_primitive_fields_hold_plain_values() {
            let buff = node("AddBuff(Target(), \"Burn\", 5, true)");
            let call = buff.as_call().unwrap();
            assert_eq!(call.get("BuffId"), Some(&Value::Text("Burn".to_string())));
            assert_eq!(call.get("Duration"), Some(&Value::Number(5.0)));
            assert_eq!(call.get("Refresh"), Some(&Value::Bool(true)));
            assert_eq!(compiler().render_node(&buff), "AddBuff(Target(), \"Burn\", 5, true)");
        }

        #[test]
        fn test_negative_primitive_number() {
            let delay = node("Delay(-2, Log(\"x\"))");
            assert_eq!(delay.as_call().unwrap().get("Seconds"), Some(&Value::Number(-2.0)));
            assert_eq!(compiler().render_node(&delay), "Delay(-2, Log(\"x\"))");
        }

        #[test]
        fn test_zero_argument_calls() {
            assert_eq!(node("Self()"), Node::from(CallNode::new("ActorSelf")));
            assert_eq!(node("Self"), Node::from(CallNode::new("ActorSelf")));
            assert_eq!(compiler().render_node(&node("Self")), "Self()");
        }

        #[test]
        fn test_unknown_call_suggests_match() {
            let err = compiler().parse("Heel(Self(), 5)").unwrap_err();
            assert_eq!(err.code, codes::LEFTOVER_TOKENS);
            assert!(err.suggestion.as_deref().unwrap_or("").contains("Heal"));
            let stack = &err.context.as_ref().unwrap().stack;
            assert_eq!(stack, &vec!["Heel".to_string(), "Self()".to_string(), "5".to_string()]);
        }
    }

    mod literal_tests {
        use super::*;

        #[test]
        fn test_boolean_spellings() {
            for text in ["true", "True", "TRUE"] {
                assert_eq!(node(text), Node::boolean(true));
            }
            assert_eq!(node("FALSE"), Node::boolean(false));
        }

        #[test]
        fn test_infinity() {
            assert_eq!(node("Infinity"), num(f64::INFINITY));
        }

        #[test]
        fn test_bound_constant() {
            let c = compiler();
            let max = c.parse_node("Max({Rate}, 1)").unwrap();
            assert_eq!(max.as_call().unwrap().get("A"), Some(&Value::from(Node::bound("Rate"))));
            assert_eq!(c.render_node(&max), "Max({Rate}, 1)");
        }

        #[test]
        fn test_quoted_string_is_bare_value() {
            let c = compiler();
            assert_eq!(c.parse("\"hello\"").unwrap(), Value::Text("hello".to_string()));
            assert_eq!(c.parse("'hello'").unwrap(), Value::Text("hello".to_string()));
            let err = c.parse_node("\"hello\"").unwrap_err();
            assert_eq!(err.code, codes::NOT_A_NODE);
        }

        #[test]
        fn test_bare_name_as_operand() {
            assert_eq!(error_code("MaxHealth * 2"), codes::INVALID_OPERAND);
        }
    }

    mod lexical_tests {
        use super::*;

        #[test]
        fn test_full_width_punctuation() {
            let err = compiler().parse("Max(1，2)").unwrap_err();
            assert_eq!(err.code, codes::FORBIDDEN_CHAR);
            assert_eq!(err.token(), Some("，"));
            assert_eq!(error_code("Max（1, 2）"), codes::FORBIDDEN_CHAR);
        }

        #[test]
        fn test_assignment_rejected() {
            assert_eq!(error_code("Self()=Target"), codes::BARE_ASSIGNMENT);
        }

        #[test]
        fn test_structural_errors() {
            assert_eq!(error_code("Max(1, 2"), codes::MISMATCHED_PARENS);
            assert_eq!(error_code("1 + 2)"), codes::MISMATCHED_PARENS);
            assert_eq!(error_code("Log(\"open)"), codes::UNTERMINATED_QUOTE);
            assert_eq!(error_code(""), codes::EMPTY_EXPRESSION);
            assert_eq!(error_code("   "), codes::EMPTY_EXPRESSION);
            assert_eq!(error_code("1 +"), codes::MISSING_OPERAND);
            assert_eq!(error_code("1 2"), codes::LEFTOVER_TOKENS);
        }

        #[test]
        fn test_tokenize_attaches_expression() {
            let err = compiler().tokenize("a = b").unwrap_err();
            assert_eq!(err.expression(), Some("a = b"));
        }
    }

    mod roundtrip_tests {
        use super::*;

        #[test]
        fn test_roundtrip_expressions() {
            for text in [
                "Max(50, 100)",
                "Heal(Self(), GetAttr(MaxHealth) * 0.02)",
                "1 + 2 * 3 - 4 / 5 % 6",
                "-5 * -(2 + 3)",
                "!HasBuff(Self(), \"Stun\") && IsAlive(Target())",
                "If(Chance(0.25), Damage(Target(), 10, Fire), Log(\"miss\"))",
                "Sequence(Heal(Self(), 5), AddBuff(Self(), \"Regen\", 3), Log(\"done\"))",
                "Repeat(1.5, 3, Damage(Nearest(Enemy, 4), Clamp(GetAttr(Power, Caster()), 1, 99)))",
                "OnEvent(OnHit(), Heal(Self(), {LifeSteal}), BuffStacks(Self(), \"Rage\") >= 3)",
                "All(true, 1 < 2, !false)",
                "Delay(-2, Combine())",
            ] {
                assert_roundtrip(text);
            }
        }

        #[test]
        fn test_keyed_constant_value_normalized() {
            let c = compiler();
            let keyed = Node::Constant { value: 5.0, key: "Rate".to_string() };
            let text = c.render_node(&keyed);
            assert_eq!(c.parse_node(&text).unwrap(), Node::bound("Rate"));
        }

        #[test]
        fn test_wire_json_roundtrip() {
            let c = compiler();
            let heal = c.parse_node("Heal(Self(), Max(GetAttr(MaxHealth) * 0.02, 10))").unwrap();
            let text = serde_json::to_string(&heal).unwrap();
            assert!(text.starts_with("{\"_ClassName\":\"ActionHeal\""));
            let decoded: Node = serde_json::from_str(&text).unwrap();
            assert_eq!(decoded, heal);
            assert_eq!(c.render_node(&decoded), c.render_node(&heal));
        }

        #[test]
        fn test_infinite_interval_survives_storage() {
            let c = compiler();
            let text = "Repeat(Infinity, 3, Log(\"x\"))";
            let repeat = c.parse_node(text).unwrap();
            let json = serde_json::to_string(&repeat).unwrap();
            assert!(json.contains("\"Interval\":\"Infinity\""), "{}", json);
            let decoded: Node = serde_json::from_str(&json).unwrap();
            assert_eq!(decoded, repeat);
            assert_eq!(c.render_node(&decoded), text);
        }
    }

    mod simplifier_tests {
        use super::*;

        #[test]
        fn test_default_keeps_graph_as_written() {
            let c = compiler();
            assert_eq!(c.simplifier_name(), "none");
            assert_eq!(
                c.parse_node("1 + 2").unwrap(),
                Node::arithmetic(num(1.0), ArithOp::Add, num(2.0))
            );
        }

        #[test]
        fn test_constant_folding_opt_in() {
            let c = compiler().with_simplifier(ConstantFolder);
            assert_eq!(c.parse_node("1 + 2 * 3").unwrap(), num(7.0));
            assert_eq!(c.parse_node("!(1 > 2)").unwrap(), Node::boolean(true));
            let max = c.parse_node("Max(1 + 1, {Rate} * 2)").unwrap();
            let call = max.as_call().unwrap();
            assert_eq!(call.get("A"), Some(&Value::from(num(2.0))));
            assert!(matches!(call.get("B").and_then(Value::as_node), Some(Node::Arithmetic { .. })));
        }

        #[test]
        fn test_folding_keeps_division_by_zero() {
            let c = compiler().with_simplifier(ConstantFolder);
            assert_eq!(
                c.parse_node("1 / 0").unwrap(),
                Node::arithmetic(num(1.0), ArithOp::Div, num(0.0))
            );
        }
    }

    // Only test in this crate that touches the process-wide registry.
    #[test]
    fn test_global_parse_and_render() {
        global::uninstall();
        let err = parse("Max(1, 2)").unwrap_err();
        assert_eq!(err.code, codes::REGISTRY_NOT_INITIALIZED);
        assert!(render(&num(1.0)).is_err());

        global::install(atomgraph_std::standard_registry().unwrap());
        let max = parse_node("Max(1, 2)").unwrap();
        assert_eq!(render(&max).unwrap(), "Max(1, 2)");
        assert_eq!(parse("'x'").unwrap(), Value::Text("x".to_string()));

        global::uninstall();
    }
}
