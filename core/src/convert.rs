//! Conversions between runtime values and syntax tree nodes.

use crate::ast::{Literal, Node, NodeKind, Span, UnaryOp};
use crate::context::Context;
use crate::environment;
use crate::values::Value;
use std::rc::Rc;

/// Node that evaluates back to `value`, if the value has a literal form.
///
/// Negative numbers become a negation of a positive literal, as the parser
/// would produce. Functions and non-finite numbers have no literal form.
pub fn value_to_node(value: &Value, span: Span) -> Option<Node> {
    let literal = match value {
        Value::Undefined => Literal::Undefined,
        Value::Null => Literal::Null,
        Value::Bool(b) => Literal::Bool(*b),
        Value::Number(n) if !n.is_finite() => return None,
        Value::Number(n) if n.is_sign_negative() && *n != 0.0 => {
            let positive = Node::literal(Literal::Number(-n), span.clone());
            return Some(Node::new(
                NodeKind::Unary {
                    operator: UnaryOp::Neg,
                    argument: Rc::new(positive),
                },
                span,
            ));
        }
        Value::Number(n) => Literal::Number(*n),
        Value::Str(s) => Literal::Str(s.to_string()),
        Value::Closure(_) | Value::Native(_) => return None,
    };
    Some(Node::literal(literal, span))
}

/// Value of a literal node, a negated number literal, or an identifier
/// naming a native bound in the global frame.
pub fn node_to_value(node: &Node, context: &Context) -> Option<Value> {
    match &node.kind {
        NodeKind::Literal(literal) => Some(Value::from(literal)),
        NodeKind::Unary {
            operator: UnaryOp::Neg,
            argument,
        } => match &argument.kind {
            NodeKind::Literal(Literal::Number(n)) => Some(Value::Number(-n)),
            _ => None,
        },
        NodeKind::Identifier(name) => match environment::lookup(context.global(), name) {
            Ok(native @ Value::Native(_)) => Some(native),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::EvaluatorOptions;
    use pretty_assertions::assert_eq;

    fn span() -> Span {
        Span::new(0, 0)
    }

    #[test]
    fn test_primitives_round_trip() {
        let context = Context::default();
        for value in [
            Value::Undefined,
            Value::Null,
            Value::Bool(true),
            Value::Number(2.5),
            Value::Number(-4.0),
            Value::str("hi"),
        ] {
            let node = value_to_node(&value, span()).unwrap();
            assert_eq!(node_to_value(&node, &context), Some(value));
        }
    }

    #[test]
    fn test_negative_number_renders_as_negation() {
        let node = value_to_node(&Value::Number(-4.0), span()).unwrap();
        assert_eq!(node.to_string(), "(- 4)");
    }

    #[test]
    fn test_no_literal_form() {
        assert!(value_to_node(&Value::Number(f64::NAN), span()).is_none());
        let context = Context::with_prelude(EvaluatorOptions::default());
        let identifier = Node::new(NodeKind::Identifier("math_abs".into()), span());
        let native = node_to_value(&identifier, &context).unwrap();
        assert!(value_to_node(&native, span()).is_none());
    }

    #[test]
    fn test_identifier_must_name_global_native() {
        let context = Context::with_prelude(EvaluatorOptions::default());
        let native = Node::new(NodeKind::Identifier("display".into()), span());
        assert_eq!(
            node_to_value(&native, &context).map(|value| value.to_string()),
            Some("[Native display]".to_string())
        );

        let unknown = Node::new(NodeKind::Identifier("x".into()), span());
        assert_eq!(node_to_value(&unknown, &context), None);
    }
}
