//! Runtime type checks run before an operator or a branch sees its operands.

use super::error::{ErrorKind, Side};
use crate::ast::{BinaryOp, UnaryOp};
use crate::values::Value;

fn type_error(
    operation: impl ToString,
    side: Option<Side>,
    expected: &'static str,
    got: &Value,
) -> ErrorKind {
    ErrorKind::TypeError {
        operation: operation.to_string(),
        side,
        expected,
        got: got.type_name(),
    }
}

pub(super) fn check_unary(op: UnaryOp, value: &Value) -> Result<(), ErrorKind> {
    match (op, value) {
        (UnaryOp::Neg, Value::Number(_)) | (UnaryOp::Not, Value::Bool(_)) => Ok(()),
        (UnaryOp::Neg, _) => Err(type_error(op, None, "number", value)),
        (UnaryOp::Not, _) => Err(type_error(op, None, "boolean", value)),
    }
}

/// `+` and the comparisons accept two numbers or two strings; the remaining
/// arithmetic wants numbers; strict equality takes anything.
pub(super) fn check_binary(op: BinaryOp, left: &Value, right: &Value) -> Result<(), ErrorKind> {
    match op {
        BinaryOp::StrictEq | BinaryOp::StrictNeq => Ok(()),
        BinaryOp::Add | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            match (left, right) {
                (Value::Number(_), Value::Number(_)) | (Value::Str(_), Value::Str(_)) => Ok(()),
                (Value::Number(_) | Value::Str(_), _) => Err(type_error(
                    op,
                    Some(Side::Right),
                    left.type_name(),
                    right,
                )),
                _ => Err(type_error(op, Some(Side::Left), "string or number", left)),
            }
        }
        BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => match (left, right) {
            (Value::Number(_), Value::Number(_)) => Ok(()),
            (Value::Number(_), _) => Err(type_error(op, Some(Side::Right), "number", right)),
            _ => Err(type_error(op, Some(Side::Left), "number", left)),
        },
    }
}

/// Tests of `if`, `?:`, `&&` and `||` must be booleans.
pub(super) fn check_condition(
    value: &Value,
    operation: &str,
    side: Option<Side>,
) -> Result<bool, ErrorKind> {
    value
        .as_bool()
        .ok_or_else(|| type_error(operation, side, "boolean", value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_add_accepts_matching_primitives() {
        assert!(check_binary(BinaryOp::Add, &Value::Number(1.0), &Value::Number(2.0)).is_ok());
        assert!(check_binary(BinaryOp::Add, &Value::str("a"), &Value::str("b")).is_ok());
    }

    #[test]
    fn test_add_mismatch_blames_right() {
        let err = check_binary(BinaryOp::Add, &Value::Number(1.0), &Value::str("b")).unwrap_err();
        assert_eq!(
            err,
            ErrorKind::TypeError {
                operation: "+".to_string(),
                side: Some(Side::Right),
                expected: "number",
                got: "string",
            }
        );
    }

    #[test]
    fn test_arithmetic_blames_left_first() {
        let err = check_binary(BinaryOp::Mul, &Value::Bool(true), &Value::Null).unwrap_err();
        assert!(matches!(
            err,
            ErrorKind::TypeError {
                side: Some(Side::Left),
                got: "boolean",
                ..
            }
        ));
    }

    #[test]
    fn test_equality_accepts_anything() {
        assert!(check_binary(BinaryOp::StrictEq, &Value::Null, &Value::str("x")).is_ok());
    }

    #[test]
    fn test_unary_and_condition() {
        assert!(check_unary(UnaryOp::Neg, &Value::Number(1.0)).is_ok());
        assert!(check_unary(UnaryOp::Not, &Value::Number(1.0)).is_err());
        assert_eq!(check_condition(&Value::Bool(true), "if statement", None), Ok(true));
        assert!(check_condition(&Value::Number(0.0), "if statement", None).is_err());
    }
}
