//! Binary and unary operator implementations.
//!
//! Operands are assumed to have passed the runtime type checks in
//! [`rttc`](super::rttc). Anything else is still handled without panicking:
//! non-numbers read as `NaN`.

use crate::ast::{BinaryOp, UnaryOp};
use crate::values::Value;

pub(super) fn eval_unary(op: UnaryOp, value: &Value) -> Value {
    match op {
        UnaryOp::Neg => Value::Number(-number(value)),
        UnaryOp::Not => Value::Bool(!value.as_bool().unwrap_or(false)),
    }
}

pub(super) fn eval_binary(op: BinaryOp, left: &Value, right: &Value) -> Value {
    match op {
        BinaryOp::StrictEq => Value::Bool(left == right),
        BinaryOp::StrictNeq => Value::Bool(left != right),
        BinaryOp::Add => match (left, right) {
            (Value::Str(a), Value::Str(b)) => Value::from(format!("{a}{b}")),
            _ => Value::Number(number(left) + number(right)),
        },
        BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => {
            Value::Number(eval_arithmetic(op, number(left), number(right)))
        }
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => match (left, right) {
            (Value::Str(a), Value::Str(b)) => Value::Bool(compare(op, a, b)),
            _ => Value::Bool(compare(op, &number(left), &number(right))),
        },
    }
}

/// Follows IEEE 754 semantics: division by zero gives an infinity and `%`
/// keeps the sign of the dividend.
fn eval_arithmetic(op: BinaryOp, left: f64, right: f64) -> f64 {
    match op {
        BinaryOp::Add => left + right,
        BinaryOp::Sub => left - right,
        BinaryOp::Mul => left * right,
        BinaryOp::Div => left / right,
        BinaryOp::Rem => left % right,
        _ => f64::NAN,
    }
}

fn compare<T: PartialOrd + ?Sized>(op: BinaryOp, left: &T, right: &T) -> bool {
    match op {
        BinaryOp::Lt => left < right,
        BinaryOp::Le => left <= right,
        BinaryOp::Gt => left > right,
        BinaryOp::Ge => left >= right,
        _ => false,
    }
}

fn number(value: &Value) -> f64 {
    value.as_number().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(value: f64) -> Value {
        Value::Number(value)
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(eval_binary(BinaryOp::Add, &n(2.0), &n(3.0)), n(5.0));
        assert_eq!(eval_binary(BinaryOp::Sub, &n(3.0), &n(10.0)), n(-7.0));
        assert_eq!(eval_binary(BinaryOp::Mul, &n(-2.0), &n(5.0)), n(-10.0));
        assert_eq!(eval_binary(BinaryOp::Div, &n(7.0), &n(2.0)), n(3.5));
    }

    #[test]
    fn test_remainder_keeps_dividend_sign() {
        assert_eq!(eval_binary(BinaryOp::Rem, &n(7.0), &n(3.0)), n(1.0));
        assert_eq!(eval_binary(BinaryOp::Rem, &n(-7.0), &n(3.0)), n(-1.0));
    }

    #[test]
    fn test_div_by_zero() {
        let result = eval_binary(BinaryOp::Div, &n(10.0), &n(0.0));
        let result = result.as_number().unwrap();
        assert!(result.is_infinite() && result.is_sign_positive());
    }

    #[test]
    fn test_string_concat_and_compare() {
        let a = Value::str("ab");
        let b = Value::str("b");
        assert_eq!(eval_binary(BinaryOp::Add, &a, &b), Value::str("abb"));
        assert_eq!(eval_binary(BinaryOp::Lt, &a, &b), Value::Bool(true));
        assert_eq!(eval_binary(BinaryOp::Ge, &a, &b), Value::Bool(false));
    }

    #[test]
    fn test_strict_equality() {
        assert_eq!(eval_binary(BinaryOp::StrictEq, &n(1.0), &n(1.0)), Value::Bool(true));
        assert_eq!(
            eval_binary(BinaryOp::StrictEq, &n(1.0), &Value::str("1")),
            Value::Bool(false)
        );
        assert_eq!(
            eval_binary(BinaryOp::StrictNeq, &Value::Null, &Value::Undefined),
            Value::Bool(true)
        );
    }

    #[test]
    fn test_unary() {
        assert_eq!(eval_unary(UnaryOp::Neg, &n(4.0)), n(-4.0));
        assert_eq!(eval_unary(UnaryOp::Not, &Value::Bool(true)), Value::Bool(false));
    }
}
