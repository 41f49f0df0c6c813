//! Math natives over numbers.

use super::{NativeError, expect_arity, number_arg};
use crate::values::{NativeResult, Value};

/// Absolute value.
pub fn math_abs(args: &[Value]) -> NativeResult {
    expect_arity("math_abs", args, 1)?;
    Ok(Value::Number(number_arg("math_abs", args, 0)?.abs()))
}

/// Largest integer not greater than the argument.
pub fn math_floor(args: &[Value]) -> NativeResult {
    expect_arity("math_floor", args, 1)?;
    Ok(Value::Number(number_arg("math_floor", args, 0)?.floor()))
}

/// Square root; negative input gives `NaN`.
pub fn math_sqrt(args: &[Value]) -> NativeResult {
    expect_arity("math_sqrt", args, 1)?;
    Ok(Value::Number(number_arg("math_sqrt", args, 0)?.sqrt()))
}

/// Largest of one or more numbers.
pub fn math_max(args: &[Value]) -> NativeResult {
    fold("math_max", args, f64::max)
}

/// Smallest of one or more numbers.
pub fn math_min(args: &[Value]) -> NativeResult {
    fold("math_min", args, f64::min)
}

fn fold(name: &str, args: &[Value], f: fn(f64, f64) -> f64) -> NativeResult {
    if args.is_empty() {
        return Err(NativeError(format!("{name} expects at least one argument")).into());
    }
    let mut result = number_arg(name, args, 0)?;
    for index in 1..args.len() {
        result = f(result, number_arg(name, args, index)?);
    }
    Ok(Value::Number(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn n(value: f64) -> Value {
        Value::Number(value)
    }

    #[test]
    fn test_unary_math() {
        assert_eq!(math_abs(&[n(-3.5)]).unwrap(), n(3.5));
        assert_eq!(math_floor(&[n(2.7)]).unwrap(), n(2.0));
        assert_eq!(math_floor(&[n(-2.5)]).unwrap(), n(-3.0));
        assert_eq!(math_sqrt(&[n(16.0)]).unwrap(), n(4.0));
    }

    #[test]
    fn test_max_min() {
        assert_eq!(math_max(&[n(1.0), n(7.0), n(3.0)]).unwrap(), n(7.0));
        assert_eq!(math_min(&[n(1.0), n(-7.0)]).unwrap(), n(-7.0));
        assert!(math_max(&[]).is_err());
    }

    #[test]
    fn test_rejects_non_numbers() {
        let err = math_abs(&[Value::str("x")]).unwrap_err();
        assert_eq!(err.to_string(), "math_abs expects a number, got string");
        let err = math_sqrt(&[]).unwrap_err();
        assert_eq!(err.to_string(), "math_sqrt expects 1 argument(s), got 0");
    }
}
