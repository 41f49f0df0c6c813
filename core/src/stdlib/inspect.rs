//! Natives that describe values.

use super::expect_arity;
use crate::values::{NativeResult, Value};

/// Text of every argument, separated by spaces. Strings are not quoted.
pub fn display(args: &[Value]) -> NativeResult {
    let text: Vec<String> = args.iter().map(Value::to_text).collect();
    Ok(Value::from(text.join(" ")))
}

/// Source-like rendering of one value: strings are quoted.
pub fn stringify(args: &[Value]) -> NativeResult {
    expect_arity("stringify", args, 1)?;
    Ok(Value::from(args[0].to_string()))
}

pub fn is_number(args: &[Value]) -> NativeResult {
    expect_arity("is_number", args, 1)?;
    Ok(Value::Bool(matches!(args[0], Value::Number(_))))
}

pub fn is_string(args: &[Value]) -> NativeResult {
    expect_arity("is_string", args, 1)?;
    Ok(Value::Bool(matches!(args[0], Value::Str(_))))
}

pub fn is_boolean(args: &[Value]) -> NativeResult {
    expect_arity("is_boolean", args, 1)?;
    Ok(Value::Bool(matches!(args[0], Value::Bool(_))))
}

pub fn is_function(args: &[Value]) -> NativeResult {
    expect_arity("is_function", args, 1)?;
    Ok(Value::Bool(args[0].is_function()))
}

pub fn is_undefined(args: &[Value]) -> NativeResult {
    expect_arity("is_undefined", args, 1)?;
    Ok(Value::Bool(args[0].is_undefined()))
}
