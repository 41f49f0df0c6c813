//! Native prelude.
//!
//! The prelude is a flat set of native functions bound as constants in the
//! global frame before user code runs:
//! - Inspection: `display`, `stringify`, `is_number`, `is_string`,
//!   `is_boolean`, `is_function`, `is_undefined`
//! - Failure: `error`
//! - Math: `math_abs`, `math_floor`, `math_sqrt`, `math_max`, `math_min`
//!
//! Natives report bad arguments with [`NativeError`]; the evaluator turns
//! such errors into exception errors at the call site.

use crate::context::Context;
use crate::values::{NativeFunction, NativeResult, Value};
use thiserror::Error;

pub mod inspect;
pub mod math;

/// Error raised by a prelude native.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct NativeError(pub String);

/// Every prelude native, in installation order.
pub const PRELUDE: &[NativeFunction] = &[
    NativeFunction::new("display", inspect::display),
    NativeFunction::new("stringify", inspect::stringify),
    NativeFunction::new("is_number", inspect::is_number),
    NativeFunction::new("is_string", inspect::is_string),
    NativeFunction::new("is_boolean", inspect::is_boolean),
    NativeFunction::new("is_function", inspect::is_function),
    NativeFunction::new("is_undefined", inspect::is_undefined),
    NativeFunction::new("error", error),
    NativeFunction::new("math_abs", math::math_abs),
    NativeFunction::new("math_floor", math::math_floor),
    NativeFunction::new("math_sqrt", math::math_sqrt),
    NativeFunction::new("math_max", math::math_max),
    NativeFunction::new("math_min", math::math_min),
];

/// Binds every prelude native in the global frame.
pub fn install_prelude(context: &mut Context) {
    for native in PRELUDE {
        context.define_global(native.name(), Value::Native(*native));
    }
}

/// Always fails, with its argument as the message.
fn error(args: &[Value]) -> NativeResult {
    let message = args.first().map(Value::to_text).unwrap_or_default();
    Err(NativeError(message).into())
}

pub(crate) fn expect_arity(name: &str, args: &[Value], expected: usize) -> Result<(), NativeError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(NativeError(format!(
            "{name} expects {expected} argument(s), got {}",
            args.len()
        )))
    }
}

pub(crate) fn number_arg(name: &str, args: &[Value], index: usize) -> Result<f64, NativeError> {
    match args.get(index) {
        Some(Value::Number(n)) => Ok(*n),
        Some(other) => Err(NativeError(format!(
            "{name} expects a number, got {}",
            other.type_name()
        ))),
        None => Err(NativeError(format!("{name} is missing argument {}", index + 1))),
    }
}
