//! Host functions callable from evaluated programs.

use super::Value;
use core::fmt;

/// Result of a native call. Any error type may be returned; the evaluator
/// turns foreign errors into exception errors at the call site.
pub type NativeResult = Result<Value, Box<dyn std::error::Error>>;

/// Signature for Rust functions exposed to programs.
///
/// # Example
///
/// ```ignore
/// fn twice(args: &[Value]) -> NativeResult {
///     match args {
///         [Value::Number(n)] => Ok(Value::Number(n * 2.0)),
///         _ => Err("twice expects one number".into()),
///     }
/// }
/// ```
pub type NativeFn = fn(&[Value]) -> NativeResult;

/// Named wrapper around a native function pointer.
#[derive(Clone, Copy)]
pub struct NativeFunction {
    name: &'static str,
    func: NativeFn,
}

impl NativeFunction {
    pub const fn new(name: &'static str, func: NativeFn) -> Self {
        Self { name, func }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn call(&self, args: &[Value]) -> NativeResult {
        (self.func)(args)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NativeFunction").field(&self.name).finish()
    }
}
