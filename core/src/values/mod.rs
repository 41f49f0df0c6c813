//! Runtime values produced by evaluation.

pub mod closure;
pub mod native;
pub mod value;

pub use closure::Closure;
pub use native::{NativeFn, NativeFunction, NativeResult};
pub use value::Value;
