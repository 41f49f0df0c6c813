pub mod ast;
pub mod context;
pub mod convert;
pub mod environment;
pub mod evaluator;
pub mod names;
pub mod parser;
pub mod stdlib;
pub mod values;

pub use ast::{Node, NodeKind, Span};
pub use context::Context;
pub use evaluator::{EvalError, EvaluatorOptions, Outcome, Solutions};
pub use values::Value;
