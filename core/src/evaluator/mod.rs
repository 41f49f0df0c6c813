//! Non-deterministic tree-walking evaluator.
//!
//! Every node evaluates to a lazy stream of outcomes instead of a single
//! value. `amb(a, b, c)` is a choice point that yields the values of each
//! alternative in turn, undoing the effects of the previous one first, and
//! `cut` stops the enclosing statement sequences from offering further
//! alternatives. Solutions come out depth first, left to right.
//!
//! ## Design Principles
//!
//! - **Lazy**: building a stream runs nothing; pulling it runs just enough
//!   to produce the next outcome.
//! - **Explicit state**: the [`Context`] is passed to every pull, never held
//!   by a stream.
//! - **Bounded**: the environment stack is capped by
//!   [`EvaluatorOptions::max_depth`] and nested node pulls by
//!   [`EvaluatorOptions::max_nesting`]. Native stack grows on demand below
//!   those limits.
//!
//! ## Example
//!
//! ```
//! use ambeval_core::{context::Context, evaluator, parser};
//!
//! let program = parser::parse("amb(1, 2) * 10;").unwrap();
//! let mut context = Context::default();
//!
//! let values: Vec<_> = evaluator::solutions(&program, &mut context)
//!     .map(|result| result.unwrap().to_string())
//!     .collect();
//! assert_eq!(values, ["10", "20"]);
//! ```

mod apply;
mod choice;
mod error;
mod nodes;
mod operators;
mod rttc;
mod stack;
mod stream;


pub use apply::apply;
pub use error::{ErrorKind, EvalError, EvalResult, ResourceExceeded, RuntimeError, Side};
pub use nodes::{AMB, CUT, evaluate};
pub use stream::{BoxStream, Outcome, Stream};

use crate::ast::Node;
use crate::context::Context;
use crate::values::Value;
use std::rc::Rc;

/// Limits applied while evaluating.
///
/// # Example
///
/// ```
/// use ambeval_core::evaluator::EvaluatorOptions;
///
/// let options = EvaluatorOptions {
///     max_depth: 200,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluatorOptions {
    /// Maximum number of environments on the stack: the global and program
    /// frames, plus one per active call or block.
    ///
    /// Default: 500
    pub max_depth: usize,

    /// Maximum number of node pulls in progress at once. Expression nesting
    /// and recursion both count; one call level costs a handful.
    ///
    /// Default: 20000
    pub max_nesting: usize,
}

impl Default for EvaluatorOptions {
    fn default() -> Self {
        Self {
            max_depth: 500,
            max_nesting: 20_000,
        }
    }
}

/// Iterator over the solutions of a node, driving its stream with a
/// borrowed context.
///
/// Stops after the first error. `return` values are reported as plain
/// values and a trailing `cut` as `undefined`.
pub struct Solutions<'ctx> {
    stream: BoxStream,
    context: &'ctx mut Context,
    done: bool,
}

impl<'ctx> Solutions<'ctx> {
    pub fn new(stream: BoxStream, context: &'ctx mut Context) -> Self {
        Self {
            stream,
            context,
            done: false,
        }
    }

    pub fn context(&self) -> &Context {
        self.context
    }
}

impl Iterator for Solutions<'_> {
    type Item = Result<Value, EvalError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.stream.next(self.context) {
            Ok(Some(outcome)) => Some(Ok(outcome.into_value())),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl core::iter::FusedIterator for Solutions<'_> {}

/// Enumerates the solutions of `node` in `context`.
pub fn solutions<'ctx>(node: &Rc<Node>, context: &'ctx mut Context) -> Solutions<'ctx> {
    Solutions::new(evaluate(node), context)
}
