//! ambeval - A non-deterministic evaluator for a small JavaScript subset
//!
//! # Overview
//!
//! Programs are ordinary JavaScript-like code extended with two primitives:
//!
//! - `amb(a, b, c)` is a choice point that evaluates to each of its
//!   alternatives in turn, undoing the effects of the previous alternative.
//! - `cut;` commits to the choices made so far in the enclosing statement
//!   list.
//!
//! A program therefore has any number of solutions, enumerated depth first
//! and left to right, each one the value of its last statement.
//!
//! # Quick Start
//!
//! ```
//! use ambeval::{Interpreter, Value};
//!
//! let mut interpreter = Interpreter::default();
//! let solutions = interpreter
//!     .all_solutions("let x = amb(1, 2, 3); x * x;")
//!     .unwrap();
//! assert_eq!(solutions, [Value::Number(1.0), Value::Number(4.0), Value::Number(9.0)]);
//! ```
//!
//! # Sessions
//!
//! An [`Interpreter`] keeps one context for its whole life, so later
//! programs see what earlier ones declared:
//!
//! ```
//! use ambeval::{Interpreter, Value};
//!
//! let mut interpreter = Interpreter::default();
//! interpreter.all_solutions("function sq(n) { return n * n; }").unwrap();
//! assert_eq!(interpreter.first_solution("sq(7);").unwrap(), Some(Value::Number(49.0)));
//! ```

mod error;
mod error_renderer;

pub use error::{Diagnostic, Error};
pub use error_renderer::{
    render_error, render_error_to, render_error_to_string, render_error_to_string_no_color,
};

pub use ambeval_core::evaluator::{EvalError, EvaluatorOptions};
pub use ambeval_core::values::{NativeFn, NativeFunction, NativeResult, Value};
pub use ambeval_core::{Context, Span, ast, convert, names, parser};

use ambeval_core::evaluator;
use tracing::debug;

/// Options for creating an [`Interpreter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterOptions {
    /// Limits applied while evaluating.
    pub evaluator: EvaluatorOptions,

    /// Install the native prelude (`display`, `math_max`, ...) in the global
    /// frame.
    ///
    /// Default: true
    pub prelude: bool,
}

impl Default for InterpreterOptions {
    fn default() -> Self {
        Self {
            evaluator: EvaluatorOptions::default(),
            prelude: true,
        }
    }
}

/// An evaluation session.
#[derive(Debug)]
pub struct Interpreter {
    context: Context,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(InterpreterOptions::default())
    }
}

impl Interpreter {
    pub fn new(options: InterpreterOptions) -> Self {
        let context = if options.prelude {
            Context::with_prelude(options.evaluator)
        } else {
            Context::new(options.evaluator)
        };
        Self { context }
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Binds a constant in the global frame, visible to every later program.
    ///
    /// # Example
    /// ```
    /// use ambeval::{Interpreter, NativeFunction, Value};
    ///
    /// fn double(args: &[Value]) -> ambeval::NativeResult {
    ///     let n = args.first().and_then(Value::as_number).ok_or("expected a number")?;
    ///     Ok(Value::Number(n * 2.0))
    /// }
    ///
    /// let mut interpreter = Interpreter::default();
    /// interpreter.define("double", Value::Native(NativeFunction::new("double", double)));
    /// assert_eq!(
    ///     interpreter.all_solutions("double(amb(1, 2));").unwrap(),
    ///     [Value::Number(2.0), Value::Number(4.0)]
    /// );
    /// ```
    pub fn define(&mut self, name: &str, value: Value) {
        self.context.define_global(name, value);
    }

    /// Parses `source` and returns a lazy iterator over its solutions.
    ///
    /// Nothing is evaluated until the iterator is pulled. Dropping it early
    /// abandons the remaining alternatives.
    pub fn solutions(&mut self, source: &str) -> Result<Solutions<'_>, Error> {
        let program = parser::parse(source).map_err(|err| Error::parse(&err, source))?;
        debug!(bytes = source.len(), "parsed program");
        Ok(Solutions {
            inner: evaluator::solutions(&program, &mut self.context),
            source: source.to_string(),
        })
    }

    /// Every solution of `source`, or the first error.
    pub fn all_solutions(&mut self, source: &str) -> Result<Vec<Value>, Error> {
        self.solutions(source)?.collect()
    }

    /// The first solution of `source`, or `None` if it has none.
    pub fn first_solution(&mut self, source: &str) -> Result<Option<Value>, Error> {
        self.solutions(source)?.next().transpose()
    }

    /// At most `n` solutions of `source`. Later alternatives are never
    /// evaluated, so errors they would raise are not reported.
    pub fn take_solutions(&mut self, source: &str, n: usize) -> Result<Vec<Value>, Error> {
        self.solutions(source)?.take(n).collect()
    }
}

/// Iterator over the solutions of one program.
///
/// Stops after the first error, which is reported with the program text.
pub struct Solutions<'a> {
    inner: evaluator::Solutions<'a>,
    source: String,
}

impl Iterator for Solutions<'_> {
    type Item = Result<Value, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|result| result.map_err(|err| Error::eval(err, &self.source)))
    }
}

impl std::iter::FusedIterator for Solutions<'_> {}
