//! Public error types for the ambeval API.
//!
//! Core errors are converted to these at the facade boundary, together with
//! the source text they point into, so that they can be rendered later.

use ambeval_core::Span;
use ambeval_core::evaluator::{ErrorKind, EvalError, RuntimeError};
use ambeval_core::parser::ParseError;
use std::fmt;

/// Error returned by [`Interpreter`](crate::Interpreter) operations.
#[derive(Debug, Clone)]
pub enum Error {
    /// The program text could not be parsed.
    Parse { diagnostic: Diagnostic, source: String },

    /// Evaluation failed. Solutions produced before the failure stay valid.
    Runtime { diagnostic: Diagnostic, source: String },

    /// A resource limit was exceeded (e.g., stack overflow).
    ResourceExceeded(String),
}

impl Error {
    pub(crate) fn parse(err: &ParseError, source: &str) -> Self {
        Error::Parse {
            diagnostic: Diagnostic {
                message: err.to_string(),
                span: err.span(),
                help: None,
                code: Some("E0001".to_string()),
            },
            source: source.to_string(),
        }
    }

    pub(crate) fn eval(err: EvalError, source: &str) -> Self {
        match err {
            EvalError::Runtime(err) => Error::Runtime {
                diagnostic: Diagnostic::from(&err),
                source: source.to_string(),
            },
            EvalError::ResourceExceeded(err) => Error::ResourceExceeded(err.to_string()),
        }
    }

    /// The diagnostic carried by this error, if it has a source location.
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            Error::Parse { diagnostic, .. } | Error::Runtime { diagnostic, .. } => Some(diagnostic),
            Error::ResourceExceeded(_) => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Parse { diagnostic, .. } => write!(f, "Parse error: {}", diagnostic.message),
            Error::Runtime { diagnostic, .. } => {
                write!(f, "Runtime error: {}", diagnostic.message)
            }
            Error::ResourceExceeded(msg) => write!(f, "Resource limit exceeded: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// An error message with source location. Evaluation only reports errors,
/// so every diagnostic renders as one.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Message, as shown in the report header and label.
    pub message: String,

    /// Source location of the issue.
    pub span: Span,

    /// Hint printed below the report.
    pub help: Option<String>,

    /// Stable error code (e.g., "E0107") for documentation lookup.
    pub code: Option<String>,
}

impl From<&RuntimeError> for Diagnostic {
    fn from(err: &RuntimeError) -> Self {
        let (code, help) = match &err.kind {
            ErrorKind::VariableRedeclaration { .. } => ("E0101", None),
            ErrorKind::UnassignedVariable { name } => (
                "E0102",
                Some(format!(
                    "'{name}' is declared in this scope but its initializer has not run yet"
                )),
            ),
            ErrorKind::UndefinedVariable { .. } => ("E0103", None),
            ErrorKind::ConstAssignment { .. } => {
                ("E0104", Some("declare it with `let` to allow assignment".to_string()))
            }
            ErrorKind::InvalidNumberOfArguments { .. } => ("E0105", None),
            ErrorKind::CallingNonFunctionValue { .. } => ("E0106", None),
            ErrorKind::TypeError { got: "cut", .. } => (
                "E0107",
                Some("`cut` is a statement and has no value".to_string()),
            ),
            ErrorKind::TypeError { .. } => ("E0107", None),
            ErrorKind::ExceptionError { .. } => ("E0108", None),
        };
        Diagnostic {
            message: err.kind.to_string(),
            span: err.span.clone(),
            help,
            code: Some(code.to_string()),
        }
    }
}
