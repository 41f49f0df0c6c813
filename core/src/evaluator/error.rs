//! Evaluation errors.
//!
//! Every error aborts the branch of enumeration that raised it. Errors are
//! not alternatives: a failing `amb` alternative does not fall through to the
//! next one.
//!
//! # Error Categories
//!
//! - **Runtime errors**: scoping, arity, call and operand type problems, and
//!   exceptions escaping native functions. Each carries the span of the node
//!   that raised it.
//!
//! - **Resource exceeded errors**: limits configured in
//!   [`EvaluatorOptions`](super::EvaluatorOptions): the maximum environment
//!   depth and the maximum nesting of node pulls.

use crate::ast::Span;
use core::fmt;
use thiserror::Error;

/// Any error raised while pulling a solution.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error(transparent)]
    ResourceExceeded(#[from] ResourceExceeded),
}

impl EvalError {
    pub fn span(&self) -> &Span {
        match self {
            EvalError::Runtime(err) => &err.span,
            EvalError::ResourceExceeded(
                ResourceExceeded::StackOverflow { span, .. }
                | ResourceExceeded::NestingTooDeep { span, .. },
            ) => span,
        }
    }

    /// Kind of a runtime error; `None` for resource limits.
    pub fn kind(&self) -> Option<&ErrorKind> {
        match self {
            EvalError::Runtime(err) => Some(&err.kind),
            EvalError::ResourceExceeded(_) => None,
        }
    }
}

pub type EvalResult<T> = Result<T, EvalError>;

/// A runtime error tied to the node that raised it.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}")]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub span: Span,
}

impl RuntimeError {
    pub fn new(kind: ErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrorKind {
    /// Same name declared twice in one frame, or defined without a prior
    /// declaration.
    #[error("{} '{name}' has already been declared", binding_kind(.mutable))]
    VariableRedeclaration { name: String, mutable: bool },

    #[error("name '{name}' was read before it was assigned")]
    UnassignedVariable { name: String },

    #[error("name '{name}' is not declared")]
    UndefinedVariable { name: String },

    #[error("cannot assign to constant '{name}'")]
    ConstAssignment { name: String },

    #[error("expected {expected} argument(s) but got {got}")]
    InvalidNumberOfArguments { expected: usize, got: usize },

    #[error("calling non-function value {callee}")]
    CallingNonFunctionValue { callee: String },

    #[error("{}expected {expected} in {operation}, got {got}", side_prefix(.side))]
    TypeError {
        operation: String,
        side: Option<Side>,
        expected: &'static str,
        got: &'static str,
    },

    /// A native function failed with an error of its own.
    #[error("error during native call: {message}")]
    ExceptionError { message: String },
}

/// Operand position of a binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

fn binding_kind(mutable: &bool) -> &'static str {
    if *mutable { "variable" } else { "constant" }
}

fn side_prefix(side: &Option<Side>) -> String {
    match side {
        Some(side) => format!("{side} hand side: "),
        None => String::new(),
    }
}

/// Resource limit exceeded.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResourceExceeded {
    /// Environment stack grew past `max_depth`.
    #[error("evaluation stack overflow: depth {depth} exceeds maximum of {max_depth}")]
    StackOverflow {
        depth: usize,
        max_depth: usize,
        span: Span,
    },

    /// More node pulls in progress than `max_nesting` allows.
    #[error("evaluation nested too deeply: depth {depth} exceeds maximum of {max_depth}")]
    NestingTooDeep {
        depth: usize,
        max_depth: usize,
        span: Span,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let redeclared = ErrorKind::VariableRedeclaration {
            name: "x".to_string(),
            mutable: false,
        };
        assert_eq!(redeclared.to_string(), "constant 'x' has already been declared");

        let type_error = ErrorKind::TypeError {
            operation: "+".to_string(),
            side: Some(Side::Right),
            expected: "number",
            got: "string",
        };
        assert_eq!(
            type_error.to_string(),
            "right hand side: expected number in +, got string"
        );

        let err = EvalError::from(RuntimeError::new(
            ErrorKind::InvalidNumberOfArguments {
                expected: 2,
                got: 3,
            },
            Span::new(0, 4),
        ));
        assert_eq!(err.to_string(), "expected 2 argument(s) but got 3");
        assert_eq!(err.span(), &Span::new(0, 4));
    }
}
