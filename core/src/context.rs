//! Mutable evaluation state threaded through every stream.
//!
//! The context owns the environment stack (innermost frame last), the list
//! of raised errors, and the count of outer environments. Outer environments
//! are the global frame and one frame per evaluated program; error recovery
//! truncates the stack back to them and never below.

use crate::ast::{Node, NodeKind, Span};
use crate::environment::{self, BindError, Binding, Environment, Frame};
use crate::evaluator::{
    ErrorKind, EvalError, EvalResult, EvaluatorOptions, ResourceExceeded, RuntimeError,
};
use crate::values::Value;
use hashbrown::{HashMap, HashSet};
use std::rc::Rc;
use tracing::debug;

pub struct Context {
    global: Environment,
    environments: Vec<Environment>,
    errors: Vec<EvalError>,
    outer_environments: usize,
    nesting: usize,
    options: EvaluatorOptions,
}

impl Context {
    /// A context with an empty global frame.
    pub fn new(options: EvaluatorOptions) -> Self {
        let global = Frame::root("global");
        Self {
            environments: vec![global.clone()],
            global,
            errors: Vec::new(),
            outer_environments: 1,
            nesting: 0,
            options,
        }
    }

    /// A context whose global frame holds the native prelude.
    pub fn with_prelude(options: EvaluatorOptions) -> Self {
        let mut context = Self::new(options);
        crate::stdlib::install_prelude(&mut context);
        context
    }

    pub fn options(&self) -> &EvaluatorOptions {
        &self.options
    }

    /// Every error raised so far, oldest first.
    pub fn errors(&self) -> &[EvalError] {
        &self.errors
    }

    pub fn global(&self) -> &Environment {
        &self.global
    }

    pub fn environment_depth(&self) -> usize {
        self.environments.len()
    }

    pub fn outer_environments(&self) -> usize {
        self.outer_environments
    }

    /// Node pulls currently in progress. Zero between solutions.
    pub fn nesting_depth(&self) -> usize {
        self.nesting
    }

    /// Innermost frame on the stack.
    pub fn current_environment(&self) -> Environment {
        self.environments
            .last()
            .cloned()
            .unwrap_or_else(|| self.global.clone())
    }

    /// Binds `name` as a constant in the global frame, replacing any
    /// previous binding.
    pub fn define_global(&mut self, name: &str, value: Value) {
        self.global.insert(
            name,
            Binding::Assigned {
                value,
                mutable: false,
            },
        );
    }

    pub(crate) fn push_environment(&mut self, env: Environment) {
        self.environments.push(env);
    }

    pub(crate) fn pop_environment(&mut self) -> Option<Environment> {
        self.environments.pop()
    }

    /// Pushes a program frame and counts it as outer.
    pub(crate) fn enter_program(&mut self) {
        self.truncate_environments();
        let frame = Frame::child("program", &self.current_environment());
        self.environments.push(frame);
        self.outer_environments = self.environments.len();
    }

    pub(crate) fn enter_nested(&mut self, span: &Span) -> EvalResult<()> {
        if self.nesting >= self.options.max_nesting {
            return Err(self.raise(ResourceExceeded::NestingTooDeep {
                depth: self.nesting + 1,
                max_depth: self.options.max_nesting,
                span: span.clone(),
            }));
        }
        self.nesting += 1;
        Ok(())
    }

    pub(crate) fn leave_nested(&mut self) {
        self.nesting = self.nesting.saturating_sub(1);
    }

    pub(crate) fn truncate_environments(&mut self) {
        self.environments.truncate(self.outer_environments);
    }

    /// Records `err`, truncates the stack to the outer floor and hands the
    /// error back for propagation.
    pub(crate) fn raise(&mut self, err: impl Into<EvalError>) -> EvalError {
        let err = err.into();
        debug!(
            error = %err,
            depth = self.environments.len(),
            floor = self.outer_environments,
            "raising evaluation error"
        );
        self.errors.push(err.clone());
        self.truncate_environments();
        err
    }

    pub(crate) fn fail(&mut self, kind: ErrorKind, span: &Span) -> EvalError {
        self.raise(RuntimeError::new(kind, span.clone()))
    }

    fn bind_error(&mut self, err: BindError, name: &str, span: &Span) -> EvalError {
        let name = name.to_string();
        let kind = match err {
            BindError::Redeclared { mutable } => ErrorKind::VariableRedeclaration { name, mutable },
            BindError::Unassigned => ErrorKind::UnassignedVariable { name },
            BindError::Undefined => ErrorKind::UndefinedVariable { name },
            BindError::Constant => ErrorKind::ConstAssignment { name },
        };
        self.fail(kind, span)
    }

    /// Adds `name` as unassigned to the innermost frame.
    pub fn declare(&mut self, name: &str, span: &Span) -> EvalResult<()> {
        self.current_environment()
            .declare(name)
            .map_err(|err| self.bind_error(err, name, span))
    }

    /// Completes a declared binding in the innermost frame.
    pub fn define(
        &mut self,
        name: &str,
        value: Value,
        constant: bool,
        span: &Span,
    ) -> EvalResult<()> {
        self.current_environment()
            .define(name, value, constant)
            .map_err(|err| self.bind_error(err, name, span))
    }

    pub fn lookup(&mut self, name: &str, span: &Span) -> EvalResult<Value> {
        environment::lookup(&self.current_environment(), name)
            .map_err(|err| self.bind_error(err, name, span))
    }

    pub fn assign(&mut self, name: &str, value: Value, span: &Span) -> EvalResult<()> {
        environment::assign(&self.current_environment(), name, value)
            .map_err(|err| self.bind_error(err, name, span))
    }

    /// Declares every variable and function declared directly in
    /// `statements`, so siblings can refer to each other and reads before
    /// initialisation fail instead of seeing an outer binding.
    pub fn hoist(&mut self, statements: &[Rc<Node>]) -> EvalResult<()> {
        for statement in statements {
            match &statement.kind {
                NodeKind::VariableDeclaration { name, .. } => self.declare(name, &statement.span)?,
                NodeKind::FunctionDeclaration(function) => {
                    if let Some(name) = &function.name {
                        self.declare(name, &statement.span)?;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Copies every binding map reachable from the stack, including the
    /// environments captured by closures.
    pub(crate) fn snapshot(&self) -> Snapshot {
        let mut visited = HashSet::new();
        let mut pending: Vec<Environment> = self.environments.clone();
        pending.push(self.global.clone());
        let mut frames = Vec::new();

        while let Some(frame) = pending.pop() {
            if !visited.insert(Rc::as_ptr(&frame)) {
                continue;
            }
            let bindings = frame.bindings().clone();
            for binding in bindings.values() {
                if let Binding::Assigned { value, .. } = binding {
                    reach(value, &mut pending);
                }
            }
            if let Some(this) = frame.this_context() {
                reach(this, &mut pending);
            }
            if let Some(call) = frame.call() {
                call.arguments.iter().for_each(|arg| reach(arg, &mut pending));
            }
            if let Some(tail) = frame.tail() {
                pending.push(tail.clone());
            }
            frames.push((frame, bindings));
        }

        Snapshot {
            environments: self.environments.clone(),
            frames,
            errors: self.errors.len(),
            outer_environments: self.outer_environments,
        }
    }

    /// Puts every captured frame back to its captured bindings. Frames keep
    /// their identity, so closures and suspended blocks holding them see the
    /// restored state.
    pub(crate) fn restore(&mut self, snapshot: &Snapshot) {
        for (frame, bindings) in &snapshot.frames {
            frame.replace_bindings(bindings.clone());
        }
        self.environments = snapshot.environments.clone();
        self.errors.truncate(snapshot.errors);
        self.outer_environments = snapshot.outer_environments;
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new(EvaluatorOptions::default())
    }
}

impl core::fmt::Debug for Context {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Context")
            .field("depth", &self.environments.len())
            .field("outer_environments", &self.outer_environments)
            .field("nesting", &self.nesting)
            .field("errors", &self.errors.len())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

fn reach(value: &Value, pending: &mut Vec<Environment>) {
    if let Value::Closure(closure) = value {
        pending.push(closure.environment().clone());
    }
}

/// Evaluation state captured at a choice point.
pub(crate) struct Snapshot {
    environments: Vec<Environment>,
    frames: Vec<(Environment, HashMap<String, Binding>)>,
    errors: usize,
    outer_environments: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn span() -> Span {
        Span::new(0, 1)
    }

    #[test]
    fn test_new_context_has_global_floor() {
        let context = Context::default();
        assert_eq!(context.environment_depth(), 1);
        assert_eq!(context.outer_environments(), 1);
        assert_eq!(context.options().max_depth, 500);
    }

    #[test]
    fn test_raise_records_and_truncates() {
        let mut context = Context::default();
        let block = Frame::child("block", &context.current_environment());
        context.push_environment(block.clone());
        context.push_environment(Frame::child("inner", &block));
        assert_eq!(context.environment_depth(), 3);

        let err = context.lookup("missing", &span()).unwrap_err();
        assert_eq!(
            err.kind(),
            Some(&ErrorKind::UndefinedVariable {
                name: "missing".to_string()
            })
        );
        assert_eq!(context.environment_depth(), 1);
        assert_eq!(context.errors(), [err]);
    }

    #[test]
    fn test_program_frames_are_outer() {
        let mut context = Context::default();
        context.enter_program();
        assert_eq!(context.outer_environments(), 2);

        context.declare("x", &span()).unwrap();
        context.define("x", Value::Number(1.0), false, &span()).unwrap();
        context.push_environment(Frame::child("block", &context.current_environment()));

        context.assign("nope", Value::Null, &span()).unwrap_err();
        assert_eq!(context.environment_depth(), 2);
        assert_eq!(context.lookup("x", &span()), Ok(Value::Number(1.0)));
    }

    #[test]
    fn test_snapshot_restores_mutations_in_place() {
        let mut context = Context::default();
        context.declare("x", &span()).unwrap();
        context.define("x", Value::Number(1.0), false, &span()).unwrap();

        let snapshot = context.snapshot();
        let global = context.current_environment();

        context.assign("x", Value::Number(2.0), &span()).unwrap();
        context.declare("y", &span()).unwrap();
        context.push_environment(Frame::child("block", &global));
        context.lookup("missing", &span()).unwrap_err();

        context.restore(&snapshot);
        assert_eq!(context.lookup("x", &span()), Ok(Value::Number(1.0)));
        assert!(!global.contains("y"));
        assert_eq!(context.environment_depth(), 1);
        assert!(context.errors().is_empty());
    }

    #[test]
    fn test_hoist_declares_top_level_names() {
        let program = crate::parser::parse("let a = 1; function f() { let b = 2; } a;").unwrap();
        let NodeKind::Program(statements) = &program.kind else {
            panic!("expected program");
        };

        let mut context = Context::default();
        context.hoist(statements).unwrap();
        let global = context.current_environment();
        assert_eq!(global.get("a"), Some(Binding::Unassigned));
        assert_eq!(global.get("f"), Some(Binding::Unassigned));
        assert!(!global.contains("b"));
    }
}
