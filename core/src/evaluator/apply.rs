//! Function application.

use super::error::{ErrorKind, EvalError, ResourceExceeded, RuntimeError};
use super::nodes::Body;
use super::stream::{BoxStream, Outcome, Stream, deferred};
use super::EvalResult;
use crate::ast::{Node, NodeKind, NodeList};
use crate::context::Context;
use crate::environment::{Environment, Frame};
use crate::values::{Closure, NativeFunction, Value};
use std::rc::Rc;
use tracing::trace;

/// Lazily enumerates the results of calling `callee` with `arguments`.
///
/// Closures yield once per solution of their body; natives yield exactly
/// once. Errors surface on the first pull.
pub fn apply(
    callee: Value,
    arguments: Vec<Value>,
    call_site: &Rc<Node>,
    this_context: Option<Value>,
) -> BoxStream {
    let call_site = call_site.clone();
    match callee {
        Value::Closure(closure) => Box::new(ClosureCall {
            closure,
            arguments: Some(arguments),
            call_site,
            this_context,
            frame: None,
            body: None,
            finished: false,
        }),
        Value::Native(native) => {
            deferred(move |ctx| call_native(ctx, native, &arguments, &call_site))
        }
        other => deferred(move |ctx| {
            Err(ctx.fail(
                ErrorKind::CallingNonFunctionValue {
                    callee: other.to_string(),
                },
                &call_site.span,
            ))
        }),
    }
}

/// Foreign errors become exception errors at the call site. Errors that
/// are already evaluator errors are raised as they are.
fn call_native(
    ctx: &mut Context,
    native: NativeFunction,
    arguments: &[Value],
    call_site: &Node,
) -> EvalResult<Outcome> {
    trace!(native = native.name(), args = arguments.len(), "calling native");
    let err = match native.call(arguments) {
        Ok(value) => return Ok(Outcome::Value(value)),
        Err(err) => err,
    };

    ctx.truncate_environments();
    let err = match err.downcast::<EvalError>() {
        Ok(own) => return Err(ctx.raise(*own)),
        Err(err) => err,
    };
    match err.downcast::<RuntimeError>() {
        Ok(own) => Err(ctx.raise(*own)),
        Err(foreign) => Err(ctx.fail(
            ErrorKind::ExceptionError {
                message: foreign.to_string(),
            },
            &call_site.span,
        )),
    }
}

/// A closure activation. Like a block, the activation frame is popped at
/// every yield and pushed again on resumption.
struct ClosureCall {
    closure: Rc<Closure>,
    arguments: Option<Vec<Value>>,
    call_site: Rc<Node>,
    this_context: Option<Value>,
    frame: Option<Environment>,
    body: Option<Body>,
    finished: bool,
}

impl ClosureCall {
    /// Checks arity, builds and pushes the activation frame.
    fn enter(&mut self, ctx: &mut Context) -> EvalResult<()> {
        let arguments = self.arguments.take().unwrap_or_default();
        let expected = self.closure.params().len();
        if arguments.len() != expected {
            return Err(ctx.fail(
                ErrorKind::InvalidNumberOfArguments {
                    expected,
                    got: arguments.len(),
                },
                &self.call_site.span,
            ));
        }

        let frame = Frame::activation(
            &self.closure,
            arguments,
            self.call_site.span.clone(),
            self.this_context.take(),
        );
        ctx.push_environment(frame.clone());

        let depth = ctx.environment_depth();
        let max_depth = ctx.options().max_depth;
        if depth > max_depth {
            return Err(ctx.raise(ResourceExceeded::StackOverflow {
                depth,
                max_depth,
                span: self.call_site.span.clone(),
            }));
        }
        trace!(function = self.closure.name(), depth, "applying closure");

        self.frame = Some(frame);
        self.body = Some(Body::new(statements(self.closure.body())));
        Ok(())
    }
}

fn statements(body: &Rc<Node>) -> NodeList {
    match &body.kind {
        NodeKind::Block(statements) => statements.clone(),
        _ => Rc::from([body.clone()]),
    }
}

impl Stream for ClosureCall {
    type Item = Outcome;

    fn next(&mut self, ctx: &mut Context) -> EvalResult<Option<Outcome>> {
        if self.finished {
            return Ok(None);
        }
        match self.frame.clone() {
            Some(frame) => ctx.push_environment(frame),
            None => self.enter(ctx)?,
        }

        let outcome = match self.body.as_mut() {
            Some(body) => body.next(ctx)?,
            None => None,
        };
        ctx.pop_environment();
        match outcome {
            Some(Outcome::Return(value)) => Ok(Some(Outcome::Value(value))),
            // Falling off the end, or a cut, gives `undefined`.
            Some(_) => Ok(Some(Outcome::Value(Value::Undefined))),
            None => {
                self.finished = true;
                Ok(None)
            }
        }
    }
}
