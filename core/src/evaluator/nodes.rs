//! Per-node evaluation rules.
//!
//! [`evaluate`] only builds a stream; nothing runs until the stream is
//! pulled with a context.

use super::apply::apply;
use super::choice::{Amb, ArgumentProduct, Sequence};
use super::error::{ErrorKind, Side};
use super::stack::ensure_sufficient_stack;
use super::stream::{BoxStream, Outcome, Stream, deferred, flat_map, map, once};
use super::{EvalResult, operators, rttc};
use crate::ast::{Function, Literal, LogicalOp, Node, NodeKind, NodeList};
use crate::context::Context;
use crate::environment::{Environment, Frame};
use crate::values::{Closure, Value};
use std::rc::Rc;
use tracing::debug;

/// Identifier that evaluates to the cut marker.
pub const CUT: &str = "cut";
/// Callee name that makes a call a choice point.
pub const AMB: &str = "amb";

/// Lazily enumerates every outcome of `node`.
pub fn evaluate(node: &Rc<Node>) -> BoxStream {
    Box::new(Nested {
        node: node.clone(),
        inner: Some(build(node)),
    })
}

/// Counts a node pull against `max_nesting` and gives it enough native
/// stack to recurse into its children.
struct Nested {
    node: Rc<Node>,
    inner: Option<BoxStream>,
}

impl Stream for Nested {
    type Item = Outcome;

    fn next(&mut self, ctx: &mut Context) -> EvalResult<Option<Outcome>> {
        let Some(inner) = self.inner.as_mut() else {
            return Ok(None);
        };
        ctx.enter_nested(&self.node.span)?;
        let outcome = ensure_sufficient_stack(|| inner.next(ctx));
        ctx.leave_nested();
        outcome
    }
}

// An abandoned stream tree is as deep as the pulls that built it.
impl Drop for Nested {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.take() {
            ensure_sufficient_stack(move || drop(inner));
        }
    }
}

fn build(node: &Rc<Node>) -> BoxStream {
    match &node.kind {
        NodeKind::Literal(literal) => once(Outcome::Value(Value::from(literal))),
        NodeKind::Identifier(name) if name == CUT => once(Outcome::Cut),
        NodeKind::Identifier(name) => {
            let (node, name) = (node.clone(), name.clone());
            deferred(move |ctx| ctx.lookup(&name, &node.span).map(Outcome::Value))
        }
        NodeKind::Call { callee, arguments } => call(node, callee, arguments),
        NodeKind::Unary { operator, argument } => {
            let (node, operator) = (node.clone(), *operator);
            map(evaluate(argument), move |outcome, ctx| {
                let value = operand(ctx, outcome, &node, &operator.to_string())?;
                if let Err(kind) = rttc::check_unary(operator, &value) {
                    return Err(ctx.fail(kind, &node.span));
                }
                Ok(Outcome::Value(operators::eval_unary(operator, &value)))
            })
        }
        NodeKind::Binary {
            operator,
            left,
            right,
        } => {
            let (node, operator, right) = (node.clone(), *operator, right.clone());
            flat_map(evaluate(left), move |outcome, ctx| {
                let symbol = operator.to_string();
                let lhs = operand(ctx, outcome, &node, &symbol)?;
                let node = node.clone();
                Ok(map(evaluate(&right), move |outcome, ctx| {
                    let rhs = operand(ctx, outcome, &node, &symbol)?;
                    if let Err(kind) = rttc::check_binary(operator, &lhs, &rhs) {
                        return Err(ctx.fail(kind, &node.span));
                    }
                    Ok(Outcome::Value(operators::eval_binary(operator, &lhs, &rhs)))
                }))
            })
        }
        NodeKind::Logical {
            operator,
            left,
            right,
        } => {
            // `a && b` is `a ? b : false`, `a || b` is `a ? true : b`.
            let literal = |b: bool| Rc::new(Node::literal(Literal::Bool(b), node.span.clone()));
            let (consequent, alternate) = match operator {
                LogicalOp::And => (right.clone(), literal(false)),
                LogicalOp::Or => (literal(true), right.clone()),
            };
            let test = Test {
                operation: operator.to_string(),
                side: Some(Side::Left),
            };
            conditional(node, left, consequent, Some(alternate), test)
        }
        NodeKind::Conditional {
            test,
            consequent,
            alternate,
        } => conditional(
            node,
            test,
            consequent.clone(),
            Some(alternate.clone()),
            Test::named("conditional expression"),
        ),
        NodeKind::If {
            test,
            consequent,
            alternate,
        } => conditional(
            node,
            test,
            consequent.clone(),
            alternate.clone(),
            Test::named("if statement"),
        ),
        NodeKind::VariableDeclaration { kind, name, init } => {
            let (node, name, constant) = (node.clone(), name.clone(), kind.is_constant());
            map(evaluate(init), move |outcome, ctx| {
                let value = operand(ctx, outcome, &node, "variable declaration")?;
                ctx.define(&name, value.clone(), constant, &node.span)?;
                Ok(Outcome::Value(value))
            })
        }
        NodeKind::Assignment { name, value } => {
            let (node, name) = (node.clone(), name.clone());
            map(evaluate(value), move |outcome, ctx| {
                let value = operand(ctx, outcome, &node, "assignment")?;
                ctx.assign(&name, value.clone(), &node.span)?;
                Ok(Outcome::Value(value))
            })
        }
        NodeKind::FunctionDeclaration(function) => {
            let (node, function) = (node.clone(), function.clone());
            deferred(move |ctx| {
                let name = function.name.clone().unwrap_or_default();
                let value = closure(&function, ctx);
                ctx.define(&name, value, true, &node.span)?;
                Ok(Outcome::Value(Value::Undefined))
            })
        }
        NodeKind::ArrowFunction(function) => {
            let function = function.clone();
            deferred(move |ctx| Ok(Outcome::Value(closure(&function, ctx))))
        }
        NodeKind::Return { argument: None } => once(Outcome::Return(Value::Undefined)),
        NodeKind::Return {
            argument: Some(argument),
        } => {
            let node = node.clone();
            map(evaluate(argument), move |outcome, ctx| {
                operand(ctx, outcome, &node, "return").map(Outcome::Return)
            })
        }
        NodeKind::ExpressionStatement(expression) => build(expression),
        NodeKind::Block(statements) => Box::new(Block::new(statements.clone())),
        NodeKind::Program(statements) => Box::new(Program::new(statements.clone())),
    }
}

fn closure(function: &Rc<Function>, ctx: &Context) -> Value {
    Value::Closure(Rc::new(Closure::new(
        function.clone(),
        ctx.current_environment(),
    )))
}

/// Unwraps an outcome used as an operand. The cut marker is not a value.
pub(super) fn operand(
    ctx: &mut Context,
    outcome: Outcome,
    node: &Node,
    operation: &str,
) -> EvalResult<Value> {
    match outcome {
        Outcome::Value(value) | Outcome::Return(value) => Ok(value),
        Outcome::Cut => Err(ctx.fail(
            ErrorKind::TypeError {
                operation: operation.to_string(),
                side: None,
                expected: "a value",
                got: "cut",
            },
            &node.span,
        )),
    }
}

fn call(node: &Rc<Node>, callee: &Rc<Node>, arguments: &NodeList) -> BoxStream {
    if matches!(&callee.kind, NodeKind::Identifier(name) if name == AMB) {
        return Box::new(Amb::new(arguments.clone()));
    }
    let (node, arguments) = (node.clone(), arguments.clone());
    flat_map(evaluate(callee), move |outcome, ctx| {
        let callee = operand(ctx, outcome, &node, "call")?;
        let node = node.clone();
        Ok(flat_map(
            ArgumentProduct::new(arguments.clone()),
            move |args, _ctx| Ok(apply(callee.clone(), args, &node, None)),
        ))
    })
}

/// How a branch test is described in type errors.
struct Test {
    operation: String,
    side: Option<Side>,
}

impl Test {
    fn named(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            side: None,
        }
    }
}

fn conditional(
    node: &Rc<Node>,
    test: &Rc<Node>,
    consequent: Rc<Node>,
    alternate: Option<Rc<Node>>,
    description: Test,
) -> BoxStream {
    let node = node.clone();
    flat_map(evaluate(test), move |outcome, ctx| {
        let value = operand(ctx, outcome, &node, &description.operation)?;
        let taken = match rttc::check_condition(&value, &description.operation, description.side) {
            Ok(taken) => taken,
            Err(kind) => return Err(ctx.fail(kind, &node.span)),
        };
        Ok(match (taken, &alternate) {
            (true, _) => evaluate(&consequent),
            (false, Some(alternate)) => evaluate(alternate),
            (false, None) => once(Outcome::Value(Value::Undefined)),
        })
    })
}

/// Hoists a statement list into the current frame, then runs it as a
/// sequence.
pub(super) struct Body {
    statements: NodeList,
    sequence: Option<Sequence>,
}

impl Body {
    pub(super) fn new(statements: NodeList) -> Self {
        Self {
            statements,
            sequence: None,
        }
    }
}

impl Stream for Body {
    type Item = Outcome;

    fn next(&mut self, ctx: &mut Context) -> EvalResult<Option<Outcome>> {
        if self.sequence.is_none() {
            ctx.hoist(&self.statements)?;
            self.sequence = Some(Sequence::new(self.statements.clone()));
        }
        match self.sequence.as_mut() {
            Some(sequence) => sequence.next(ctx),
            None => Ok(None),
        }
    }
}

/// A block runs in its own frame. The frame is popped whenever the block
/// yields and pushed again when it is resumed, so code after the block
/// never sees it while later alternatives inside it still do.
struct Block {
    frame: Option<Environment>,
    body: Body,
    finished: bool,
}

impl Block {
    fn new(statements: NodeList) -> Self {
        Self {
            frame: None,
            body: Body::new(statements),
            finished: false,
        }
    }
}

impl Stream for Block {
    type Item = Outcome;

    fn next(&mut self, ctx: &mut Context) -> EvalResult<Option<Outcome>> {
        if self.finished {
            return Ok(None);
        }
        let frame = self
            .frame
            .get_or_insert_with(|| Frame::child("block", &ctx.current_environment()))
            .clone();
        ctx.push_environment(frame);

        // Raised errors have already truncated the stack.
        let outcome = self.body.next(ctx)?;
        ctx.pop_environment();
        if outcome.is_none() {
            self.finished = true;
        }
        Ok(outcome)
    }
}

/// Top-level statement list. Its frame is never popped: it becomes an
/// outer environment, so later programs run in the same context see its
/// declarations.
struct Program {
    entered: bool,
    body: Body,
}

impl Program {
    fn new(statements: NodeList) -> Self {
        Self {
            entered: false,
            body: Body::new(statements),
        }
    }
}

impl Stream for Program {
    type Item = Outcome;

    fn next(&mut self, ctx: &mut Context) -> EvalResult<Option<Outcome>> {
        if !self.entered {
            self.entered = true;
            ctx.enter_program();
            debug!(depth = ctx.environment_depth(), "evaluating program");
        }
        self.body.next(ctx)
    }
}
