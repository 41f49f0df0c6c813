//! Choice points, argument enumeration and statement sequencing.
//!
//! Everything here explores alternatives depth first, left to right:
//! - [`Amb`] tries each alternative from the same restored state.
//! - [`ArgumentProduct`] yields every combination of argument values, the
//!   last argument varying fastest.
//! - [`Sequence`] runs the remaining statements once per value of the
//!   current one, and stops retrying as soon as a `cut` is reached.

use super::nodes::{evaluate, operand};
use super::stack::ensure_sufficient_stack;
use super::stream::{BoxStream, Outcome, Stream, once};
use super::EvalResult;
use crate::ast::NodeList;
use crate::context::{Context, Snapshot};
use crate::values::Value;
use tracing::debug;

/// `amb(e1, ..., en)`: every value of `e1`, then every value of `e2` with
/// all effects of exploring `e1` undone, and so on.
pub(crate) struct Amb {
    alternatives: NodeList,
    index: usize,
    snapshot: Option<Snapshot>,
    current: Option<BoxStream>,
}

impl Amb {
    pub(crate) fn new(alternatives: NodeList) -> Self {
        Self {
            alternatives,
            index: 0,
            snapshot: None,
            current: None,
        }
    }
}

impl Stream for Amb {
    type Item = Outcome;

    fn next(&mut self, ctx: &mut Context) -> EvalResult<Option<Outcome>> {
        if self.snapshot.is_none() {
            self.snapshot = Some(ctx.snapshot());
        }
        loop {
            if let Some(current) = self.current.as_mut() {
                if let Some(outcome) = current.next(ctx)? {
                    return Ok(Some(outcome));
                }
                self.current = None;
                if let Some(snapshot) = &self.snapshot {
                    ctx.restore(snapshot);
                }
                self.index += 1;
            }
            let Some(alternative) = self.alternatives.get(self.index) else {
                return Ok(None);
            };
            debug!(
                alternative = self.index,
                of = self.alternatives.len(),
                "trying amb alternative"
            );
            self.current = Some(evaluate(alternative));
        }
    }
}

/// Every combination of one value per argument expression.
///
/// Works like an odometer: position `k` is evaluated afresh for every
/// choice of positions `0..k`, so later arguments see the effects of the
/// earlier ones.
pub(crate) struct ArgumentProduct {
    arguments: NodeList,
    streams: Vec<BoxStream>,
    values: Vec<Value>,
    started: bool,
    done: bool,
}

impl ArgumentProduct {
    pub(crate) fn new(arguments: NodeList) -> Self {
        Self {
            arguments,
            streams: Vec::new(),
            values: Vec::new(),
            started: false,
            done: false,
        }
    }
}

impl Stream for ArgumentProduct {
    type Item = Vec<Value>;

    fn next(&mut self, ctx: &mut Context) -> EvalResult<Option<Vec<Value>>> {
        if self.done {
            return Ok(None);
        }
        if self.started {
            self.values.pop();
        } else {
            self.started = true;
            let Some(first) = self.arguments.first() else {
                self.done = true;
                return Ok(Some(Vec::new()));
            };
            self.streams.push(evaluate(first));
        }

        loop {
            let position = self.values.len();
            let Some(stream) = self.streams.last_mut() else {
                self.done = true;
                return Ok(None);
            };
            match stream.next(ctx)? {
                Some(outcome) => {
                    let value = operand(ctx, outcome, &self.arguments[position], "call argument")?;
                    self.values.push(value);
                    match self.arguments.get(position + 1) {
                        Some(next) => self.streams.push(evaluate(next)),
                        None => return Ok(Some(self.values.clone())),
                    }
                }
                None => {
                    self.streams.pop();
                    self.values.pop();
                }
            }
        }
    }
}

/// Runs a statement list, re-running the statements after `i` once for
/// every value statement `i` produces.
///
/// A `return` outcome skips the remaining statements and is passed up as is.
/// A `cut` outcome lets the current continuation finish and then stops the
/// sequence: no more values are asked of this statement or any earlier one,
/// and the enclosing sequence is told to stop as well. A `cut` that is the
/// last statement is also passed up as the sequence's value.
pub(crate) struct Sequence {
    statements: NodeList,
    index: usize,
    first: BoxStream,
    rest: Option<Box<Sequence>>,
    cut: bool,
    finished: bool,
}

impl Sequence {
    pub(crate) fn new(statements: NodeList) -> Self {
        if statements.is_empty() {
            return Self {
                statements,
                index: 0,
                first: once(Outcome::Value(Value::Undefined)),
                rest: None,
                cut: false,
                finished: false,
            };
        }
        Self::at(statements, 0)
    }

    fn at(statements: NodeList, index: usize) -> Self {
        let first = evaluate(&statements[index]);
        Self {
            statements,
            index,
            first,
            rest: None,
            cut: false,
            finished: false,
        }
    }

    fn is_last(&self) -> bool {
        self.index + 1 >= self.statements.len()
    }

    /// Whether a `cut` stopped this sequence.
    pub(crate) fn was_cut(&self) -> bool {
        self.cut
    }
}

impl Drop for Sequence {
    fn drop(&mut self) {
        if let Some(rest) = self.rest.take() {
            ensure_sufficient_stack(move || drop(rest));
        }
    }
}

impl Stream for Sequence {
    type Item = Outcome;

    fn next(&mut self, ctx: &mut Context) -> EvalResult<Option<Outcome>> {
        loop {
            if let Some(rest) = self.rest.as_mut() {
                // One level per statement, so long lists recurse deeply.
                if let Some(outcome) = ensure_sufficient_stack(|| rest.next(ctx))? {
                    return Ok(Some(outcome));
                }
                if rest.was_cut() {
                    self.cut = true;
                }
                self.rest = None;
            }
            if self.finished || self.cut {
                self.finished = true;
                return Ok(None);
            }

            let Some(outcome) = self.first.next(ctx)? else {
                self.finished = true;
                return Ok(None);
            };
            match outcome {
                Outcome::Return(_) => return Ok(Some(outcome)),
                Outcome::Cut => {
                    debug!(statement = self.index, "cut reached, pruning sequence");
                    self.cut = true;
                }
                Outcome::Value(_) => {}
            }
            if self.is_last() {
                return Ok(Some(outcome));
            }
            self.rest = Some(Box::new(Sequence::at(
                self.statements.clone(),
                self.index + 1,
            )));
        }
    }
}
