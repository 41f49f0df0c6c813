//! Pull-based lazy sequences of evaluation outcomes.
//!
//! A stream is asked for one item at a time and may run arbitrary evaluation
//! between items. It is not restartable: enumerating a node again means
//! building a fresh stream with [`evaluate`](super::evaluate), which re-reads
//! the current environment state.

use super::EvalResult;
use crate::context::Context;
use crate::values::Value;

/// One item produced by evaluating a node.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// An ordinary value.
    Value(Value),
    /// A value leaving the current function through `return`.
    Return(Value),
    /// The `cut` marker.
    Cut,
}

impl Outcome {
    /// Value seen by a driver: returns unwrap, cut reads as `undefined`.
    pub fn into_value(self) -> Value {
        match self {
            Outcome::Value(value) | Outcome::Return(value) => value,
            Outcome::Cut => Value::Undefined,
        }
    }
}

pub trait Stream {
    type Item;

    /// Produces the next item, `Ok(None)` once exhausted.
    ///
    /// After `Ok(None)` or an error the stream must not be pulled again.
    fn next(&mut self, ctx: &mut Context) -> EvalResult<Option<Self::Item>>;
}

pub type BoxStream = Box<dyn Stream<Item = Outcome>>;

impl<S: Stream + ?Sized> Stream for Box<S> {
    type Item = S::Item;

    fn next(&mut self, ctx: &mut Context) -> EvalResult<Option<Self::Item>> {
        (**self).next(ctx)
    }
}

/// Yields a single outcome.
pub(crate) struct Once(Option<Outcome>);

impl Stream for Once {
    type Item = Outcome;

    fn next(&mut self, _ctx: &mut Context) -> EvalResult<Option<Outcome>> {
        Ok(self.0.take())
    }
}

pub(crate) fn once(outcome: Outcome) -> BoxStream {
    Box::new(Once(Some(outcome)))
}

/// Runs a computation at the first pull and yields its result.
pub(crate) struct Deferred<F>(Option<F>);

impl<F> Stream for Deferred<F>
where
    F: FnOnce(&mut Context) -> EvalResult<Outcome>,
{
    type Item = Outcome;

    fn next(&mut self, ctx: &mut Context) -> EvalResult<Option<Outcome>> {
        match self.0.take() {
            Some(f) => f(ctx).map(Some),
            None => Ok(None),
        }
    }
}

pub(crate) fn deferred<F>(f: F) -> BoxStream
where
    F: FnOnce(&mut Context) -> EvalResult<Outcome> + 'static,
{
    Box::new(Deferred(Some(f)))
}

/// Transforms every outcome of the inner stream.
pub(crate) struct Map<F> {
    inner: BoxStream,
    f: F,
}

impl<F> Stream for Map<F>
where
    F: FnMut(Outcome, &mut Context) -> EvalResult<Outcome>,
{
    type Item = Outcome;

    fn next(&mut self, ctx: &mut Context) -> EvalResult<Option<Outcome>> {
        match self.inner.next(ctx)? {
            Some(outcome) => (self.f)(outcome, ctx).map(Some),
            None => Ok(None),
        }
    }
}

pub(crate) fn map<F>(inner: BoxStream, f: F) -> BoxStream
where
    F: FnMut(Outcome, &mut Context) -> EvalResult<Outcome> + 'static,
{
    Box::new(Map { inner, f })
}

/// For every item of the outer stream, yields everything of the stream `f`
/// builds from it, in order.
pub(crate) struct FlatMap<S, F> {
    outer: S,
    inner: Option<BoxStream>,
    f: F,
}

impl<S, F> Stream for FlatMap<S, F>
where
    S: Stream,
    F: FnMut(S::Item, &mut Context) -> EvalResult<BoxStream>,
{
    type Item = Outcome;

    fn next(&mut self, ctx: &mut Context) -> EvalResult<Option<Outcome>> {
        loop {
            if let Some(inner) = self.inner.as_mut() {
                if let Some(outcome) = inner.next(ctx)? {
                    return Ok(Some(outcome));
                }
                self.inner = None;
            }
            match self.outer.next(ctx)? {
                Some(item) => self.inner = Some((self.f)(item, ctx)?),
                None => return Ok(None),
            }
        }
    }
}

pub(crate) fn flat_map<S, F>(outer: S, f: F) -> BoxStream
where
    S: Stream + 'static,
    F: FnMut(S::Item, &mut Context) -> EvalResult<BoxStream> + 'static,
{
    Box::new(FlatMap {
        outer,
        inner: None,
        f,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Stream over a fixed list, popped from the back.
    struct List(Vec<Outcome>);

    impl Stream for List {
        type Item = Outcome;

        fn next(&mut self, _ctx: &mut Context) -> EvalResult<Option<Outcome>> {
            Ok(self.0.pop())
        }
    }

    fn numbers(values: &[f64]) -> BoxStream {
        let items = values
            .iter()
            .rev()
            .map(|n| Outcome::Value(Value::Number(*n)))
            .collect();
        Box::new(List(items))
    }

    fn drain(mut stream: BoxStream, ctx: &mut Context) -> Vec<Value> {
        let mut values = Vec::new();
        while let Some(outcome) = stream.next(ctx).unwrap() {
            values.push(outcome.into_value());
        }
        values
    }

    #[test]
    fn test_once_and_deferred() {
        let mut ctx = Context::default();
        assert_eq!(drain(once(Outcome::Cut), &mut ctx), [Value::Undefined]);

        let stream = deferred(|_| Ok(Outcome::Return(Value::Bool(true))));
        assert_eq!(drain(stream, &mut ctx), [Value::Bool(true)]);
    }

    #[test]
    fn test_flat_map_order() {
        let mut ctx = Context::default();
        let stream = flat_map(numbers(&[1.0, 2.0]), |outer, _ctx| {
            let base = outer.into_value().as_number().unwrap_or_default();
            Ok(map(numbers(&[10.0, 20.0]), move |inner, _ctx| {
                let n = inner.into_value().as_number().unwrap_or_default();
                Ok(Outcome::Value(Value::Number(base * 100.0 + n)))
            }))
        });
        assert_eq!(
            drain(stream, &mut ctx),
            [110.0, 120.0, 210.0, 220.0].map(Value::Number)
        );
    }
}
