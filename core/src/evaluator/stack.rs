//! Native stack growth for deeply nested pulls.
//!
//! Every node pull recurses into the streams of its children, so deep
//! recursion in a program turns into deep recursion here. Pulls that may
//! nest run through [`ensure_sufficient_stack`], which moves onto a fresh
//! heap-allocated segment when the current one runs low. The actual limit
//! is `max_nesting` in [`EvaluatorOptions`](super::EvaluatorOptions).

/// Space that must remain on the current segment before `f` runs.
const RED_ZONE: usize = 128 * 1024;

/// Size of each new segment.
const SEGMENT_SIZE: usize = 1024 * 1024;

#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub(super) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub(super) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
