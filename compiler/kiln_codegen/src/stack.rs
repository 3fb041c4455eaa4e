//! Stack safety for recursive emission.
//!
//! Object graphs and nested struct values can be arbitrarily deep; the
//! emitters recurse through `stacker` so depth is bounded by the heap.

/// Grow the stack if less than 256KB remains, in 2MB segments.
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(256 * 1024, 2 * 1024 * 1024, f)
}
