//! Stack growth for deep object graphs.
//!
//! A deep clone of a long reference chain recurses once per link. Each
//! nested plan execution runs inside [`ensure_sufficient_stack`], which
//! grows the native stack on demand so only the configured depth limit
//! bounds the recursion.
//!
//! - **Red zone**: 100KB. Below this much remaining stack, grow.
//! - **Growth size**: 1MB per growth.

/// Minimum stack space to keep available.
#[cfg(not(target_arch = "wasm32"))]
const RED_ZONE: usize = 100 * 1024;

/// Stack space allocated per growth.
#[cfg(not(target_arch = "wasm32"))]
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, growing the stack first if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM manages its own stack; run `f` directly.
#[inline]
#[cfg(target_arch = "wasm32")]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
