//! Stack growth for deep evaluation
//!
//! Every nested expression and every closure call recurses on the host
//! stack. Recursive entry points go through [`ensure_sufficient_stack`],
//! which moves onto a freshly allocated segment when the remaining stack
//! drops below the red zone.

/// Grow when less than this much stack remains (128KB)
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated segment (1MB)
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f` with at least [`RED_ZONE`] bytes of stack available
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
