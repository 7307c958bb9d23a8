//! Stack growth for deep recursion.
//!
//! Evaluation and resolution recurse once per nested node and once per
//! user-level call. `stacker` grows the native stack on demand so deeply
//! nested programs do not overflow it.
//!
//! On WASM, where `stacker` is unavailable, the closure is called directly.

/// Run `f`, growing the stack first if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    /// Minimum stack space to keep available (128KB red zone).
    const RED_ZONE: usize = 128 * 1024;

    /// Stack space to allocate per growth step (2MB).
    const STACK_PER_RECURSION: usize = 2 * 1024 * 1024;

    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
