//! Evaluation modes.
//!
//! An [`EvalMode`] picks the interpreter's defaults: where `print` output
//! goes, where errors are reported, and whether call depth is bounded.
//! Explicit [`InterpreterBuilder`](crate::InterpreterBuilder) settings
//! override the mode's defaults.

/// Evaluation mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EvalMode {
    /// Script or REPL execution: stdout, stderr, native stack growth.
    #[default]
    Interpret,
    /// Embedded in tests: output and errors are captured in buffers and
    /// runaway recursion fails fast.
    TestRun,
}

impl EvalMode {
    /// Whether `print` writes to the process's stdout by default.
    #[inline]
    pub fn allows_io(self) -> bool {
        matches!(self, Self::Interpret)
    }

    /// Maximum call depth, or `None` for unlimited (`stacker` fallback).
    ///
    /// - `Interpret`: `None` on native, 200 on WASM
    /// - `TestRun`: 500
    #[inline]
    pub fn max_call_depth(self) -> Option<usize> {
        match self {
            Self::Interpret => {
                #[cfg(target_arch = "wasm32")]
                {
                    Some(200)
                }
                #[cfg(not(target_arch = "wasm32"))]
                {
                    None
                }
            }
            Self::TestRun => Some(500),
        }
    }
}
