//! Call-stack tracking for the evaluator.
//!
//! [`CallStack`] records one [`CallFrame`] per active user-function call.
//! It enforces the optional depth limit and snapshots backtraces onto
//! errors at the point they leave the innermost call.

use lox_ir::{Name, Span, StringInterner};

use crate::errors::{stack_overflow, BacktraceFrame, EvalBacktrace, EvalError};

/// A single frame in the live call stack.
#[derive(Clone, Debug)]
pub struct CallFrame {
    /// Interned function name.
    pub name: Name,
    /// Source location of the call site.
    pub call_span: Option<Span>,
}

/// Live call stack of the interpreter.
#[derive(Clone, Debug)]
pub struct CallStack {
    frames: Vec<CallFrame>,
    max_depth: Option<usize>,
}

impl CallStack {
    /// `max_depth` is `None` for unlimited (the native stack grows on
    /// demand) or `Some(n)` to fail with a stack-overflow error instead.
    pub fn new(max_depth: Option<usize>) -> Self {
        Self {
            frames: Vec::new(),
            max_depth,
        }
    }

    /// Push a call frame, checking the depth limit.
    ///
    /// The frame is not pushed on overflow.
    pub fn push(&mut self, frame: CallFrame) -> Result<(), EvalError> {
        if let Some(max) = self.max_depth {
            if self.frames.len() >= max {
                return Err(stack_overflow(max));
            }
        }
        self.frames.push(frame);
        Ok(())
    }

    pub fn pop(&mut self) {
        debug_assert!(
            !self.frames.is_empty(),
            "CallStack::pop() called on empty stack"
        );
        self.frames.pop();
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// Snapshot the stack, most recent call first.
    pub fn capture(&self, interner: &StringInterner) -> EvalBacktrace {
        let frames = self
            .frames
            .iter()
            .rev()
            .map(|f| BacktraceFrame {
                name: interner.lookup(f.name).to_owned(),
                span: f.call_span,
            })
            .collect();
        EvalBacktrace::new(frames)
    }

    /// Attach a backtrace to `err` unless it already carries one.
    pub fn attach_backtrace(&self, err: EvalError, interner: &StringInterner) -> EvalError {
        if self.frames.is_empty() || !err.backtrace.is_empty() {
            return err;
        }
        err.with_backtrace(self.capture(interner))
    }
}

impl Default for CallStack {
    /// Unlimited call stack.
    fn default() -> Self {
        Self::new(None)
    }
}
