//! RAII frame switching for blocks and calls.
//!
//! [`ScopedInterpreter`] makes a frame current and restores the previous one
//! when dropped. Because the restore lives in `Drop`, it runs on every exit
//! path: normal completion, `?` on a runtime error, and a `return` signal
//! unwinding through nested blocks.
//!
//! The guard holds `&mut Interpreter` and implements `Deref`/`DerefMut`, so
//! the body runs against the guard exactly as against the interpreter.
//!
//! ```text
//! let mut scoped = interpreter.scoped();
//! scoped.env.define(name, value);
//! scoped.exec_all(&stmts)?;
//! // previous frame restored here
//! ```

use std::ops::{Deref, DerefMut};

use super::Interpreter;
use crate::resolver::ResolvedProgram;
use crate::FrameRef;

/// Guard restoring the previous frame (and, for calls, the previous
/// program) on drop.
pub struct ScopedInterpreter<'guard, 'interp> {
    interpreter: &'guard mut Interpreter<'interp>,
    previous_frame: Option<FrameRef>,
    previous_program: Option<ResolvedProgram>,
}

impl Drop for ScopedInterpreter<'_, '_> {
    fn drop(&mut self) {
        if let Some(frame) = self.previous_frame.take() {
            self.interpreter.env.restore(frame);
        }
        if let Some(program) = self.previous_program.take() {
            self.interpreter.program = program;
        }
    }
}

impl<'interp> Deref for ScopedInterpreter<'_, 'interp> {
    type Target = Interpreter<'interp>;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for ScopedInterpreter<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

impl<'a> Interpreter<'a> {
    /// Enter a fresh child of the current frame (block entry).
    pub fn scoped(&mut self) -> ScopedInterpreter<'_, 'a> {
        let previous = self.env.push_frame();
        tracing::trace!("enter block frame");
        ScopedInterpreter {
            interpreter: self,
            previous_frame: Some(previous),
            previous_program: None,
        }
    }

    /// Enter `frame` while evaluating nodes of `program` (call entry).
    pub(crate) fn scoped_call(
        &mut self,
        frame: FrameRef,
        program: ResolvedProgram,
    ) -> ScopedInterpreter<'_, 'a> {
        let previous_frame = self.env.enter(frame);
        let previous_program = std::mem::replace(&mut self.program, program);
        ScopedInterpreter {
            interpreter: self,
            previous_frame: Some(previous_frame),
            previous_program: Some(previous_program),
        }
    }

    /// Run `f` inside a fresh child frame.
    pub fn with_env_scope<T, F>(&mut self, f: F) -> T
    where
        F: FnOnce(&mut ScopedInterpreter<'_, 'a>) -> T,
    {
        let mut scoped = self.scoped();
        f(&mut scoped)
    }
}
