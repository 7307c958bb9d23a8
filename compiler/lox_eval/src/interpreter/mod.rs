//! Tree-walking interpreter for Lox.
//!
//! # Architecture
//!
//! - `eval.rs`: [`Interpreter::eval`], one `match` over [`ExprKind`](lox_ir::ExprKind)
//! - `exec.rs`: [`Interpreter::exec`], one `match` over [`StmtKind`](lox_ir::StmtKind)
//! - `function_call.rs`: callee checks, arity, user-function invocation
//! - `scope_guard.rs`: RAII frame switching
//!
//! Expressions return [`EvalResult`](crate::EvalResult); statements return
//! [`ExecResult`](crate::ExecResult), whose error side is a
//! [`ControlAction`](crate::ControlAction). A `return` travels as
//! `ControlAction::Return` through blocks and loops and is converted back
//! into a value at the call boundary, so it can never be mistaken for a
//! runtime error.
//!
//! # Arena Threading
//!
//! Node ids are only valid in the arena that produced them. Every user
//! function carries the [`ResolvedProgram`] it was declared in, and a call
//! switches `self.program` to the callee's for the duration of the body.
//! This is what lets a REPL call, in one batch, a closure created by an
//! earlier batch.

mod builder;
mod eval;
mod exec;
mod function_call;
mod scope_guard;

pub use builder::InterpreterBuilder;
pub use scope_guard::ScopedInterpreter;

use lox_ir::{Name, Program, StmtId, StringInterner};

use crate::diagnostics::CallStack;
use crate::errors::EvalError;
use crate::eval_mode::EvalMode;
use crate::print_handler::SharedPrintHandler;
use crate::reporter::SharedReporter;
use crate::resolver::{ResolveError, ResolvedProgram, Resolver};
use crate::{Callable, Environment, FrameRef, NativeFunction, UserFunction, Value};

/// Names interned once at construction.
#[derive(Clone, Copy)]
pub(crate) struct InternedNames {
    pub(crate) this: Name,
}

impl InternedNames {
    fn new(interner: &StringInterner) -> Self {
        Self {
            this: interner.intern("this"),
        }
    }
}

/// Failure of [`Interpreter::run`].
///
/// Already reported through the interpreter's reporter when returned.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("{} resolution error(s)", .0.len())]
    Resolve(Vec<ResolveError>),
    #[error(transparent)]
    Runtime(#[from] EvalError),
}

/// Tree-walking interpreter.
///
/// Holds all state that survives between top-level batches: the global
/// frame, registered natives, and the output/report hooks.
pub struct Interpreter<'a> {
    pub(crate) interner: &'a StringInterner,
    pub(crate) env: Environment,
    /// Program whose node ids are currently being evaluated.
    pub(crate) program: ResolvedProgram,
    pub(crate) print_handler: SharedPrintHandler,
    pub(crate) reporter: SharedReporter,
    pub(crate) call_stack: CallStack,
    pub(crate) mode: EvalMode,
    pub(crate) names: InternedNames,
}

impl<'a> Interpreter<'a> {
    /// Create an interpreter in `Interpret` mode with the default prelude.
    pub fn new(interner: &'a StringInterner) -> Self {
        InterpreterBuilder::new(interner).build()
    }

    /// Resolve and execute one top-level batch.
    ///
    /// Resolution errors are all reported and nothing runs. A runtime error
    /// is reported once and abandons the rest of the batch; globals defined
    /// so far stay available to later batches.
    #[tracing::instrument(level = "debug", skip_all, fields(statements = program.statements.len()))]
    pub fn run(&mut self, program: &Program) -> Result<(), RunError> {
        let resolved = match Resolver::resolve(program, self.interner) {
            Ok(resolved) => resolved,
            Err(errors) => {
                self.reporter.report_resolve(&errors);
                return Err(RunError::Resolve(errors));
            }
        };
        self.interpret(&resolved)?;
        Ok(())
    }

    /// Execute an already-resolved batch.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn interpret(&mut self, program: &ResolvedProgram) -> Result<(), EvalError> {
        let previous = std::mem::replace(&mut self.program, program.clone());
        let result = self.execute_batch(program.statements());
        self.program = previous;

        debug_assert!(
            self.env.is_at_globals(),
            "frame guards must restore the global frame"
        );
        debug_assert!(self.call_stack.is_empty());

        if let Err(err) = &result {
            tracing::debug!(error = %err, line = ?err.line(), "batch abandoned");
            self.reporter.report_eval(err);
        }
        result
    }

    fn execute_batch(&mut self, statements: &[StmtId]) -> Result<(), EvalError> {
        for &stmt in statements {
            if let Err(action) = self.exec(stmt) {
                let span = self.program.arena.get_stmt(stmt).span;
                return Err(action.into_eval_error().with_span(span));
            }
        }
        Ok(())
    }

    /// Bind `name` in the global frame.
    pub fn define_global(&mut self, name: &str, value: Value) {
        let name = self.interner.intern(name);
        self.env.define_global(name, value);
    }

    /// Read a global binding.
    pub fn global(&self, name: &str) -> Option<Value> {
        self.env.get_global(self.interner.intern(name))
    }

    /// Register a native function as a global.
    pub fn register_native(&mut self, native: NativeFunction) {
        let name = self.interner.intern(native.name);
        tracing::trace!(name = native.name, arity = native.arity, "registering native");
        self.env
            .define_global(name, Value::Callable(Callable::native(native)));
    }

    /// Rebind a method to `receiver`, tracking the new closure frame so it
    /// is reclaimed with the rest of the environment.
    pub fn bind(&mut self, function: &UserFunction, receiver: Value) -> Callable {
        let bound = function.bind(self.names.this, receiver);
        self.env.track(&bound.closure);
        Callable::user(bound)
    }

    pub fn interner(&self) -> &'a StringInterner {
        self.interner
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn globals(&self) -> &FrameRef {
        self.env.globals()
    }

    pub fn mode(&self) -> EvalMode {
        self.mode
    }

    pub fn call_depth(&self) -> usize {
        self.call_stack.depth()
    }

    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print_handler
    }

    pub fn reporter(&self) -> &SharedReporter {
        &self.reporter
    }

    /// Captured `print` output (buffer handlers only).
    pub fn get_print_output(&self) -> String {
        self.print_handler.output()
    }

    pub fn clear_print_output(&self) {
        self.print_handler.clear();
    }
}
