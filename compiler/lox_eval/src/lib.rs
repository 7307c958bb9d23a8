//! Lox Eval - tree-walking evaluation core for Lox.
//!
//! Consumes an already-parsed [`lox_ir::Program`] and executes it directly.
//!
//! # Architecture
//!
//! - [`Resolver`]: static pre-pass computing the scope distance of every
//!   local variable reference (globals stay dynamically bound)
//! - [`Environment`]: chain of [`Frame`]s with both name-walk and
//!   distance-addressed access
//! - [`Interpreter`]: single `match` per node kind over the flat AST,
//!   statements return [`ExecResult`] so `return` unwinds as
//!   [`ControlAction::Return`] and never as an error
//! - [`Callable`]: native functions and user closures
//!
//! Output goes through a [`SharedPrintHandler`]; runtime and resolution
//! failures go through a [`SharedReporter`] exactly once.

mod diagnostics;
mod environment;
pub mod errors;
mod eval_mode;
mod function;
pub mod interpreter;
mod logging;
pub mod natives;
mod operators;
mod print_handler;
mod reporter;
pub mod resolver;
mod stack;
mod value;

#[cfg(test)]
mod test_helpers;
#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;

pub use diagnostics::{CallFrame, CallStack};
pub use environment::{AssignError, Environment, Frame, FrameRef, WeakFrameRef};
pub use errors::{
    BacktraceFrame, ControlAction, EvalBacktrace, EvalError, EvalErrorKind, EvalResult,
    ExecResult,
};
pub use eval_mode::EvalMode;
pub use function::{Callable, NativeFn, NativeFunction, UserFunction};
pub use interpreter::{Interpreter, InterpreterBuilder, RunError};
pub use logging::init_tracing;
pub use operators::{evaluate_binary, evaluate_unary};
pub use print_handler::{
    buffer_handler, silent_handler, stdout_handler, PrintHandlerImpl, SharedPrintHandler,
};
pub use reporter::{
    buffer_reporter, custom_reporter, silent_reporter, stderr_reporter, ErrorReporterImpl,
    ReportedError, SharedReporter,
};
pub use resolver::{ResolveError, ResolveErrorKind, ResolvedProgram, Resolutions, Resolver};
pub use stack::ensure_sufficient_stack;
pub use value::{format_number, Value};
