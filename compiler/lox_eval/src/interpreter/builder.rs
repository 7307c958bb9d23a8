//! `InterpreterBuilder` for creating Interpreter instances with various configurations.

use lox_ir::StringInterner;

use super::{InternedNames, Interpreter};
use crate::diagnostics::CallStack;
use crate::eval_mode::EvalMode;
use crate::natives::PRELUDE;
use crate::resolver::ResolvedProgram;
use crate::{
    buffer_handler, buffer_reporter, stderr_reporter, stdout_handler, Environment,
    SharedPrintHandler, SharedReporter,
};

/// Builder for creating Interpreter instances with various configurations.
///
/// The mode decides the defaults:
/// - `EvalMode::Interpret`: stdout, stderr, unbounded call depth
/// - `EvalMode::TestRun`: buffered output and reports, bounded call depth
pub struct InterpreterBuilder<'a> {
    interner: &'a StringInterner,
    mode: EvalMode,
    print_handler: Option<SharedPrintHandler>,
    reporter: Option<SharedReporter>,
    max_call_depth: Option<Option<usize>>,
    prelude: bool,
}

impl<'a> InterpreterBuilder<'a> {
    /// Create a new builder with default `Interpret` mode.
    pub fn new(interner: &'a StringInterner) -> Self {
        Self {
            interner,
            mode: EvalMode::default(),
            print_handler: None,
            reporter: None,
            max_call_depth: None,
            prelude: true,
        }
    }

    #[must_use]
    pub fn mode(mut self, mode: EvalMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the destination of `print`. Overrides the mode-based default.
    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    /// Set where errors are reported. Overrides the mode-based default.
    #[must_use]
    pub fn reporter(mut self, reporter: SharedReporter) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Bound nested user-function calls; `None` lifts the bound.
    #[must_use]
    pub fn max_call_depth(mut self, depth: Option<usize>) -> Self {
        self.max_call_depth = Some(depth);
        self
    }

    /// Start with an empty global frame (no `clock`).
    #[must_use]
    pub fn without_prelude(mut self) -> Self {
        self.prelude = false;
        self
    }

    /// Build the interpreter.
    pub fn build(self) -> Interpreter<'a> {
        let print_handler = self.print_handler.unwrap_or_else(|| {
            if self.mode.allows_io() {
                stdout_handler()
            } else {
                buffer_handler()
            }
        });
        let reporter = self.reporter.unwrap_or_else(|| match self.mode {
            EvalMode::Interpret => stderr_reporter(),
            EvalMode::TestRun => buffer_reporter(),
        });
        let max_depth = self
            .max_call_depth
            .unwrap_or_else(|| self.mode.max_call_depth());

        let mut interpreter = Interpreter {
            interner: self.interner,
            env: Environment::new(),
            program: ResolvedProgram::default(),
            print_handler,
            reporter,
            call_stack: CallStack::new(max_depth),
            mode: self.mode,
            names: InternedNames::new(self.interner),
        };

        if self.prelude {
            for native in PRELUDE {
                interpreter.register_native(*native);
            }
        }
        tracing::debug!(mode = ?self.mode, max_depth = ?max_depth, "interpreter built");
        interpreter
    }
}
