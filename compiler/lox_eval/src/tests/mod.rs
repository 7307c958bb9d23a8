//! End-to-end tests driving the interpreter with hand-built programs.

mod control_tests;

use lox_ir::StringInterner;

use crate::test_helpers::ProgramBuilder;
use crate::{EvalError, EvalMode, Interpreter, InterpreterBuilder, RunError};

pub(super) fn test_interpreter(interner: &StringInterner) -> Interpreter<'_> {
    InterpreterBuilder::new(interner)
        .mode(EvalMode::TestRun)
        .build()
}

/// Outcome of one batch run in a fresh interpreter.
pub(super) struct Run {
    pub(super) output: String,
    pub(super) result: Result<(), RunError>,
}

pub(super) fn run(build: impl FnOnce(&mut ProgramBuilder<'_>)) -> Run {
    let interner = StringInterner::new();
    let mut b = ProgramBuilder::new(&interner);
    build(&mut b);
    let mut interpreter = test_interpreter(&interner);
    let result = interpreter.run(&b.finish());
    Run {
        output: interpreter.get_print_output(),
        result,
    }
}

/// Run a program expected to succeed and return what it printed.
pub(super) fn output_of(build: impl FnOnce(&mut ProgramBuilder<'_>)) -> String {
    let run = run(build);
    if let Err(err) = run.result {
        panic!("program failed: {err:?}");
    }
    run.output
}

/// Run a program expected to fail at run time.
pub(super) fn runtime_error(build: impl FnOnce(&mut ProgramBuilder<'_>)) -> (String, EvalError) {
    let run = run(build);
    match run.result {
        Err(RunError::Runtime(err)) => (run.output, err),
        other => panic!("expected a runtime error, got {other:?}"),
    }
}
