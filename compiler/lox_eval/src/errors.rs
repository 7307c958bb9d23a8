//! Runtime errors and the control signal used for `return`.
//!
//! Factory functions (e.g. [`undefined_variable`]) are the public API for
//! building errors; they fix the message text through the kind's `Display`.
//! Call sites attach the failing token's span with [`EvalError::with_span`].

use std::fmt;

use lox_ir::{BinaryOp, Span};

use crate::Value;

/// Result of evaluating an expression.
pub type EvalResult = Result<Value, EvalError>;

/// Result of executing a statement.
///
/// `Err` is either a runtime error or a `return` unwinding towards the
/// nearest enclosing call.
pub type ExecResult = Result<(), ControlAction>;

/// Typed runtime error category.
///
/// `Display` produces the fixed, user-facing message for each category.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalErrorKind {
    // Access
    #[error("Undefined variable '{name}'.")]
    UndefinedVariable { name: String },

    // Type/Operator
    #[error("Operand must be a number.")]
    OperandMustBeNumber,
    #[error("Operands of '{op}' must be numbers.")]
    OperandsMustBeNumbers { op: &'static str },
    #[error("Operands of '+' must be two numbers or two strings.")]
    OperandsMustBeNumbersOrStrings,

    // Function
    #[error("Can only call functions and classes.")]
    NotCallable { type_name: &'static str },
    #[error("Expected {expected} arguments but got {got}.")]
    ArityMismatch { expected: usize, got: usize },
    #[error("Stack overflow: call depth exceeded {depth}.")]
    StackOverflow { depth: usize },
    #[error("{name}: {message}")]
    Native { name: String, message: String },

    // Control flow
    #[error("Can't return from top-level code.")]
    ReturnOutsideFunction,

    /// The resolver recorded a distance at which no binding exists.
    /// Always an evaluator defect, never a user error.
    #[error("Internal error: no binding for '{name}' at scope distance {distance}.")]
    UnresolvedLocal { name: String, distance: usize },
}

/// A single frame in an evaluation backtrace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BacktraceFrame {
    /// Function name.
    pub name: String,
    /// Source location of the call site.
    pub span: Option<Span>,
}

/// Snapshot of the call stack at an error site, most recent call first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EvalBacktrace {
    frames: Vec<BacktraceFrame>,
}

impl EvalBacktrace {
    pub fn new(frames: Vec<BacktraceFrame>) -> Self {
        Self { frames }
    }

    pub fn frames(&self) -> &[BacktraceFrame] {
        &self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }
}

impl fmt::Display for EvalBacktrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, frame) in self.frames.iter().enumerate() {
            write!(f, "  {i}: {}()", frame.name)?;
            if let Some(span) = frame.span {
                write!(f, " called at {span}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Runtime error with the position of the offending token.
#[derive(Clone, Debug)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    /// Location of the token the error is reported against.
    pub span: Option<Span>,
    /// Call chain at the error site; empty for top-level errors.
    pub backtrace: EvalBacktrace,
}

impl EvalError {
    #[cold]
    pub fn new(kind: EvalErrorKind) -> Self {
        Self {
            kind,
            span: None,
            backtrace: EvalBacktrace::default(),
        }
    }

    /// Attach a span unless one is already present.
    ///
    /// The innermost site wins: an error raised inside a callee keeps its
    /// own location when it passes through the caller's call expression.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        if self.span.is_none() {
            self.span = Some(span);
        }
        self
    }

    #[must_use]
    pub fn with_backtrace(mut self, backtrace: EvalBacktrace) -> Self {
        self.backtrace = backtrace;
        self
    }

    /// The fixed human-readable message.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    /// Source line of the offending token, if known.
    pub fn line(&self) -> Option<u32> {
        self.span.map(|span| span.line)
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for EvalError {}

/// Non-local outcome of executing a statement.
///
/// `Return` is not an error: it is caught at the nearest call boundary and
/// becomes the call's value. Only `Error` reaches the top-level loop.
#[derive(Clone, Debug)]
pub enum ControlAction {
    Error(Box<EvalError>),
    Return(Value),
}

impl ControlAction {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Convert into an error, treating a stray `Return` as a top-level return.
    pub fn into_eval_error(self) -> EvalError {
        match self {
            Self::Error(err) => *err,
            Self::Return(_) => return_outside_function(),
        }
    }
}

impl From<EvalError> for ControlAction {
    #[inline]
    fn from(err: EvalError) -> Self {
        Self::Error(Box::new(err))
    }
}

// Factories

#[cold]
pub fn undefined_variable(name: &str) -> EvalError {
    EvalError::new(EvalErrorKind::UndefinedVariable {
        name: name.to_owned(),
    })
}

#[cold]
pub fn operand_must_be_number() -> EvalError {
    EvalError::new(EvalErrorKind::OperandMustBeNumber)
}

#[cold]
pub fn operands_must_be_numbers(op: BinaryOp) -> EvalError {
    EvalError::new(EvalErrorKind::OperandsMustBeNumbers {
        op: op.as_symbol(),
    })
}

#[cold]
pub fn operands_must_be_numbers_or_strings() -> EvalError {
    EvalError::new(EvalErrorKind::OperandsMustBeNumbersOrStrings)
}

#[cold]
pub fn not_callable(type_name: &'static str) -> EvalError {
    EvalError::new(EvalErrorKind::NotCallable { type_name })
}

#[cold]
pub fn arity_mismatch(expected: usize, got: usize) -> EvalError {
    EvalError::new(EvalErrorKind::ArityMismatch { expected, got })
}

#[cold]
pub fn stack_overflow(depth: usize) -> EvalError {
    EvalError::new(EvalErrorKind::StackOverflow { depth })
}

#[cold]
pub fn native_error(name: &str, message: impl Into<String>) -> EvalError {
    EvalError::new(EvalErrorKind::Native {
        name: name.to_owned(),
        message: message.into(),
    })
}

#[cold]
pub fn return_outside_function() -> EvalError {
    EvalError::new(EvalErrorKind::ReturnOutsideFunction)
}

#[cold]
pub fn unresolved_local(name: &str, distance: usize) -> EvalError {
    EvalError::new(EvalErrorKind::UnresolvedLocal {
        name: name.to_owned(),
        distance,
    })
}
