//! Host hook for reporting errors.
//!
//! The interpreter reports each unrecovered runtime error, and each
//! resolution error, exactly once through a [`SharedReporter`]. Hosts pick
//! a destination the same way they pick a print handler, or install their
//! own callback.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::errors::{EvalBacktrace, EvalError};
use crate::resolver::ResolveError;

/// An error as delivered to the host: source line plus fixed message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportedError {
    pub line: Option<u32>,
    pub message: String,
    pub backtrace: EvalBacktrace,
}

impl From<&EvalError> for ReportedError {
    fn from(err: &EvalError) -> Self {
        ReportedError {
            line: err.line(),
            message: err.message(),
            backtrace: err.backtrace.clone(),
        }
    }
}

impl From<&ResolveError> for ReportedError {
    fn from(err: &ResolveError) -> Self {
        ReportedError {
            line: Some(err.span.line),
            message: err.kind.to_string(),
            backtrace: EvalBacktrace::default(),
        }
    }
}

impl fmt::Display for ReportedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "[line {line}] Error: {}", self.message),
            None => write!(f, "Error: {}", self.message),
        }
    }
}

/// Host callback type for [`ErrorReporterImpl::Custom`].
pub type ReportFn = Box<dyn Fn(&ReportedError) + Send + Sync>;

/// Error reporter implementation using enum dispatch.
pub enum ErrorReporterImpl {
    /// Writes `[line N] Error: message` and any backtrace to stderr.
    Stderr,
    /// Collects reports for later inspection.
    Buffer(Mutex<Vec<ReportedError>>),
    Silent,
    Custom(ReportFn),
}

impl ErrorReporterImpl {
    pub fn report(&self, error: ReportedError) {
        match self {
            Self::Stderr => {
                eprintln!("{error}");
                if !error.backtrace.is_empty() {
                    eprint!("{}", error.backtrace);
                }
            }
            Self::Buffer(reports) => reports.lock().push(error),
            Self::Silent => {}
            Self::Custom(callback) => callback(&error),
        }
    }

    pub fn report_eval(&self, error: &EvalError) {
        self.report(error.into());
    }

    pub fn report_resolve(&self, errors: &[ResolveError]) {
        for error in errors {
            self.report(error.into());
        }
    }

    /// Reports collected so far; empty for non-buffering reporters.
    pub fn reported(&self) -> Vec<ReportedError> {
        match self {
            Self::Buffer(reports) => reports.lock().clone(),
            _ => Vec::new(),
        }
    }

    pub fn clear(&self) {
        if let Self::Buffer(reports) = self {
            reports.lock().clear();
        }
    }
}

pub type SharedReporter = Arc<ErrorReporterImpl>;

pub fn stderr_reporter() -> SharedReporter {
    Arc::new(ErrorReporterImpl::Stderr)
}

pub fn buffer_reporter() -> SharedReporter {
    Arc::new(ErrorReporterImpl::Buffer(Mutex::new(Vec::new())))
}

pub fn silent_reporter() -> SharedReporter {
    Arc::new(ErrorReporterImpl::Silent)
}

pub fn custom_reporter(callback: impl Fn(&ReportedError) + Send + Sync + 'static) -> SharedReporter {
    Arc::new(ErrorReporterImpl::Custom(Box::new(callback)))
}
