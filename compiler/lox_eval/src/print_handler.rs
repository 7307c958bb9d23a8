//! Destination for `print` output.
//!
//! - `Stdout`: the process's standard output (scripts, REPL)
//! - `Buffer`: captured text (tests, embedding hosts)
//! - `Silent`: discarded
//!
//! Enum dispatch keeps the per-statement path free of vtable calls.

use std::sync::Arc;

use parking_lot::Mutex;

/// Print handler implementation using enum dispatch.
pub enum PrintHandlerImpl {
    Stdout,
    Buffer(Mutex<String>),
    Silent,
}

impl PrintHandlerImpl {
    /// Write one line: the text followed by a line break.
    pub fn println(&self, line: &str) {
        match self {
            Self::Stdout => println!("{line}"),
            Self::Buffer(buffer) => {
                let mut buffer = buffer.lock();
                buffer.push_str(line);
                buffer.push('\n');
            }
            Self::Silent => {}
        }
    }

    /// Captured output so far; empty for handlers that don't capture.
    pub fn output(&self) -> String {
        match self {
            Self::Buffer(buffer) => buffer.lock().clone(),
            Self::Stdout | Self::Silent => String::new(),
        }
    }

    /// Return and clear the captured output.
    pub fn take_output(&self) -> String {
        match self {
            Self::Buffer(buffer) => std::mem::take(&mut *buffer.lock()),
            Self::Stdout | Self::Silent => String::new(),
        }
    }

    pub fn clear(&self) {
        if let Self::Buffer(buffer) = self {
            buffer.lock().clear();
        }
    }

    pub fn captures(&self) -> bool {
        matches!(self, Self::Buffer(_))
    }
}

/// Shared print handler that can be handed to several interpreters.
pub type SharedPrintHandler = Arc<PrintHandlerImpl>;

pub fn stdout_handler() -> SharedPrintHandler {
    Arc::new(PrintHandlerImpl::Stdout)
}

pub fn buffer_handler() -> SharedPrintHandler {
    Arc::new(PrintHandlerImpl::Buffer(Mutex::new(String::new())))
}

pub fn silent_handler() -> SharedPrintHandler {
    Arc::new(PrintHandlerImpl::Silent)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;

    #[test]
    fn buffer_appends_one_line_per_call() {
        let handler = buffer_handler();
        handler.println("a");
        handler.println("b");
        assert_eq!(handler.output(), "a\nb\n");
        assert!(handler.captures());
    }

    #[test]
    fn take_output_drains_buffer() {
        let handler = buffer_handler();
        handler.println("first");
        assert_eq!(handler.take_output(), "first\n");
        assert_eq!(handler.output(), "");
    }

    #[test]
    fn silent_and_stdout_capture_nothing() {
        let silent = silent_handler();
        silent.println("dropped");
        assert_eq!(silent.output(), "");
        assert!(!stdout_handler().captures());
    }

    #[test]
    fn shared_buffer_is_thread_safe() {
        let handler = buffer_handler();
        let other = Arc::clone(&handler);
        let worker = std::thread::spawn(move || {
            for _ in 0..50 {
                other.println("x");
            }
        });
        for _ in 0..50 {
            handler.println("y");
        }
        worker.join().unwrap();
        assert_eq!(handler.output().lines().count(), 100);
    }
}
