//! Output sink for `print` and `println`.
//!
//! Programs normally write to stdout; embedders and tests capture output in
//! a buffer instead, or discard it.

use std::io::Write as _;
use std::sync::Arc;

use parking_lot::Mutex;

/// Where program output goes.
pub enum PrintHandler {
    /// Write through to stdout, flushing after every call so partial lines
    /// appear immediately.
    Stdout,
    /// Accumulate into an in-memory buffer.
    Buffer(Mutex<String>),
    /// Drop everything.
    Silent,
}

impl PrintHandler {
    /// Write `text` without a trailing newline.
    pub fn print(&self, text: &str) {
        match self {
            Self::Stdout => {
                let mut out = std::io::stdout().lock();
                // A closed stdout must not abort the program.
                let _ = out.write_all(text.as_bytes());
                let _ = out.flush();
            }
            Self::Buffer(buf) => buf.lock().push_str(text),
            Self::Silent => {}
        }
    }

    /// Write `text` followed by a newline.
    pub fn println(&self, text: &str) {
        match self {
            Self::Stdout => {
                let mut out = std::io::stdout().lock();
                let _ = writeln!(out, "{text}");
            }
            Self::Buffer(buf) => {
                let mut buf = buf.lock();
                buf.push_str(text);
                buf.push('\n');
            }
            Self::Silent => {}
        }
    }

    /// Captured output; empty unless this is a buffer.
    pub fn output(&self) -> String {
        match self {
            Self::Buffer(buf) => buf.lock().clone(),
            Self::Stdout | Self::Silent => String::new(),
        }
    }

    /// Discard captured output.
    pub fn clear(&self) {
        if let Self::Buffer(buf) = self {
            buf.lock().clear();
        }
    }
}

/// Print handler shared between the interpreter and its embedder.
pub type SharedPrintHandler = Arc<PrintHandler>;

pub fn stdout_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Stdout)
}

/// A capturing handler; read it back with [`PrintHandler::output`].
pub fn buffer_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Buffer(Mutex::new(String::new())))
}

pub fn silent_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Silent)
}
