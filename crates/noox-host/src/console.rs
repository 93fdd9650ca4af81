//! Operator-facing display sink.
//!
//! Device output shown to the operator is not logging: it is written as
//! plain prefixed lines to the console, separate from the structured
//! telemetry on stderr.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

/// Shared, line-oriented writer for operator display.
#[derive(Clone)]
pub struct Console {
    sink: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl Console {
    /// Wraps an arbitrary writer.
    pub fn new(sink: impl Write + Send + 'static) -> Self {
        Self {
            sink: Arc::new(Mutex::new(Box::new(sink))),
        }
    }

    /// Console bound to the process's standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Writes `text` followed by a newline and flushes.
    ///
    /// Display failures are ignored; a closed stdout must not stop the
    /// bridge.
    pub fn line(&self, text: impl AsRef<str>) {
        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writeln!(sink, "{}", text.as_ref());
        let _ = sink.flush();
    }
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console").finish_non_exhaustive()
    }
}
