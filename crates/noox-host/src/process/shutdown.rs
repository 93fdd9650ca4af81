//! Waiting for the operator or the service manager to stop the bridge.

use std::io;

#[cfg(unix)]
use signal_hook::consts::TERM_SIGNALS;
#[cfg(unix)]
use signal_hook::consts::signal::SIGHUP;
#[cfg(unix)]
use signal_hook::iterator::Signals;
use thiserror::Error;
#[cfg(unix)]
use tracing::info;

#[cfg(unix)]
use super::PROCESS_TARGET;

/// Blocks the main thread until the bridge should stop.
pub trait ShutdownSignal: Send + Sync {
    /// Returns once a stop has been requested.
    ///
    /// # Errors
    ///
    /// Returns [`ShutdownError`] if the listener cannot be registered.
    fn wait(&self) -> Result<(), ShutdownError>;
}

/// Failure to listen for a stop request.
#[derive(Debug, Error)]
pub enum ShutdownError {
    /// Signal handlers could not be registered.
    #[error("could not register signal handlers: {source}")]
    Register {
        /// Registration error from the OS.
        #[source]
        source: io::Error,
    },
}

/// Listens for process termination signals.
///
/// Unix builds return on SIGTERM, SIGINT, SIGQUIT or SIGHUP. Other
/// platforms never return; the process is ended externally.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemShutdownSignal;

impl SystemShutdownSignal {
    /// Creates the listener. Handlers are registered on [`ShutdownSignal::wait`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ShutdownSignal for SystemShutdownSignal {
    #[cfg(unix)]
    fn wait(&self) -> Result<(), ShutdownError> {
        let watched = TERM_SIGNALS.iter().copied().chain([SIGHUP]);
        let mut signals =
            Signals::new(watched).map_err(|source| ShutdownError::Register { source })?;
        let received = signals.wait().next();
        info!(target: PROCESS_TARGET, signal = ?received, "stop requested");
        Ok(())
    }

    #[cfg(not(unix))]
    fn wait(&self) -> Result<(), ShutdownError> {
        loop {
            std::thread::park();
        }
    }
}
