//! Errors that end the process with a failure status.

use thiserror::Error;

use crate::tasks::TaskError;
use crate::telemetry::TelemetryError;
use crate::transport::TransportError;

use super::shutdown::ShutdownError;

/// Fatal startup or supervision failures.
///
/// Everything else the bridge encounters is logged and survived.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// Logging could not be set up.
    #[error("could not start logging: {source}")]
    Telemetry {
        /// Cause.
        #[from]
        source: TelemetryError,
    },
    /// The device link could not be opened.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// A bridge loop could not be started, or panicked.
    #[error("bridge loop failed: {source}")]
    Task {
        /// Cause.
        #[from]
        source: TaskError,
    },
    /// The stop listener could not be registered.
    #[error("could not listen for stop signals: {source}")]
    Shutdown {
        /// Cause.
        #[from]
        source: ShutdownError,
    },
}
