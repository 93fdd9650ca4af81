//! Error types for locating and opening the serial link.

use thiserror::Error;

/// Errors surfaced while establishing the device link.
///
/// All of these abort startup.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Listing the system's serial ports failed.
    #[error("failed to enumerate serial ports: {source}")]
    Enumerate {
        #[source]
        source: serialport::Error,
    },
    /// No port matched the device descriptors.
    #[error(
        "no device serial port found among {candidates} candidate(s); \
         connect the device or pass --port"
    )]
    NotFound {
        /// Number of ports that were inspected.
        candidates: usize,
    },
    /// The port exists but could not be opened.
    #[error("failed to open serial port {port}: {source}")]
    Open {
        /// Port path.
        port: String,
        #[source]
        source: serialport::Error,
    },
    /// The port handle could not be split into read and write halves.
    #[error("failed to clone serial port handle {port}: {source}")]
    Clone {
        /// Port path.
        port: String,
        #[source]
        source: serialport::Error,
    },
}
