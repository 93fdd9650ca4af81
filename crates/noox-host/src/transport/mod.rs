//! Serial link to the device.
//!
//! The transport locates the device (or honours an explicit port), opens it
//! with fixed 8N1 framing, and splits the handle into independent read and
//! write halves so one thread can block on reads while others write.

mod discovery;
mod errors;
mod serial;

use std::io::{Read, Write};

use noox_config::Config;
use tracing::info;

pub use discovery::{discover_port, select_port};
pub use errors::TransportError;
pub use serial::{READ_POLL_INTERVAL, open};

pub(crate) const TRANSPORT_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::transport");

/// Boxed read half of a device link.
pub type LinkReader = Box<dyn Read + Send>;

/// Boxed write half of a device link.
pub type LinkWriter = Box<dyn Write + Send>;

/// Both halves of an open device link.
pub struct DeviceLink {
    /// Name of the underlying port, for diagnostics.
    pub port_name: String,
    /// Byte source owned by the inbound reader loop.
    pub reader: LinkReader,
    /// Byte sink owned by the outbound dispatcher.
    pub writer: LinkWriter,
}

impl std::fmt::Debug for DeviceLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceLink")
            .field("port_name", &self.port_name)
            .finish_non_exhaustive()
    }
}

/// Opens the configured port, or the first discovered device when no port
/// was configured.
///
/// # Errors
///
/// Returns a [`TransportError`] when discovery finds nothing or the port
/// cannot be opened.
pub fn connect(config: &Config) -> Result<DeviceLink, TransportError> {
    let port_name = match config.port() {
        Some(port) => port.to_owned(),
        None => discover_port()?,
    };
    let link = open(&port_name, config.baud_rate())?;
    info!(
        target: TRANSPORT_TARGET,
        port = %link.port_name,
        baud_rate = config.baud_rate(),
        "serial link open"
    );
    Ok(link)
}
