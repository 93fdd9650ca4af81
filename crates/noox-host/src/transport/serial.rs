//! Opening the serial port with the device's fixed framing.

use std::time::Duration;

use serialport::{DataBits, FlowControl, Parity, StopBits};

use super::{DeviceLink, TransportError};

/// Read timeout on the serial handle.
///
/// Reads that time out are retried by the reader loop, which uses the gap
/// to observe its cancellation flag.
pub const READ_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Opens `port_name` at `baud_rate` with 8 data bits, no parity, one stop
/// bit and no flow control.
///
/// # Errors
///
/// Returns [`TransportError::Open`] if the port cannot be opened and
/// [`TransportError::Clone`] if the handle cannot be duplicated.
pub fn open(port_name: &str, baud_rate: u32) -> Result<DeviceLink, TransportError> {
    let port = serialport::new(port_name, baud_rate)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .flow_control(FlowControl::None)
        .timeout(READ_POLL_INTERVAL)
        .open()
        .map_err(|source| TransportError::Open {
            port: port_name.to_owned(),
            source,
        })?;
    let writer = port.try_clone().map_err(|source| TransportError::Clone {
        port: port_name.to_owned(),
        source,
    })?;
    Ok(DeviceLink {
        port_name: port_name.to_owned(),
        reader: Box::new(port),
        writer: Box::new(writer),
    })
}
