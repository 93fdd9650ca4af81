//! Locating the device among the host's serial ports.

use serialport::{SerialPortInfo, SerialPortType};
use tracing::{debug, info};

use super::{TRANSPORT_TARGET, TransportError};

/// USB vendor identifier assigned to Espressif.
const ESPRESSIF_VID: u16 = 0x303A;

/// Product string fragments that identify the device's CDC interface.
const PRODUCT_MARKERS: &[&str] = &["ESP32-S3", "USB Serial Device"];

/// Enumerates the system's serial ports and returns the device's port name.
///
/// # Errors
///
/// Returns [`TransportError::Enumerate`] if the ports cannot be listed and
/// [`TransportError::NotFound`] if none of them looks like the device.
pub fn discover_port() -> Result<String, TransportError> {
    let ports =
        serialport::available_ports().map_err(|source| TransportError::Enumerate { source })?;
    debug!(
        target: TRANSPORT_TARGET,
        candidates = ports.len(),
        "enumerated serial ports"
    );
    let selected = select_port(&ports).ok_or(TransportError::NotFound {
        candidates: ports.len(),
    })?;
    info!(
        target: TRANSPORT_TARGET,
        port = %selected.port_name,
        "found device serial port"
    );
    Ok(selected.port_name.clone())
}

/// Returns the first port whose USB descriptors match the device.
#[must_use]
pub fn select_port(ports: &[SerialPortInfo]) -> Option<&SerialPortInfo> {
    ports.iter().find(|port| is_device(port))
}

fn is_device(port: &SerialPortInfo) -> bool {
    match &port.port_type {
        SerialPortType::UsbPort(usb) => {
            usb.vid == ESPRESSIF_VID
                || usb.product.as_deref().is_some_and(|product| {
                    PRODUCT_MARKERS
                        .iter()
                        .any(|marker| product.contains(marker))
                })
        }
        _ => false,
    }
}
