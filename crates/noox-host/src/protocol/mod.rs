//! Line-delimited JSON messages exchanged with the device.
//!
//! Every message occupies exactly one line on the wire. The host sends
//! [`OutboundMessage`] values:
//!
//! ```json
//! {"requestId":"6f0c...","type":"linkTest","payload":"ping"}
//! ```
//!
//! and the device answers with loosely structured [`InboundMessage`] records
//! whose payload shape depends on their `type` tag:
//!
//! ```json
//! {"requestId":"r1","type":"shellCommand","payload":"echo hi"}
//! ```
//!
//! Inbound records are decoded leniently: every field is optional, and the
//! tag is only interpreted by [`InboundMessage::classify`], which checks the
//! payload shape for recognised tags and passes everything else through.

mod errors;
mod inbound;
mod outbound;

pub use errors::CodecError;
pub use inbound::{DeviceMessage, InboundMessage, decode};
pub use outbound::{
    OutboundKind, OutboundMessage, RequestId, ShellResult, ShellStatus, WifiCredentials,
};
