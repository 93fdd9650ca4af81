//! Host-side bridge for a Noox device attached over a serial link.
//!
//! The bridge speaks line-delimited JSON with the device. Commands the
//! device asks for are run in the host shell and their output is sent back;
//! assistant replies, link test results and device errors are shown on the
//! console; every line the operator types is forwarded to the device.
//!
//! At startup the bridge runs a short handshake: it sends a link test and,
//! when the device reported its WiFi as disconnected, pushes the host's
//! WiFi credentials. After that the process stays up until it receives a
//! termination signal, even if the device link or the console closes.
//!
//! Writes to the link from every thread go through a single
//! [`Outbound`] dispatcher, so concurrent messages never interleave.

mod bootstrap;
mod bridge;
mod console;
mod context;
mod dispatch;
mod executor;
mod health;
mod operator;
mod process;
mod protocol;
mod tasks;
mod telemetry;
mod transport;

pub use bootstrap::{
    BootstrapOutcome, BootstrapSequencer, ConfiguredWifiInfo, WifiInfoError, WifiInfoProvider,
};
pub use bridge::{Bridge, BridgeIo};
pub use console::Console;
pub use context::BridgeContext;
pub use dispatch::{Outbound, ReaderExit, ReaderSummary, ResponseRouter, SendError, run_reader_loop};
pub use executor::{CommandExecutor, ShellExecutor};
pub use health::{HealthReporter, StructuredHealthReporter};
pub use operator::{OperatorExit, OperatorSummary, run_operator_loop};
pub use process::{
    LaunchError, ShutdownError, ShutdownSignal, SystemShutdownSignal, run, run_bridge,
};
pub use protocol::{
    CodecError, DeviceMessage, InboundMessage, OutboundKind, OutboundMessage, RequestId,
    ShellResult, ShellStatus, WifiCredentials, decode,
};
pub use tasks::{LoopHandle, TaskError};
pub use telemetry::{TelemetryError, TelemetryHandle, initialise as initialise_telemetry};
pub use transport::{
    DeviceLink, LinkReader, LinkWriter, READ_POLL_INTERVAL, TransportError, connect,
    discover_port, open, select_port,
};

#[cfg(test)]
mod tests;
