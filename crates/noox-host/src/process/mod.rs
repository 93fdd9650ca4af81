//! Process lifecycle: startup, steady state and signal-driven shutdown.

mod errors;
pub(crate) mod launch;
mod shutdown;

pub use errors::LaunchError;
pub use launch::{run, run_bridge};
pub use shutdown::{ShutdownError, ShutdownSignal, SystemShutdownSignal};

pub(crate) const PROCESS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::process");
