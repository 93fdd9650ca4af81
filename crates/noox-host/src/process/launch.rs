//! Supervises bridge startup and runtime orchestration.

use std::io::{self, BufReader, Write};
use std::process::ExitCode;
use std::sync::Arc;

use noox_config::Config;
use tracing::info;

use crate::bootstrap::{ConfiguredWifiInfo, WifiInfoProvider};
use crate::bridge::{Bridge, BridgeIo};
use crate::console::Console;
use crate::context::BridgeContext;
use crate::dispatch::Outbound;
use crate::executor::ShellExecutor;
use crate::health::{HealthReporter, StructuredHealthReporter};
use crate::telemetry;
use crate::transport::{self, LinkWriter};

use super::PROCESS_TARGET;
use super::errors::LaunchError;
use super::shutdown::{ShutdownSignal, SystemShutdownSignal};

/// Runs the bridge with the production collaborators until a termination
/// signal arrives.
///
/// Startup failures are written to `stderr` and yield a failure status.
pub fn run(config: &Config, stderr: &mut dyn Write) -> ExitCode {
    let result = telemetry::initialise(config)
        .map_err(LaunchError::from)
        .and_then(|_| {
            let reporter: Arc<dyn HealthReporter> = Arc::new(StructuredHealthReporter::new());
            run_bridge(config, &reporter, &SystemShutdownSignal::new())
        });
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let _ = writeln!(stderr, "noox-host: {error}");
            ExitCode::FAILURE
        }
    }
}

/// Connects to the device and serves it until `shutdown` fires.
///
/// Console input comes from stdin and display goes to stdout.
///
/// # Errors
///
/// Returns [`LaunchError`] when the link cannot be opened, a loop thread
/// cannot be started, or waiting for shutdown fails.
pub fn run_bridge(
    config: &Config,
    reporter: &Arc<dyn HealthReporter>,
    shutdown: &dyn ShutdownSignal,
) -> Result<(), LaunchError> {
    reporter.startup_starting(config);
    let link = transport::connect(config)
        .map_err(LaunchError::from)
        .inspect_err(|error| reporter.startup_failed(error))?;
    reporter.device_connected(&link.port_name);

    let bridge_io = BridgeIo {
        link_reader: link.reader,
        operator_input: Box::new(BufReader::new(io::stdin())),
        console: Console::stdout(),
        executor: Arc::new(ShellExecutor::new()),
    };
    let wifi_info = ConfiguredWifiInfo::from_config(config);
    serve(bridge_io, link.writer, config, &wifi_info, reporter, shutdown)
}

/// Runs an already connected bridge until `shutdown` fires.
pub(crate) fn serve(
    io: BridgeIo,
    link_writer: LinkWriter,
    config: &Config,
    wifi_info: &dyn WifiInfoProvider,
    reporter: &Arc<dyn HealthReporter>,
    shutdown: &dyn ShutdownSignal,
) -> Result<(), LaunchError> {
    let context = BridgeContext::from_config(Outbound::new(link_writer), config);
    let (bridge, _) = Bridge::start(io, &context, wifi_info, reporter)?;

    let waited = shutdown.wait();
    if waited.is_ok() {
        reporter.shutdown_requested();
    }
    let summary = bridge.stop()?;
    waited?;
    info!(
        target: PROCESS_TARGET,
        reader_routed = summary.as_ref().map_or(0, |summary| summary.routed),
        "shutdown sequence completed"
    );
    Ok(())
}
