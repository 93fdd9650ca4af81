//! Lifecycle notifications for the bridge process.

use std::sync::Arc;

use noox_config::Config;

use crate::bootstrap::BootstrapOutcome;
use crate::dispatch::ReaderSummary;
use crate::operator::OperatorSummary;
use crate::process::LaunchError;

pub(crate) const HEALTH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::health");

/// Receives lifecycle milestones from startup to shutdown.
pub trait HealthReporter: Send + Sync {
    /// Invoked before the device link is opened.
    fn startup_starting(&self, config: &Config);

    /// Invoked once the serial link is open.
    fn device_connected(&self, port_name: &str);

    /// Invoked when startup fails and the process is about to exit.
    fn startup_failed(&self, error: &LaunchError);

    /// Invoked after the bootstrap handshake finishes.
    fn bootstrap_completed(&self, outcome: &BootstrapOutcome);

    /// Invoked when the inbound reader loop stops.
    fn reader_stopped(&self, summary: &ReaderSummary);

    /// Invoked when the operator input loop stops.
    fn operator_stopped(&self, summary: &OperatorSummary);

    /// Invoked when a termination signal starts the shutdown sequence.
    fn shutdown_requested(&self);
}

impl<T> HealthReporter for Arc<T>
where
    T: HealthReporter + ?Sized,
{
    fn startup_starting(&self, config: &Config) {
        (**self).startup_starting(config);
    }

    fn device_connected(&self, port_name: &str) {
        (**self).device_connected(port_name);
    }

    fn startup_failed(&self, error: &LaunchError) {
        (**self).startup_failed(error);
    }

    fn bootstrap_completed(&self, outcome: &BootstrapOutcome) {
        (**self).bootstrap_completed(outcome);
    }

    fn reader_stopped(&self, summary: &ReaderSummary) {
        (**self).reader_stopped(summary);
    }

    fn operator_stopped(&self, summary: &OperatorSummary) {
        (**self).operator_stopped(summary);
    }

    fn shutdown_requested(&self) {
        (**self).shutdown_requested();
    }
}

/// Reporter that turns each milestone into a `tracing` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredHealthReporter;

impl StructuredHealthReporter {
    /// Creates the reporter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl HealthReporter for StructuredHealthReporter {
    fn startup_starting(&self, config: &Config) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "startup_starting",
            wifi_status = %config.wifi_status(),
            port = config.port().unwrap_or("auto"),
            baud_rate = config.baud_rate(),
            log_filter = %config.log_filter(),
            log_format = ?config.log_format(),
            "starting host bridge"
        );
    }

    fn device_connected(&self, port_name: &str) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "device_connected",
            port = port_name,
            "connected to device"
        );
    }

    fn startup_failed(&self, error: &LaunchError) {
        tracing::error!(
            target: HEALTH_TARGET,
            event = "startup_failed",
            error = %error,
            "host bridge failed to start"
        );
    }

    fn bootstrap_completed(&self, outcome: &BootstrapOutcome) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_completed",
            outcome = ?outcome,
            "device bootstrap completed"
        );
    }

    fn reader_stopped(&self, summary: &ReaderSummary) {
        tracing::warn!(
            target: HEALTH_TARGET,
            event = "reader_stopped",
            routed = summary.routed,
            malformed = summary.malformed,
            exit = ?summary.exit,
            "device reader stopped; inbound traffic is no longer processed"
        );
    }

    fn operator_stopped(&self, summary: &OperatorSummary) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "operator_stopped",
            forwarded = summary.forwarded,
            exit = ?summary.exit,
            "operator input closed"
        );
    }

    fn shutdown_requested(&self) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "shutdown_requested",
            "shutting down host bridge"
        );
    }
}
