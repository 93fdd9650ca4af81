//! Lifecycle observer that keeps every event in memory.

use std::sync::Mutex;

use noox_config::Config;

use crate::bootstrap::BootstrapOutcome;
use crate::dispatch::{ReaderExit, ReaderSummary};
use crate::health::HealthReporter;
use crate::operator::OperatorSummary;
use crate::process::LaunchError;

/// Lifecycle events, reduced to what scenarios assert on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthEvent {
    StartupStarting,
    DeviceConnected(String),
    StartupFailed(String),
    BootstrapCompleted(BootstrapOutcome),
    ReaderStopped { routed: usize, cancelled: bool },
    OperatorStopped { forwarded: usize },
    ShutdownRequested,
}

/// In-memory [`HealthReporter`].
#[derive(Debug, Default)]
pub struct RecordingHealthReporter {
    seen: Mutex<Vec<HealthEvent>>,
}

impl RecordingHealthReporter {
    /// Events seen so far, oldest first.
    pub fn events(&self) -> Vec<HealthEvent> {
        self.seen
            .lock()
            .expect("reporter lock")
            .clone()
    }

    fn record(&self, event: HealthEvent) {
        self.seen
            .lock()
            .expect("reporter lock")
            .push(event);
    }
}

impl HealthReporter for RecordingHealthReporter {
    fn startup_starting(&self, _config: &Config) {
        self.record(HealthEvent::StartupStarting);
    }

    fn device_connected(&self, port_name: &str) {
        self.record(HealthEvent::DeviceConnected(port_name.to_owned()));
    }

    fn startup_failed(&self, error: &LaunchError) {
        self.record(HealthEvent::StartupFailed(error.to_string()));
    }

    fn bootstrap_completed(&self, outcome: &BootstrapOutcome) {
        self.record(HealthEvent::BootstrapCompleted(outcome.clone()));
    }

    fn reader_stopped(&self, summary: &ReaderSummary) {
        self.record(HealthEvent::ReaderStopped {
            routed: summary.routed,
            cancelled: matches!(summary.exit, ReaderExit::Cancelled),
        });
    }

    fn operator_stopped(&self, summary: &OperatorSummary) {
        self.record(HealthEvent::OperatorStopped {
            forwarded: summary.forwarded,
        });
    }

    fn shutdown_requested(&self) {
        self.record(HealthEvent::ShutdownRequested);
    }
}
