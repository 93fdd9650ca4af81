//! One-shot startup handshake with the device.
//!
//! The sequence sends a `linkTest`, waits a fixed settle delay, and then, if
//! the device reported itself disconnected, pushes host WiFi credentials
//! with `connectToWifi`. The settle delay is not an acknowledgement wait:
//! the `linkTestResult` reply is displayed by the router like any other
//! message and never gates provisioning.

use std::thread;

use noox_config::{Config, WifiStatus};
use thiserror::Error;
use tracing::{info, warn};

use crate::context::BridgeContext;
use crate::protocol::{OutboundMessage, WifiCredentials};

pub(crate) const BOOTSTRAP_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::bootstrap");

/// Errors reported by a [`WifiInfoProvider`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WifiInfoError {
    /// No credentials are available on this host.
    #[error("no host WiFi credentials are configured")]
    Unavailable,
    /// The lookup itself failed.
    #[error("host WiFi lookup failed: {message}")]
    Lookup {
        /// Description of the failure.
        message: String,
    },
}

/// Source of the credentials pushed to a disconnected device.
pub trait WifiInfoProvider {
    /// Returns the host's WiFi credentials.
    ///
    /// # Errors
    ///
    /// Returns [`WifiInfoError`] when no credentials can be obtained.
    fn credentials(&self) -> Result<WifiCredentials, WifiInfoError>;
}

/// Provider serving the credentials supplied through configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredWifiInfo {
    credentials: Option<WifiCredentials>,
}

impl ConfiguredWifiInfo {
    /// Serves `credentials`, or reports them unavailable when `None`.
    #[must_use]
    pub fn new(credentials: Option<WifiCredentials>) -> Self {
        Self { credentials }
    }

    /// Captures `--wifi-ssid`/`--wifi-password` from `config`.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            credentials: config
                .wifi_credentials()
                .map(|(ssid, password)| WifiCredentials::new(ssid, password)),
        }
    }
}

impl WifiInfoProvider for ConfiguredWifiInfo {
    fn credentials(&self) -> Result<WifiCredentials, WifiInfoError> {
        self.credentials.clone().ok_or(WifiInfoError::Unavailable)
    }
}

/// Result of a completed bootstrap sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// Only the link test was sent because the device did not need WiFi.
    LinkTestOnly {
        /// Status the device reported.
        wifi_status: WifiStatus,
    },
    /// Credentials were sent to the device.
    WifiProvisioned {
        /// Network name that was sent.
        ssid: String,
    },
    /// Provisioning was needed but no credentials were available.
    WifiSkipped {
        /// Why the lookup failed.
        reason: WifiInfoError,
    },
}

#[derive(Debug)]
enum Stage {
    LinkTest,
    WifiProvisioning,
    Finished(BootstrapOutcome),
}

/// Runs the startup handshake exactly once.
pub struct BootstrapSequencer<'a> {
    context: &'a BridgeContext,
    wifi_info: &'a dyn WifiInfoProvider,
}

impl<'a> BootstrapSequencer<'a> {
    /// Prepares a sequence over `context`, sourcing credentials from
    /// `wifi_info`.
    pub fn new(context: &'a BridgeContext, wifi_info: &'a dyn WifiInfoProvider) -> Self {
        Self { context, wifi_info }
    }

    /// Runs every stage to completion and consumes the sequencer.
    ///
    /// Blocks the caller for the settle delay. Send failures are logged by
    /// the dispatcher and do not stop the sequence.
    pub fn run(self) -> BootstrapOutcome {
        let mut stage = Stage::LinkTest;
        loop {
            stage = match stage {
                Stage::LinkTest => self.link_test(),
                Stage::WifiProvisioning => Stage::Finished(self.provision()),
                Stage::Finished(outcome) => {
                    info!(
                        target: BOOTSTRAP_TARGET,
                        outcome = ?outcome,
                        "bootstrap sequence finished"
                    );
                    return outcome;
                }
            };
        }
    }

    fn link_test(&self) -> Stage {
        let message = OutboundMessage::link_test();
        info!(
            target: BOOTSTRAP_TARGET,
            request_id = %message.request_id(),
            "sending link test"
        );
        self.context.outbound().send(&message);

        let delay = self.context.settle_delay();
        if !delay.is_zero() {
            thread::sleep(delay);
        }

        let wifi_status = self.context.wifi_status();
        if wifi_status.needs_provisioning() {
            Stage::WifiProvisioning
        } else {
            info!(
                target: BOOTSTRAP_TARGET,
                %wifi_status,
                "device WiFi needs no provisioning"
            );
            Stage::Finished(BootstrapOutcome::LinkTestOnly { wifi_status })
        }
    }

    fn provision(&self) -> BootstrapOutcome {
        match self.wifi_info.credentials() {
            Ok(credentials) => {
                let ssid = credentials.ssid().to_owned();
                info!(
                    target: BOOTSTRAP_TARGET,
                    %ssid,
                    "sending WiFi credentials to device"
                );
                self.context
                    .outbound()
                    .send(&OutboundMessage::connect_to_wifi(credentials));
                BootstrapOutcome::WifiProvisioned { ssid }
            }
            Err(reason) => {
                warn!(
                    target: BOOTSTRAP_TARGET,
                    error = %reason,
                    "skipping WiFi provisioning"
                );
                BootstrapOutcome::WifiSkipped { reason }
            }
        }
    }
}
