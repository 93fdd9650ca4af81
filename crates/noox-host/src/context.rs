//! Process-wide bridge state, built once at startup and passed explicitly.

use std::time::Duration;

use noox_config::{Config, WifiStatus};

use crate::dispatch::Outbound;

/// State shared by the bridge components.
///
/// Holds the write side of the link and the device status captured at
/// startup. Neither changes after construction.
#[derive(Debug, Clone)]
pub struct BridgeContext {
    outbound: Outbound,
    wifi_status: WifiStatus,
    settle_delay: Duration,
}

impl BridgeContext {
    /// Builds a context around an existing dispatcher.
    #[must_use]
    pub fn new(outbound: Outbound, wifi_status: WifiStatus, settle_delay: Duration) -> Self {
        Self {
            outbound,
            wifi_status,
            settle_delay,
        }
    }

    /// Builds a context from loaded configuration.
    #[must_use]
    pub fn from_config(outbound: Outbound, config: &Config) -> Self {
        Self::new(outbound, config.wifi_status(), config.settle_delay())
    }

    /// The single outbound dispatcher.
    #[must_use]
    pub fn outbound(&self) -> &Outbound {
        &self.outbound
    }

    /// WiFi status the device reported before startup.
    #[must_use]
    pub fn wifi_status(&self) -> WifiStatus {
        self.wifi_status
    }

    /// Pause between the link test and provisioning.
    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }
}
