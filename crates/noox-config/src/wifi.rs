//! Device WiFi status supplied at startup.

use clap::ValueEnum;
use strum::{Display, EnumString};

/// Last-known WiFi state reported by the device before the bridge started.
///
/// The value is supplied externally (flag or environment) and never updated
/// while the bridge runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumString, Display, ValueEnum)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum WifiStatus {
    /// The device is associated with an access point.
    Connected,
    /// The device has no WiFi association and needs provisioning.
    Disconnected,
    /// No status was reported.
    #[default]
    Unknown,
}

impl WifiStatus {
    /// Returns true when bootstrap should attempt WiFi provisioning.
    #[must_use]
    pub const fn needs_provisioning(self) -> bool {
        matches!(self, Self::Disconnected)
    }
}
