use std::time::Duration;

use crate::logging::LogFormat;
use crate::wifi::WifiStatus;

/// Serial baud rate used by the device firmware.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Delay between the link test and WiFi provisioning, in milliseconds.
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 1_000;

/// Default log filter expression used by the binary.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default log filter expression used by the binary.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Default logging format for the binary.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Json
}

/// Default WiFi status assumed when the device reported nothing.
#[must_use]
pub const fn default_wifi_status() -> WifiStatus {
    WifiStatus::Unknown
}

/// Default settle delay applied after the bootstrap link test.
#[must_use]
pub const fn default_settle_delay() -> Duration {
    Duration::from_millis(DEFAULT_SETTLE_DELAY_MS)
}
