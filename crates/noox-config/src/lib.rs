//! Shared configuration for the Noox host bridge.
//!
//! Every setting is resolved from three layers: built-in defaults,
//! `NOOX_*` environment variables, and command-line flags. Flags win over
//! the environment, which wins over defaults.

mod defaults;
mod logging;
mod wifi;

use std::ffi::OsString;
use std::fmt;
use std::time::Duration;

use clap::Parser;

pub use defaults::{
    DEFAULT_BAUD_RATE, DEFAULT_LOG_FILTER, DEFAULT_SETTLE_DELAY_MS, default_log_filter,
    default_log_format, default_settle_delay, default_wifi_status,
};
pub use logging::LogFormat;
pub use wifi::WifiStatus;

/// Runtime configuration for the bridge binary.
#[derive(Parser, Clone, PartialEq, Eq)]
#[command(
    name = "noox-host",
    about = "Bridges a Noox device on a serial port to the local shell and terminal."
)]
pub struct Config {
    /// WiFi status reported by the device before startup.
    #[arg(
        long,
        env = "NOOX_WIFI_STATUS",
        value_enum,
        ignore_case = true,
        default_value_t = WifiStatus::Unknown
    )]
    wifi_status: WifiStatus,

    /// Serial port to open instead of auto-discovering the device.
    #[arg(long, env = "NOOX_PORT", value_name = "PATH")]
    port: Option<String>,

    /// Serial baud rate.
    #[arg(long, env = "NOOX_BAUD_RATE", default_value_t = DEFAULT_BAUD_RATE)]
    baud_rate: u32,

    /// Delay in milliseconds between the link test and WiFi provisioning.
    #[arg(
        long,
        env = "NOOX_SETTLE_DELAY_MS",
        value_name = "MILLIS",
        default_value_t = DEFAULT_SETTLE_DELAY_MS
    )]
    settle_delay_ms: u64,

    /// Network name sent to the device during provisioning.
    #[arg(long, env = "NOOX_WIFI_SSID")]
    wifi_ssid: Option<String>,

    /// Network password sent to the device during provisioning.
    #[arg(long, env = "NOOX_WIFI_PASSWORD", hide_env_values = true)]
    wifi_password: Option<String>,

    /// Tracing filter expression (for example `info,noox_host=debug`).
    #[arg(long, env = "NOOX_LOG_FILTER", default_value = DEFAULT_LOG_FILTER)]
    log_filter: String,

    /// Structured log output format.
    #[arg(
        long,
        env = "NOOX_LOG_FORMAT",
        value_enum,
        ignore_case = true,
        default_value_t = LogFormat::Json
    )]
    log_format: LogFormat,
}

impl Config {
    /// Loads configuration from the process arguments and environment.
    ///
    /// # Errors
    ///
    /// Returns the clap error when a flag or environment value is invalid, or
    /// when help or version output was requested.
    pub fn load() -> Result<Self, clap::Error> {
        Self::try_parse()
    }

    /// Loads configuration from an explicit argument list.
    ///
    /// The first item is treated as the binary name. Environment variables
    /// are still consulted for any flag not present in `args`.
    ///
    /// # Errors
    ///
    /// Returns the clap error when an argument or environment value is
    /// invalid.
    pub fn load_from_iter<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::try_parse_from(args)
    }

    /// WiFi status reported before startup.
    #[must_use]
    pub const fn wifi_status(&self) -> WifiStatus {
        self.wifi_status
    }

    /// Explicit serial port override, if any.
    #[must_use]
    pub fn port(&self) -> Option<&str> {
        self.port.as_deref()
    }

    /// Serial baud rate.
    #[must_use]
    pub const fn baud_rate(&self) -> u32 {
        self.baud_rate
    }

    /// Delay applied between the link test and provisioning.
    #[must_use]
    pub const fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Provisioning credentials, present only when an SSID was configured.
    ///
    /// A missing password is treated as an open network and yields an empty
    /// string.
    #[must_use]
    pub fn wifi_credentials(&self) -> Option<(&str, &str)> {
        self.wifi_ssid
            .as_deref()
            .map(|ssid| (ssid, self.wifi_password.as_deref().unwrap_or_default()))
    }

    /// Tracing filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wifi_status: default_wifi_status(),
            port: None,
            baud_rate: DEFAULT_BAUD_RATE,
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            wifi_ssid: None,
            wifi_password: None,
            log_filter: default_log_filter().to_owned(),
            log_format: default_log_format(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("wifi_status", &self.wifi_status)
            .field("port", &self.port)
            .field("baud_rate", &self.baud_rate)
            .field("settle_delay_ms", &self.settle_delay_ms)
            .field("wifi_ssid", &self.wifi_ssid)
            .field(
                "wifi_password",
                &self.wifi_password.as_ref().map(|_| "<redacted>"),
            )
            .field("log_filter", &self.log_filter)
            .field("log_format", &self.log_format)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn parse(args: &[&str]) -> Config {
        let argv = std::iter::once("noox-host").chain(args.iter().copied());
        match Config::load_from_iter(argv) {
            Ok(config) => config,
            Err(error) => panic!("arguments should parse: {error}"),
        }
    }

    #[test]
    fn debug_output_redacts_password() {
        let config = parse(&["--wifi-ssid", "home", "--wifi-password", "hunter2"]);
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"), "password leaked: {rendered}");
        assert!(rendered.contains("<redacted>"));
        assert!(rendered.contains("home"));
    }

    #[test]
    fn credentials_require_an_ssid() {
        let config = parse(&["--wifi-password", "hunter2"]);
        assert_eq!(config.wifi_credentials(), None);
    }

    #[test]
    fn missing_password_means_open_network() {
        let config = parse(&["--wifi-ssid", "cafe"]);
        assert_eq!(config.wifi_credentials(), Some(("cafe", "")));
    }

    #[rstest]
    #[case::millis("250", Duration::from_millis(250))]
    #[case::zero("0", Duration::ZERO)]
    fn settle_delay_is_configurable(#[case] raw: &str, #[case] expected: Duration) {
        let config = parse(&["--settle-delay-ms", raw]);
        assert_eq!(config.settle_delay(), expected);
    }

    #[test]
    fn status_flag_ignores_case() {
        let config = parse(&["--wifi-status", "DISCONNECTED"]);
        assert_eq!(config.wifi_status(), WifiStatus::Disconnected);
    }

    #[rstest]
    #[case::bad_status(&["--wifi-status", "bogus"])]
    #[case::bad_baud(&["--baud-rate", "fast"])]
    #[case::bad_format(&["--log-format", "xml"])]
    fn rejects_invalid_values(#[case] args: &[&str]) {
        let argv = std::iter::once("noox-host").chain(args.iter().copied());
        assert!(Config::load_from_iter(argv).is_err());
    }
}
