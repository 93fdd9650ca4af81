//! Structured logging for the bridge.
//!
//! Records go to stderr; stdout carries operator display only.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Layer, fmt};

use noox_config::{Config, LogFormat};

static INSTALLED: OnceCell<()> = OnceCell::new();

/// Proof that the global subscriber is in place.
#[derive(Debug, Default, Clone, Copy)]
pub struct TelemetryHandle;

/// Errors raised while setting up logging.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The `--log-filter` expression did not parse.
    #[error("invalid log filter '{filter}': {source}")]
    Filter {
        /// Expression as configured.
        filter: String,
        #[source]
        source: ParseError,
    },
    /// Another global subscriber was already installed.
    #[error("could not install the log subscriber: {0}")]
    Install(#[source] TryInitError),
}

/// Installs the global subscriber the first time it is called.
///
/// Subsequent calls are no-ops and ignore `config`.
///
/// # Errors
///
/// Returns [`TelemetryError`] for an invalid filter or when a subscriber
/// was installed by someone else.
pub fn initialise(config: &Config) -> Result<TelemetryHandle, TelemetryError> {
    INSTALLED
        .get_or_try_init(|| install(config))
        .map(|()| TelemetryHandle)
}

fn install(config: &Config) -> Result<(), TelemetryError> {
    let filter = parse_filter(config.log_filter())?;
    let stderr_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_thread_names(true)
        .with_timer(UtcTime::rfc_3339());
    let stderr_layer = match config.log_format() {
        LogFormat::Json => stderr_layer.json().flatten_event(true).boxed(),
        LogFormat::Compact => stderr_layer.compact().boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .try_init()
        .map_err(TelemetryError::Install)
}

fn parse_filter(expression: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(expression).map_err(|source| TelemetryError::Filter {
        filter: expression.to_owned(),
        source,
    })
}
