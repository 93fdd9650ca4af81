//! Log rendering choices.

use clap::ValueEnum;
use strum::{Display, EnumString};

/// How log records are rendered on stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumString, Display, ValueEnum)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogFormat {
    /// One flattened JSON object per event.
    #[default]
    Json,
    /// Terse text, one event per line.
    Compact,
}
