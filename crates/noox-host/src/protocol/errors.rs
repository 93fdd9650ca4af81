//! Error types for encoding and decoding wire messages.

use thiserror::Error;

/// Errors surfaced while translating between messages and JSON lines.
#[derive(Debug, Error)]
pub enum CodecError {
    /// An outbound message could not be serialised.
    #[error("failed to encode outbound message: {0}")]
    Encode(#[source] serde_json::Error),

    /// An inbound line was not a JSON object of the expected shape.
    #[error("malformed inbound line: {source}")]
    Decode {
        /// The offending line, without its terminator.
        line: String,
        #[source]
        source: serde_json::Error,
    },

    /// An inbound line was blank after trimming.
    #[error("empty inbound line")]
    Empty,

    /// A recognised message carried a payload of the wrong type.
    #[error("payload for '{message_type}' must be {expected}")]
    Shape {
        /// Tag of the rejected message.
        message_type: String,
        /// Human-readable description of the expected payload.
        expected: &'static str,
    },
}

impl CodecError {
    /// Creates a shape error for the given tag.
    pub fn shape(message_type: impl Into<String>, expected: &'static str) -> Self {
        Self::Shape {
            message_type: message_type.into(),
            expected,
        }
    }

    /// Returns true when the failure concerns a whole line rather than a
    /// recognised message with a bad payload.
    #[must_use]
    pub fn is_malformed_line(&self) -> bool {
        matches!(self, Self::Decode { .. } | Self::Empty)
    }
}
