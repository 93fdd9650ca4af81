//! Messages received from the device.

use std::fmt;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::errors::CodecError;

/// Loosely typed record decoded from one inbound line.
///
/// Every field is optional on the wire; missing strings decode as `None` and
/// a missing or `null` `type` decodes as the empty tag.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InboundMessage {
    /// Echo of the originating request, absent for unsolicited messages.
    pub request_id: Option<String>,
    /// Wire tag selecting how the payload is interpreted.
    #[serde(rename = "type", deserialize_with = "null_as_empty")]
    pub message_type: String,
    /// Tag-specific payload, kept as raw JSON until classified.
    pub payload: Option<Value>,
    /// Device-reported status text.
    pub status: Option<String>,
    /// Free-form content, used by error reports.
    pub content: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Inbound message narrowed to its recognised tag.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceMessage {
    /// The device asks the host to run a command.
    ShellCommand {
        /// Request identifier echoed by the device.
        request_id: Option<String>,
        /// Command text to run in the host shell.
        command: String,
    },
    /// Assistant text for the operator.
    AiResponse {
        /// Text to display.
        text: String,
    },
    /// Reply to a link test request.
    LinkTestResult {
        /// Request identifier echoed by the device.
        request_id: Option<String>,
        /// Device-reported status.
        status: Option<String>,
        /// Result text, typically `pong`.
        result: String,
    },
    /// Progress or outcome of WiFi provisioning.
    WifiConnectStatus {
        /// Request identifier echoed by the device.
        request_id: Option<String>,
        /// Device-reported status.
        status: Option<String>,
        /// Status message.
        message: String,
    },
    /// Error reported by the device.
    Error {
        /// Request identifier echoed by the device.
        request_id: Option<String>,
        /// Best available description of the failure.
        message: String,
    },
    /// Any tag the host does not recognise, passed through untouched.
    Unknown(InboundMessage),
}

/// Text shown when an error report carries no description.
pub(crate) const UNKNOWN_DEVICE_ERROR: &str = "Unknown error from device";

/// Decodes one line into an [`InboundMessage`].
///
/// Surrounding whitespace, including the line terminator, is ignored.
///
/// # Errors
///
/// Returns [`CodecError::Empty`] for blank input and [`CodecError::Decode`]
/// when the line is not a JSON object of the inbound shape.
pub fn decode(line: &str) -> Result<InboundMessage, CodecError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(CodecError::Empty);
    }
    serde_json::from_str(trimmed).map_err(|source| CodecError::Decode {
        line: trimmed.to_owned(),
        source,
    })
}

impl InboundMessage {
    /// Interprets the payload according to the message tag.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Shape`] when a recognised tag carries a payload
    /// that is not a string.
    pub fn classify(self) -> Result<DeviceMessage, CodecError> {
        match self.message_type.as_str() {
            "shellCommand" => {
                let command = self.string_payload("a command string")?;
                Ok(DeviceMessage::ShellCommand {
                    request_id: self.request_id,
                    command,
                })
            }
            "aiResponse" => {
                let text = self.string_payload("a text string")?;
                Ok(DeviceMessage::AiResponse { text })
            }
            "linkTestResult" => {
                let result = self.string_payload("a result string")?;
                Ok(DeviceMessage::LinkTestResult {
                    request_id: self.request_id,
                    status: self.status,
                    result,
                })
            }
            "wifiConnectStatus" => {
                let message = self.string_payload("a status message string")?;
                Ok(DeviceMessage::WifiConnectStatus {
                    request_id: self.request_id,
                    status: self.status,
                    message,
                })
            }
            "error" => {
                let message = self.error_message();
                Ok(DeviceMessage::Error {
                    request_id: self.request_id,
                    message,
                })
            }
            _ => Ok(DeviceMessage::Unknown(self)),
        }
    }

    fn string_payload(&self, expected: &'static str) -> Result<String, CodecError> {
        match &self.payload {
            Some(Value::String(text)) => Ok(text.clone()),
            _ => Err(CodecError::shape(&self.message_type, expected)),
        }
    }

    fn error_message(&self) -> String {
        if let Some(content) = self.content.as_deref().filter(|text| !text.is_empty()) {
            return content.to_owned();
        }
        match &self.payload {
            Some(Value::String(text)) => text.clone(),
            Some(Value::Null) | None => UNKNOWN_DEVICE_ERROR.to_owned(),
            Some(other) => other.to_string(),
        }
    }
}

impl fmt::Display for InboundMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let payload = self
            .payload
            .as_ref()
            .map_or_else(|| "null".to_owned(), Value::to_string);
        write!(
            f,
            "{} (RequestId: {}, Status: {}, Content: {}, Payload: {})",
            self.message_type,
            self.request_id.as_deref().unwrap_or_default(),
            self.status.as_deref().unwrap_or_default(),
            self.content.as_deref().unwrap_or_default(),
            payload,
        )
    }
}
