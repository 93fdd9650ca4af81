//! Messages sent from the host to the device.

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use uuid::Uuid;

use super::errors::CodecError;

/// Payload carried by every link test request.
pub(crate) const LINK_TEST_PAYLOAD: &str = "ping";

/// Exit code reported when a command did not terminate normally.
pub(crate) const ABNORMAL_EXIT_CODE: i32 = 1;

/// Opaque, sender-generated token attached to each outbound message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    /// Generates a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RequestId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of a command, as reported to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShellStatus {
    /// The command exited with code zero.
    Success,
    /// The command exited non-zero or could not be run.
    Error,
}

/// Captured result of running one command in the host shell.
///
/// `status` is [`ShellStatus::Success`] exactly when `exit_code` is zero;
/// the constructors are the only way to build one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShellResult {
    command: String,
    stdout: String,
    stderr: String,
    status: ShellStatus,
    exit_code: i32,
}

impl ShellResult {
    /// Builds a result for a process that exited normally with `exit_code`.
    pub fn from_exit(
        command: impl Into<String>,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
        exit_code: i32,
    ) -> Self {
        let status = if exit_code == 0 {
            ShellStatus::Success
        } else {
            ShellStatus::Error
        };
        Self {
            command: command.into(),
            stdout: stdout.into(),
            stderr: stderr.into(),
            status,
            exit_code,
        }
    }

    /// Builds a result for a process that terminated without an exit code,
    /// for example because a signal killed it.
    pub fn abnormal(
        command: impl Into<String>,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
    ) -> Self {
        Self {
            command: command.into(),
            stdout: stdout.into(),
            stderr: stderr.into(),
            status: ShellStatus::Error,
            exit_code: ABNORMAL_EXIT_CODE,
        }
    }

    /// Builds a result for a command whose shell could not be started.
    ///
    /// The launch error text is reported on `stderr`.
    pub fn launch_failure(command: impl Into<String>, error: &impl fmt::Display) -> Self {
        Self::abnormal(command, String::new(), error.to_string())
    }

    /// The command text that was executed.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Captured standard output.
    #[must_use]
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    /// Captured standard error.
    #[must_use]
    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    /// Success or error classification.
    #[must_use]
    pub fn status(&self) -> ShellStatus {
        self.status
    }

    /// Exit code reported to the device.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }
}

/// Network credentials pushed to the device during provisioning.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct WifiCredentials {
    ssid: String,
    password: String,
}

impl WifiCredentials {
    /// Creates a credential pair.
    pub fn new(ssid: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            ssid: ssid.into(),
            password: password.into(),
        }
    }

    /// Network name.
    #[must_use]
    pub fn ssid(&self) -> &str {
        &self.ssid
    }
}

impl fmt::Debug for WifiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WifiCredentials")
            .field("ssid", &self.ssid)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Typed payload of an outbound message, keyed by its wire tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundKind {
    /// `linkTest` with the literal payload `"ping"`.
    LinkTest,
    /// `connectToWifi` with `{ssid, password}`.
    ConnectToWifi(WifiCredentials),
    /// `userInput` with one line typed by the operator.
    UserInput(String),
    /// `shellCommandResult` with the captured command output.
    ShellCommandResult(ShellResult),
}

impl OutboundKind {
    /// Wire tag written to the `type` field.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::LinkTest => "linkTest",
            Self::ConnectToWifi(_) => "connectToWifi",
            Self::UserInput(_) => "userInput",
            Self::ShellCommandResult(_) => "shellCommandResult",
        }
    }
}

/// A single host-to-device message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    request_id: RequestId,
    kind: OutboundKind,
}

impl OutboundMessage {
    /// Wraps `kind` with a freshly generated request identifier.
    #[must_use]
    pub fn new(kind: OutboundKind) -> Self {
        Self::with_request_id(RequestId::generate(), kind)
    }

    /// Wraps `kind` with an explicit request identifier.
    #[must_use]
    pub fn with_request_id(request_id: RequestId, kind: OutboundKind) -> Self {
        Self { request_id, kind }
    }

    /// Builds a link test request.
    #[must_use]
    pub fn link_test() -> Self {
        Self::new(OutboundKind::LinkTest)
    }

    /// Builds a WiFi provisioning request.
    #[must_use]
    pub fn connect_to_wifi(credentials: WifiCredentials) -> Self {
        Self::new(OutboundKind::ConnectToWifi(credentials))
    }

    /// Builds a message forwarding operator input.
    pub fn user_input(line: impl Into<String>) -> Self {
        Self::new(OutboundKind::UserInput(line.into()))
    }

    /// Builds a message reporting a command result.
    #[must_use]
    pub fn shell_command_result(result: ShellResult) -> Self {
        Self::new(OutboundKind::ShellCommandResult(result))
    }

    /// Request identifier attached to this message.
    #[must_use]
    pub fn request_id(&self) -> &RequestId {
        &self.request_id
    }

    /// Typed payload.
    #[must_use]
    pub fn kind(&self) -> &OutboundKind {
        &self.kind
    }

    /// Serialises the message as one JSON line terminated by `\n`.
    ///
    /// JSON string escaping guarantees the body contains no raw newline, so
    /// the terminator is the only one in the returned buffer.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Encode`] if serialisation fails.
    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        let mut buffer = serde_json::to_vec(self).map_err(CodecError::Encode)?;
        buffer.push(b'\n');
        Ok(buffer)
    }
}

impl Serialize for OutboundMessage {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("OutboundMessage", 3)?;
        state.serialize_field("requestId", &self.request_id)?;
        state.serialize_field("type", self.kind.tag())?;
        match &self.kind {
            OutboundKind::LinkTest => state.serialize_field("payload", LINK_TEST_PAYLOAD)?,
            OutboundKind::ConnectToWifi(credentials) => {
                state.serialize_field("payload", credentials)?;
            }
            OutboundKind::UserInput(line) => state.serialize_field("payload", line)?,
            OutboundKind::ShellCommandResult(result) => {
                state.serialize_field("payload", result)?;
            }
        }
        state.end()
    }
}
