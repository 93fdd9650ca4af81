//! Tag-based handling of decoded device messages.

use std::sync::Arc;

use tracing::{debug, info};

use crate::console::Console;
use crate::executor::CommandExecutor;
use crate::protocol::{CodecError, DeviceMessage, InboundMessage, OutboundMessage};

use super::DISPATCH_TARGET;
use super::outbound::Outbound;

/// Routes each inbound message to display or command execution.
///
/// The router keeps no state between messages and does not correlate
/// replies with earlier requests; request identifiers are only displayed.
#[derive(Clone)]
pub struct ResponseRouter {
    executor: Arc<dyn CommandExecutor>,
    outbound: Outbound,
    console: Console,
}

impl ResponseRouter {
    /// Creates a router that runs commands with `executor`, answers through
    /// `outbound`, and displays on `console`.
    pub fn new(executor: Arc<dyn CommandExecutor>, outbound: Outbound, console: Console) -> Self {
        Self {
            executor,
            outbound,
            console,
        }
    }

    /// Console used for operator display.
    #[must_use]
    pub fn console(&self) -> &Console {
        &self.console
    }

    /// Handles one decoded message.
    ///
    /// Shell commands run synchronously on the calling thread, and their
    /// result is sent back before this returns.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Shape`] when a recognised tag carries the wrong
    /// payload type; the message is dropped.
    pub fn route(&self, message: InboundMessage) -> Result<(), CodecError> {
        match message.classify()? {
            DeviceMessage::ShellCommand {
                request_id,
                command,
            } => self.run_shell_command(request_id.as_deref(), &command),
            DeviceMessage::AiResponse { text } => {
                self.console.line(format!("[NOOX AI] {text}"));
            }
            DeviceMessage::LinkTestResult {
                request_id,
                status,
                result,
            } => self.console.line(format!(
                "[NOOX Device] Link Test Result (RequestId: {}): {} - {result}",
                request_id.as_deref().unwrap_or_default(),
                status.as_deref().unwrap_or_default(),
            )),
            DeviceMessage::WifiConnectStatus {
                request_id,
                status,
                message,
            } => self.console.line(format!(
                "[NOOX Device] WiFi Connect Status (RequestId: {}): {} - {message}",
                request_id.as_deref().unwrap_or_default(),
                status.as_deref().unwrap_or_default(),
            )),
            DeviceMessage::Error {
                request_id,
                message,
            } => self.console.line(format!(
                "[NOOX Device Error] (RequestId: {}) {message}",
                request_id.as_deref().unwrap_or_default(),
            )),
            DeviceMessage::Unknown(inner) => {
                debug!(
                    target: DISPATCH_TARGET,
                    message_type = %inner.message_type,
                    "unrecognised message type"
                );
                self.console
                    .line(format!("[NOOX Device] Unknown response type: {inner}"));
            }
        }
        Ok(())
    }

    fn run_shell_command(&self, request_id: Option<&str>, command: &str) {
        self.console.line(format!("[NOOX Shell] Executing: {command}"));
        let result = self.executor.execute(command);
        info!(
            target: DISPATCH_TARGET,
            device_request_id = request_id.unwrap_or_default(),
            exit_code = result.exit_code(),
            status = ?result.status(),
            "shell command finished"
        );
        self.outbound
            .send(&OutboundMessage::shell_command_result(result));
    }
}

impl std::fmt::Debug for ResponseRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseRouter")
            .field("outbound", &self.outbound)
            .field("console", &self.console)
            .finish_non_exhaustive()
    }
}
