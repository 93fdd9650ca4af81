//! Serialised writes onto the device link.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;
use tracing::{debug, warn};

use crate::protocol::{CodecError, OutboundMessage};

use super::DISPATCH_TARGET;

/// Errors surfaced while sending one message.
#[derive(Debug, Error)]
pub enum SendError {
    /// The message could not be serialised.
    #[error(transparent)]
    Encode(#[from] CodecError),
    /// The link rejected the write.
    #[error("failed to write to device link: {0}")]
    Write(#[from] io::Error),
}

/// Cloneable handle to the write half of the device link.
///
/// Each message is encoded first and then written in one `write_all` under a
/// mutex, so lines from concurrent senders never interleave.
#[derive(Clone)]
pub struct Outbound {
    writer: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl Outbound {
    /// Takes ownership of the link's write half.
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// Sends `message`, logging and discarding any failure.
    pub fn send(&self, message: &OutboundMessage) {
        if let Err(error) = self.try_send(message) {
            warn!(
                target: DISPATCH_TARGET,
                %error,
                message_type = message.kind().tag(),
                request_id = %message.request_id(),
                "failed to send message to device"
            );
        }
    }

    /// Sends `message` and reports failures to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`SendError`] if encoding or writing fails.
    pub fn try_send(&self, message: &OutboundMessage) -> Result<(), SendError> {
        let line = message.encode()?;
        {
            let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
            writer.write_all(&line)?;
            writer.flush()?;
        }
        debug!(
            target: DISPATCH_TARGET,
            message_type = message.kind().tag(),
            request_id = %message.request_id(),
            bytes = line.len(),
            "sent message to device"
        );
        Ok(())
    }
}

impl std::fmt::Debug for Outbound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Outbound").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::thread;

    use serde_json::Value;

    use super::*;
    use crate::tests::support::{FailingWriter, SharedBuffer};

    #[test]
    fn writes_one_terminated_line_per_message() {
        let sink = SharedBuffer::default();
        let outbound = Outbound::new(sink.clone());
        outbound.send(&OutboundMessage::link_test());
        outbound.send(&OutboundMessage::user_input("hello"));

        let lines = sink.lines();
        assert_eq!(lines.len(), 2);
        assert!(sink.contents().ends_with('\n'));
    }

    #[test]
    fn concurrent_senders_never_interleave() {
        const SENDERS: usize = 8;
        const PER_SENDER: usize = 50;

        let sink = SharedBuffer::default();
        let outbound = Outbound::new(sink.clone());
        let handles: Vec<_> = (0..SENDERS)
            .map(|sender| {
                let outbound = outbound.clone();
                thread::spawn(move || {
                    for index in 0..PER_SENDER {
                        let text = format!("{sender}-{index}-{}", "x".repeat(256));
                        outbound
                            .try_send(&OutboundMessage::user_input(text))
                            .expect("send to shared buffer");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("sender thread panicked");
        }

        let lines = sink.lines();
        assert_eq!(lines.len(), SENDERS * PER_SENDER);
        let mut ids = HashSet::new();
        for line in lines {
            let value: Value = serde_json::from_str(&line).expect("each line is intact JSON");
            assert_eq!(value["type"], "userInput");
            ids.insert(value["requestId"].as_str().map(str::to_owned));
        }
        assert_eq!(ids.len(), SENDERS * PER_SENDER, "request ids must be unique");
    }

    #[test]
    fn write_failures_are_reported_by_try_send() {
        let outbound = Outbound::new(FailingWriter);
        let result = outbound.try_send(&OutboundMessage::link_test());
        assert!(matches!(result, Err(SendError::Write(_))));
    }

    #[test]
    fn send_swallows_write_failures() {
        let outbound = Outbound::new(FailingWriter);
        outbound.send(&OutboundMessage::link_test());
    }
}
