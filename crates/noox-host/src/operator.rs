//! Forwarding operator console input to the device.

use std::io::{self, BufRead};
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

use crate::dispatch::Outbound;
use crate::protocol::OutboundMessage;

pub(crate) const OPERATOR_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::operator");

/// Why the operator loop stopped.
#[derive(Debug)]
pub enum OperatorExit {
    /// The input stream closed.
    EndOfInput,
    /// The shutdown flag was raised.
    Cancelled,
    /// Reading the input stream failed.
    Failed(io::Error),
}

/// Counters reported when the operator loop stops.
#[derive(Debug)]
pub struct OperatorSummary {
    /// Lines sent to the device as `userInput`.
    pub forwarded: usize,
    /// Blank lines that were not sent.
    pub skipped: usize,
    /// Termination reason.
    pub exit: OperatorExit,
}

/// Sends every non-blank line of `input` to the device as `userInput`.
///
/// Only the line terminator is removed; other whitespace is forwarded as
/// typed. The loop checks `shutdown` between lines, so it stops promptly
/// only once the next line (or end of input) arrives.
pub fn run_operator_loop<R: BufRead>(
    mut input: R,
    outbound: &Outbound,
    shutdown: &AtomicBool,
) -> OperatorSummary {
    let mut forwarded = 0;
    let mut skipped = 0;
    let mut buffer = Vec::new();

    let exit = loop {
        if shutdown.load(Ordering::SeqCst) {
            break OperatorExit::Cancelled;
        }
        buffer.clear();
        match input.read_until(b'\n', &mut buffer) {
            Ok(0) => break OperatorExit::EndOfInput,
            Ok(_) => {
                let text = String::from_utf8_lossy(&buffer);
                let line = strip_terminator(&text);
                if line.trim().is_empty() {
                    skipped += 1;
                    continue;
                }
                debug!(target: OPERATOR_TARGET, bytes = line.len(), "forwarding operator input");
                outbound.send(&OutboundMessage::user_input(line));
                forwarded += 1;
            }
            Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
            Err(error) => {
                warn!(target: OPERATOR_TARGET, %error, "failed to read operator input");
                break OperatorExit::Failed(error);
            }
        }
    };

    info!(
        target: OPERATOR_TARGET,
        forwarded,
        skipped,
        exit = ?exit,
        "operator input loop stopped"
    );
    OperatorSummary {
        forwarded,
        skipped,
        exit,
    }
}

fn strip_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}
