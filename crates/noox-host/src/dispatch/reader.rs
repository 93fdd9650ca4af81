//! Inbound reader loop.

use std::io::{self, BufRead, BufReader, Read};
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

use crate::protocol::decode;

use super::DISPATCH_TARGET;
use super::router::ResponseRouter;

/// Why the reader loop stopped.
#[derive(Debug)]
pub enum ReaderExit {
    /// The link reported end of stream.
    EndOfStream,
    /// The shutdown flag was raised.
    Cancelled,
    /// A non-transient read error occurred.
    Failed(io::Error),
}

/// Counters reported when the reader loop stops.
#[derive(Debug)]
pub struct ReaderSummary {
    /// Lines decoded and handled by the router.
    pub routed: usize,
    /// Lines that were empty after trimming.
    pub blank: usize,
    /// Lines that were not valid JSON records; shown raw.
    pub malformed: usize,
    /// Decoded messages rejected by the router for a payload mismatch.
    pub dropped: usize,
    /// Termination reason.
    pub exit: ReaderExit,
}

#[derive(Debug, Default)]
struct Counters {
    routed: usize,
    blank: usize,
    malformed: usize,
    dropped: usize,
}

impl Counters {
    fn finish(self, exit: ReaderExit) -> ReaderSummary {
        ReaderSummary {
            routed: self.routed,
            blank: self.blank,
            malformed: self.malformed,
            dropped: self.dropped,
            exit,
        }
    }
}

/// Reads `\n`-framed lines from `source` and routes each until the stream
/// ends, fails, or `shutdown` is raised.
///
/// Read timeouts and interruptions are retried without losing a partially
/// received line. A line that fails to decode is shown raw and skipped; the
/// stream is never resynchronised or closed because of one bad line.
pub fn run_reader_loop<R: Read>(
    source: R,
    router: &ResponseRouter,
    shutdown: &AtomicBool,
) -> ReaderSummary {
    let mut reader = BufReader::new(source);
    let mut buffer = Vec::new();
    let mut counters = Counters::default();

    let exit = loop {
        if shutdown.load(Ordering::SeqCst) {
            break ReaderExit::Cancelled;
        }
        match reader.read_until(b'\n', &mut buffer) {
            Ok(0) => {
                if !buffer.is_empty() {
                    handle_line(&buffer, router, &mut counters);
                }
                break ReaderExit::EndOfStream;
            }
            Ok(_) => {
                handle_line(&buffer, router, &mut counters);
                buffer.clear();
            }
            Err(error) if is_transient(error.kind()) => {}
            Err(error) => break ReaderExit::Failed(error),
        }
    };

    let summary = counters.finish(exit);
    info!(
        target: DISPATCH_TARGET,
        routed = summary.routed,
        blank = summary.blank,
        malformed = summary.malformed,
        dropped = summary.dropped,
        exit = ?summary.exit,
        "inbound reader stopped"
    );
    summary
}

fn is_transient(kind: io::ErrorKind) -> bool {
    matches!(
        kind,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
    )
}

fn handle_line(raw: &[u8], router: &ResponseRouter, counters: &mut Counters) {
    let text = String::from_utf8_lossy(raw);
    let line = text.trim();
    if line.is_empty() {
        counters.blank += 1;
        return;
    }

    let message = match decode(line) {
        Ok(message) => message,
        Err(error) => {
            warn!(target: DISPATCH_TARGET, %error, "undecodable line from device");
            router.console().line(format!("[NOOX Device] Raw: {line}"));
            counters.malformed += 1;
            return;
        }
    };

    debug!(
        target: DISPATCH_TARGET,
        message_type = %message.message_type,
        request_id = message.request_id.as_deref().unwrap_or_default(),
        "received message from device"
    );
    match router.route(message) {
        Ok(()) => counters.routed += 1,
        Err(error) => {
            warn!(target: DISPATCH_TARGET, %error, "dropping device message");
            counters.dropped += 1;
        }
    }
}
