//! Wiring the reader loop, bootstrap handshake and operator loop together.

use std::io::BufRead;
use std::sync::Arc;

use tracing::{debug, info};

use crate::bootstrap::{BootstrapOutcome, BootstrapSequencer, WifiInfoProvider};
use crate::console::Console;
use crate::context::BridgeContext;
use crate::dispatch::{ReaderSummary, ResponseRouter, run_reader_loop};
use crate::executor::CommandExecutor;
use crate::health::HealthReporter;
use crate::operator::{OperatorSummary, run_operator_loop};
use crate::tasks::{LoopHandle, TaskError};
use crate::transport::LinkReader;

pub(crate) const BRIDGE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::bridge");

/// Collaborators the bridge runs against.
pub struct BridgeIo {
    /// Read half of the device link.
    pub link_reader: LinkReader,
    /// Operator input stream.
    pub operator_input: Box<dyn BufRead + Send>,
    /// Operator display.
    pub console: Console,
    /// Runner for device-requested commands.
    pub executor: Arc<dyn CommandExecutor>,
}

/// A running bridge.
///
/// The inbound reader and the operator loop each run on their own thread.
/// Neither loop ending stops the bridge; only [`Bridge::stop`] does.
#[derive(Debug)]
pub struct Bridge {
    reader: LoopHandle<ReaderSummary>,
    operator: LoopHandle<OperatorSummary>,
}

impl Bridge {
    /// Starts the reader loop, runs the bootstrap handshake on the calling
    /// thread, then starts the operator loop.
    ///
    /// The reader starts first so replies to the link test are displayed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::Spawn`] if a loop thread cannot be created.
    pub fn start(
        io: BridgeIo,
        context: &BridgeContext,
        wifi_info: &dyn WifiInfoProvider,
        reporter: &Arc<dyn HealthReporter>,
    ) -> Result<(Self, BootstrapOutcome), TaskError> {
        let BridgeIo {
            link_reader,
            operator_input,
            console,
            executor,
        } = io;

        let router = ResponseRouter::new(executor, context.outbound().clone(), console);
        let reader_reporter = Arc::clone(reporter);
        let reader = LoopHandle::spawn("noox-reader", move |shutdown| {
            let summary = run_reader_loop(link_reader, &router, shutdown);
            reader_reporter.reader_stopped(&summary);
            summary
        })?;

        let outcome = BootstrapSequencer::new(context, wifi_info).run();
        reporter.bootstrap_completed(&outcome);

        let outbound = context.outbound().clone();
        let operator_reporter = Arc::clone(reporter);
        let operator = LoopHandle::spawn("noox-operator", move |shutdown| {
            let summary = run_operator_loop(operator_input, &outbound, shutdown);
            operator_reporter.operator_stopped(&summary);
            summary
        })?;

        info!(target: BRIDGE_TARGET, "bridge running");
        Ok((Self { reader, operator }, outcome))
    }

    /// Returns true once the inbound reader has stopped.
    #[must_use]
    pub fn reader_finished(&self) -> bool {
        self.reader.is_finished()
    }

    /// Returns true once the operator loop has stopped.
    #[must_use]
    pub fn operator_finished(&self) -> bool {
        self.operator.is_finished()
    }

    /// Signals both loops and waits for the reader to return.
    ///
    /// The operator loop is joined only if it already returned; a loop
    /// blocked on console input is left detached.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::Panicked`] if a joined loop panicked.
    pub fn stop(self) -> Result<Option<ReaderSummary>, TaskError> {
        let Self { reader, operator } = self;
        operator.shutdown();
        reader.shutdown();
        let summary = reader.join()?;
        if operator.is_finished() {
            operator.join()?;
        } else {
            debug!(
                target: BRIDGE_TARGET,
                thread = operator.name(),
                "leaving operator loop detached"
            );
        }
        Ok(summary)
    }
}
