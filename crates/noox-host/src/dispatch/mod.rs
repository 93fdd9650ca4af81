//! Traffic between the device link and the rest of the bridge.
//!
//! [`Outbound`] is the single writer onto the link. The inbound side is a
//! loop ([`run_reader_loop`]) that frames lines off the link, decodes them,
//! and hands each to the [`ResponseRouter`], which displays device output
//! and answers shell command requests through the same [`Outbound`].

mod outbound;
mod reader;
mod router;

pub use outbound::{Outbound, SendError};
pub use reader::{ReaderExit, ReaderSummary, run_reader_loop};
pub use router::ResponseRouter;

pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");
