//! Test doubles shared by unit and behaviour tests.

mod executor;
mod reporter;
mod streams;

pub use executor::RecordingExecutor;
pub use reporter::{HealthEvent, RecordingHealthReporter};
pub use streams::{FailingWriter, IdleLink, ScriptedReader, SharedBuffer};
