//! Test suites for the host bridge.

mod process_behaviour;
pub(crate) mod support;
