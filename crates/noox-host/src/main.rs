//! Entry point for the `noox-host` bridge.
//!
//! Configuration comes from flags and `NOOX_*` environment variables; see
//! `noox-host --help`. The binary delegates to [`noox_host::run`].

use std::io;
use std::process::ExitCode;

use noox_config::Config;

fn main() -> ExitCode {
    let config = match Config::load() {
        Ok(config) => config,
        Err(error) => error.exit(),
    };
    noox_host::run(&config, &mut io::stderr())
}
