//! Running device-requested commands in the host shell.

use std::process::{Command, Output, Stdio};

use tracing::warn;

use crate::protocol::ShellResult;

pub(crate) const EXECUTOR_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::executor");

/// Runs one command string and captures its outcome.
pub trait CommandExecutor: Send + Sync {
    /// Runs `command` to completion and reports its output.
    ///
    /// Failures of the command itself are part of the returned result,
    /// never an error of the executor.
    fn execute(&self, command: &str) -> ShellResult;
}

/// Executor that spawns a fresh platform shell per command.
///
/// Uses `cmd /C` on Windows and `bash -c` elsewhere. The child inherits the
/// host environment and working directory; its stdin is closed. There is no
/// timeout, so a command that never exits blocks the caller.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellExecutor;

impl ShellExecutor {
    /// Builds a new executor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn shell_command(command: &str) -> Command {
        let (program, flag) = if cfg!(windows) {
            ("cmd", "/C")
        } else {
            ("bash", "-c")
        };
        let mut shell = Command::new(program);
        shell.arg(flag).arg(command).stdin(Stdio::null());
        shell
    }
}

impl CommandExecutor for ShellExecutor {
    fn execute(&self, command: &str) -> ShellResult {
        match Self::shell_command(command).output() {
            Ok(output) => result_from_output(command, &output),
            Err(error) => {
                warn!(
                    target: EXECUTOR_TARGET,
                    command,
                    %error,
                    "failed to launch shell"
                );
                ShellResult::launch_failure(command, &error)
            }
        }
    }
}

fn result_from_output(command: &str, output: &Output) -> ShellResult {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    match output.status.code() {
        Some(code) => ShellResult::from_exit(command, stdout, stderr, code),
        None => {
            warn!(
                target: EXECUTOR_TARGET,
                command,
                status = %output.status,
                "command terminated without an exit code"
            );
            ShellResult::abnormal(command, stdout, stderr)
        }
    }
}
