//! Command executor double that records requests instead of spawning shells.

use std::sync::Mutex;

use crate::executor::CommandExecutor;
use crate::protocol::ShellResult;

enum Reply {
    Succeed { stdout: String },
    Fixed(ShellResult),
}

/// Records every command and answers with a canned result.
pub struct RecordingExecutor {
    commands: Mutex<Vec<String>>,
    reply: Reply,
}

impl RecordingExecutor {
    /// Answers every command with exit code 0 and `stdout`.
    pub fn succeeding(stdout: &str) -> Self {
        Self::with_reply(Reply::Succeed {
            stdout: stdout.to_owned(),
        })
    }

    /// Answers every command with `result`.
    pub fn returning(result: ShellResult) -> Self {
        Self::with_reply(Reply::Fixed(result))
    }

    fn with_reply(reply: Reply) -> Self {
        Self {
            commands: Mutex::new(Vec::new()),
            reply,
        }
    }

    /// Commands received so far, in order.
    pub fn commands(&self) -> Vec<String> {
        self.commands
            .lock()
            .expect("executor mutex poisoned")
            .clone()
    }
}

impl CommandExecutor for RecordingExecutor {
    fn execute(&self, command: &str) -> ShellResult {
        self.commands
            .lock()
            .expect("executor mutex poisoned")
            .push(command.to_owned());
        match &self.reply {
            Reply::Succeed { stdout } => ShellResult::from_exit(command, stdout.as_str(), "", 0),
            Reply::Fixed(result) => result.clone(),
        }
    }
}
