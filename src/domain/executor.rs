//! Shell execution seam for the dump loop.

use std::io;
use std::process::{Command, Stdio};

/// Everything a finished shell command left behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    /// `None` when the process was killed by a signal.
    pub code: Option<i32>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

pub trait ShellExecutor {
    /// Run `command` through a shell and wait for it to exit.
    fn execute(&self, command: &str) -> io::Result<CommandOutput>;
}

/// Runs commands with `sh -c` on the local host.
///
/// Stdin is inherited so `sudo` can still prompt if its cached credentials
/// expire mid-run. There is no timeout: a hung command hangs the dump.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemShell;

impl ShellExecutor for SystemShell {
    fn execute(&self, command: &str) -> io::Result<CommandOutput> {
        let output = Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()?;

        Ok(CommandOutput {
            stdout: output.stdout,
            stderr: output.stderr,
            code: output.status.code(),
        })
    }
}
