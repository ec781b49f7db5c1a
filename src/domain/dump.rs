//! Dump writer: runs the command table and appends one labelled block per
//! entry to the dump file.
//!
//! Block layout:
//! ```text
//! `<command>`
//! <stdout, if any><stderr, if any>
//! <blank line>
//! ```

use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tracing::{debug, info, warn};

use super::command::DumpCommand;
use super::error::DumpError;
use super::executor::{CommandOutput, ShellExecutor};
use crate::config::{PRODUCT_PRETTY, VENDOR};

/// Counters for the run log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub executed: usize,
    pub failed: usize,
}

pub fn write_header(out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "---------- {} {} Debug Dump ----------", VENDOR, PRODUCT_PRETTY)
}

/// Write one command block. Streams are copied byte for byte.
pub fn write_block(
    out: &mut dyn Write,
    label: &str,
    stdout: &[u8],
    stderr: &[u8],
) -> io::Result<()> {
    writeln!(out, "`{}`", label)?;
    if !stdout.is_empty() {
        out.write_all(stdout)?;
    }
    if !stderr.is_empty() {
        out.write_all(stderr)?;
    }
    out.write_all(b"\n")
}

/// Write the header, then every entry of `commands` in order.
///
/// Only writer errors are returned. A command that exits non-zero, prints to
/// stderr, or cannot even be spawned still gets its block and the loop moves
/// on.
pub fn run_commands(
    out: &mut dyn Write,
    commands: &[DumpCommand],
    executor: &dyn ShellExecutor,
) -> io::Result<RunSummary> {
    write_header(out)?;

    let mut summary = RunSummary::default();
    for command in commands {
        match command {
            DumpCommand::Shell(line) => {
                let output = executor.execute(line).unwrap_or_else(|e| {
                    warn!(command = %line, error = %e, "failed to spawn shell");
                    CommandOutput {
                        stderr: format!("failed to run command: {}\n", e).into_bytes(),
                        ..CommandOutput::default()
                    }
                });
                debug!(
                    command = %line,
                    code = ?output.code,
                    stdout_bytes = output.stdout.len(),
                    stderr_bytes = output.stderr.len(),
                    "command finished"
                );
                if !output.success() {
                    summary.failed += 1;
                }
                write_block(out, line, &output.stdout, &output.stderr)?;
            }
            DumpCommand::Custom(action) => {
                debug!(action = %command.label(), "running custom action");
                (action.handler)(&mut *out)?;
            }
        }
        summary.executed += 1;
    }

    Ok(summary)
}

/// Append a full dump to `path`, creating it if needed.
///
/// The file stays open for the whole loop and is flushed and closed before
/// returning.
pub fn collect_to_file(
    path: &Path,
    commands: &[DumpCommand],
    executor: &dyn ShellExecutor,
) -> Result<RunSummary, DumpError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| DumpError::Open {
            path: path.to_path_buf(),
            source,
        })?;
    let mut out = BufWriter::new(file);

    let write_err = |source| DumpError::Write {
        path: path.to_path_buf(),
        source,
    };
    let summary = run_commands(&mut out, commands, executor).map_err(write_err)?;
    out.flush().map_err(write_err)?;

    info!(
        path = %path.display(),
        executed = summary.executed,
        failed = summary.failed,
        "dump written"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::command::CustomAction;
    use std::cell::RefCell;
    use std::collections::HashMap;

    const HEADER: &str = "---------- Cisco Nexus SmartNIC Debug Dump ----------\n";

    /// Replays canned output per command and records what it was asked to run.
    #[derive(Default)]
    struct FakeShell {
        outputs: HashMap<String, CommandOutput>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeShell {
        fn with(mut self, command: &str, stdout: &str, stderr: &str, code: i32) -> Self {
            self.outputs.insert(
                command.to_string(),
                CommandOutput {
                    stdout: stdout.as_bytes().to_vec(),
                    stderr: stderr.as_bytes().to_vec(),
                    code: Some(code),
                },
            );
            self
        }
    }

    impl ShellExecutor for FakeShell {
        fn execute(&self, command: &str) -> io::Result<CommandOutput> {
            self.calls.borrow_mut().push(command.to_string());
            Ok(self.outputs.get(command).cloned().unwrap_or(CommandOutput {
                code: Some(0),
                ..CommandOutput::default()
            }))
        }
    }

    struct BrokenShell;

    impl ShellExecutor for BrokenShell {
        fn execute(&self, _command: &str) -> io::Result<CommandOutput> {
            Err(io::Error::new(io::ErrorKind::NotFound, "sh: not found"))
        }
    }

    fn shells(lines: &[&str]) -> Vec<DumpCommand> {
        lines.iter().map(|l| DumpCommand::shell(*l)).collect()
    }

    fn render(commands: &[DumpCommand], executor: &dyn ShellExecutor) -> (String, RunSummary) {
        let mut buf = Vec::new();
        let summary = run_commands(&mut buf, commands, executor).unwrap();
        (String::from_utf8(buf).unwrap(), summary)
    }

    #[test]
    fn one_block_per_command_in_order_regardless_of_status() {
        let shell = FakeShell::default()
            .with("uptime", "up 3 days\n", "", 0)
            .with("ntpstat", "unsynchronised\n", "", 1)
            .with("uname -a", "Linux box\n", "", 0);
        let (text, summary) = render(&shells(&["uptime", "ntpstat", "uname -a"]), &shell);

        assert_eq!(
            text,
            format!(
                "{}`uptime`\nup 3 days\n\n`ntpstat`\nunsynchronised\n\n`uname -a`\nLinux box\n\n",
                HEADER
            )
        );
        assert_eq!(summary, RunSummary { executed: 3, failed: 1 });
        assert_eq!(*shell.calls.borrow(), vec!["uptime", "ntpstat", "uname -a"]);
    }

    #[test]
    fn stderr_only_command_still_has_content() {
        let shell = FakeShell::default().with(
            "ls /dev/exanic*",
            "",
            "ls: cannot access '/dev/exanic*': No such file or directory\n",
            2,
        );
        let (text, _) = render(&shells(&["ls /dev/exanic*"]), &shell);
        assert_eq!(
            text,
            format!(
                "{}`ls /dev/exanic*`\nls: cannot access '/dev/exanic*': No such file or directory\n\n",
                HEADER
            )
        );
    }

    #[test]
    fn silent_command_is_label_and_blank_line() {
        let (text, summary) = render(&shells(&["dkms status"]), &FakeShell::default());
        assert_eq!(text, format!("{}`dkms status`\n\n", HEADER));
        assert_eq!(summary.failed, 0);
    }

    #[test]
    fn stdout_comes_before_stderr() {
        let shell = FakeShell::default().with("yum list installed", "pkgs\n", "warning\n", 0);
        let (text, _) = render(&shells(&["yum list installed"]), &shell);
        assert!(text.ends_with("`yum list installed`\npkgs\nwarning\n\n"));
    }

    #[test]
    fn spawn_failure_is_logged_and_loop_continues() {
        let (text, summary) = render(&shells(&["date", "uptime"]), &BrokenShell);
        assert!(text.contains("`date`\nfailed to run command: sh: not found\n\n"));
        assert!(text.contains("`uptime`\nfailed to run command: sh: not found\n\n"));
        assert_eq!(summary, RunSummary { executed: 2, failed: 2 });
    }

    #[test]
    fn custom_action_writes_its_own_block() {
        let commands = vec![
            DumpCommand::shell("hostname"),
            DumpCommand::Custom(CustomAction::new("port summary", |out| {
                write_block(out, "port summary", b"port0 up\nport1 down\n", b"")
            })),
            DumpCommand::shell("date"),
        ];
        let shell = FakeShell::default()
            .with("hostname", "box\n", "", 0)
            .with("date", "now\n", "", 0);
        let (text, summary) = render(&commands, &shell);

        assert_eq!(
            text,
            format!(
                "{}`hostname`\nbox\n\n`port summary`\nport0 up\nport1 down\n\n`date`\nnow\n\n",
                HEADER
            )
        );
        assert_eq!(summary.executed, 3);
        assert_eq!(*shell.calls.borrow(), vec!["hostname", "date"]);
    }

    #[test]
    fn collect_appends_to_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dump.log");
        std::fs::write(&path, "previous run\n").unwrap();

        let shell = FakeShell::default().with("uptime", "up\n", "", 0);
        collect_to_file(&path, &shells(&["uptime"]), &shell).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, format!("previous run\n{}`uptime`\nup\n\n", HEADER));
    }

    #[test]
    fn unopenable_path_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("dump.log");

        let err = collect_to_file(&path, &shells(&["uptime"]), &FakeShell::default()).unwrap_err();
        assert!(matches!(err, DumpError::Open { .. }));
        assert!(err.to_string().contains("dump.log"));
    }
}
