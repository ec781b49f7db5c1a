//! The fixed table of diagnostics captured in every dump.

use std::fmt;
use std::io::{self, Write};

use super::dump::write_block;

pub type ActionHandler = Box<dyn Fn(&mut dyn Write) -> io::Result<()>>;

/// A diagnostic that needs its own formatting instead of a shell line.
///
/// The handler receives the dump writer and is responsible for labelling
/// whatever it writes.
pub struct CustomAction {
    pub name: String,
    pub handler: ActionHandler,
}

impl CustomAction {
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut dyn Write) -> io::Result<()> + 'static,
    {
        Self {
            name: name.into(),
            handler: Box::new(handler),
        }
    }
}

impl fmt::Debug for CustomAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomAction")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub enum DumpCommand {
    Shell(String),
    Custom(CustomAction),
}

impl DumpCommand {
    pub fn shell(command: impl Into<String>) -> Self {
        DumpCommand::Shell(command.into())
    }

    /// What the entry is called in logs.
    pub fn label(&self) -> &str {
        match self {
            DumpCommand::Shell(command) => command,
            DumpCommand::Custom(action) => &action.name,
        }
    }
}

const DEFAULT_SHELL_COMMANDS: &[&str] = &[
    "date",
    "hostname",
    // PCI inventory + NIC driver utility
    "sudo lspci -vv",
    "which exanic-config",
    "sudo exanic-config -v",
    "ls /dev/exanic*",
    // Kernel + OS
    "dmesg",
    "uptime",
    "cat /proc/cmdline",
    "cat /proc/cpuinfo",
    "cat /proc/meminfo",
    "cat /etc/os-release",
    "uname -a",
    // Out-of-band management
    "sudo ipmiutil sensor",
    "sudo ipmiutil sel",
    "sudo ipmiutil health",
    // Packages + driver modules
    "yum list installed",
    "apt list --installed",
    "dkms status",
    // Time sync
    "chkconfig --list ntpd",
    "ntpq -p",
    "ntpstat",
    // udev
    "ls /etc/udev/rules.d/",
    "cat /etc/udev/rules.d/exanic*",
    // Load snapshot
    "top -b -n 1 | head -n 5",
    "cat /proc/interrupts",
    "cat /proc/stat",
    "date",
];

/// Every diagnostic captured by a dump, in the order it appears in the file.
pub fn default_commands() -> Vec<DumpCommand> {
    let mut commands = vec![DumpCommand::Custom(CustomAction::new(
        "tool version",
        write_tool_version,
    ))];
    commands.extend(DEFAULT_SHELL_COMMANDS.iter().map(|c| DumpCommand::shell(*c)));
    commands
}

fn write_tool_version(out: &mut dyn Write) -> io::Result<()> {
    let version = format!("{} {}\n", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    write_block(out, "tool version", version.as_bytes(), b"")
}
