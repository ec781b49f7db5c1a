mod commands;
mod config;
mod domain;
mod privilege;

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::commands::dump::DumpOptions;
use crate::config::HostContext;
use crate::domain::executor::{ShellExecutor, SystemShell};
use crate::privilege::{PrivilegeElevator, SudoElevator};

const ABOUT: &str = "This tool captures debug information relevant to troubleshooting a \
Cisco Nexus SmartNIC installation. By default, a gzip-compressed debug dump is written to \
'$HOME/<hostname>_smartnic_debug_dump_<timestamp>.log.gz'. This location can be overridden \
by the '-o' argument. This tool will prompt for superuser credentials, as some commands must \
be run with sudo.";

#[derive(Parser, Debug)]
#[command(
    name = "smartnic-debug-dump",
    about = ABOUT,
    after_help = commands::version::issues_notice(),
    disable_version_flag = true
)]
struct Cli {
    /// Filepath (absolute or relative) where the debug dump will be written.
    /// Unless compression is disabled, '.gz' is appended for the compressed copy
    #[arg(short = 'o', long, value_name = "PATH")]
    output_filepath: Option<PathBuf>,

    /// Disable gzip compression of the debug dump
    #[arg(short = 'c', long)]
    disable_compression: bool,

    /// Display the version of this tool and exit
    #[arg(short = 'V', long)]
    version: bool,

    /// Log filter for diagnostics on stderr (overridden by RUST_LOG)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    VersionShown,
    Completed(PathBuf),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let elevator = SudoElevator::default();
    let mut stdout = std::io::stdout().lock();
    if let Outcome::Completed(path) = run(&cli, &SystemShell, &elevator, &mut stdout)? {
        debug!(path = %path.display(), "debug dump finished");
    }
    Ok(())
}

fn init_tracing(log_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(
    cli: &Cli,
    executor: &dyn ShellExecutor,
    elevator: &dyn PrivilegeElevator,
    out: &mut dyn Write,
) -> Result<Outcome> {
    if cli.version {
        commands::version::run(out)?;
        return Ok(Outcome::VersionShown);
    }

    let host = HostContext::detect();
    let opts = DumpOptions {
        output_filepath: cli.output_filepath.clone(),
        disable_compression: cli.disable_compression,
    };
    let location = commands::dump::run(&opts, &host, executor, elevator, out)?;
    Ok(Outcome::Completed(location))
}
