//! Default action: collect the dump, compress it, report where it went.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use tracing::info;

use crate::config::{DumpPaths, HostContext};
use crate::domain::command::{default_commands, DumpCommand};
use crate::domain::compress;
use crate::domain::dump;
use crate::domain::executor::ShellExecutor;
use crate::privilege::PrivilegeElevator;

#[derive(Debug, Clone, Default)]
pub struct DumpOptions {
    pub output_filepath: Option<PathBuf>,
    pub disable_compression: bool,
}

pub fn run(
    opts: &DumpOptions,
    host: &HostContext,
    executor: &dyn ShellExecutor,
    elevator: &dyn PrivilegeElevator,
    out: &mut dyn Write,
) -> Result<PathBuf> {
    run_with(opts, host, &default_commands(), executor, elevator, out)
}

pub fn run_with(
    opts: &DumpOptions,
    host: &HostContext,
    commands: &[DumpCommand],
    executor: &dyn ShellExecutor,
    elevator: &dyn PrivilegeElevator,
    out: &mut dyn Write,
) -> Result<PathBuf> {
    let paths = DumpPaths::resolve(opts.output_filepath.as_deref(), host)?;
    let should_compress = !opts.disable_compression;
    info!(
        dump = %paths.dump.display(),
        compress = should_compress,
        commands = commands.len(),
        "starting debug dump"
    );

    elevator.elevate();

    writeln!(out, "{} Executing Debug Dump commands...", "::".blue().bold())?;
    dump::collect_to_file(&paths.dump, commands, executor)?;

    if should_compress {
        writeln!(out, "{} Compressing Debug Dump...", "::".blue().bold())?;
        compress::gzip_file(&paths.dump, &paths.compressed)?;
    }

    let location = paths.final_path(should_compress).to_path_buf();
    writeln!(out, "{} Debug Dump has completed!", "ok".green().bold())?;
    writeln!(out, "File location: {}", location.display())?;
    Ok(location)
}
