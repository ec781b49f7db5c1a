//! Best-effort privilege elevation before the dump runs.
//!
//! Several diagnostics go through `sudo`. Refreshing the sudo timestamp up
//! front means the user answers one password prompt instead of one per
//! command. Nothing here can fail the run: if elevation does not work, the
//! affected commands fail on their own and their errors land in the dump.

use std::ffi::OsString;
use std::process::{Command, Stdio};

use tracing::{debug, warn};

pub trait PrivilegeElevator {
    fn elevate(&self);
}

/// `sudo -v` with the terminal attached, skipped when already root.
#[derive(Debug, Clone)]
pub struct SudoElevator {
    program: OsString,
}

impl Default for SudoElevator {
    fn default() -> Self {
        Self::with_program("sudo")
    }
}

impl SudoElevator {
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Run `<program> -v`. Returns whether credentials were refreshed.
    fn refresh(&self) -> bool {
        match Command::new(&self.program)
            .arg("-v")
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
        {
            Ok(status) if status.success() => {
                debug!("sudo credentials refreshed");
                true
            }
            Ok(status) => {
                warn!(%status, "sudo -v failed, continuing without elevation");
                false
            }
            Err(e) => {
                warn!(error = %e, "could not run sudo, continuing without elevation");
                false
            }
        }
    }
}

impl PrivilegeElevator for SudoElevator {
    fn elevate(&self) {
        if is_root() {
            debug!("already running as root, skipping sudo");
            return;
        }
        self.refresh();
    }
}

pub fn is_root() -> bool {
    // SAFETY: geteuid has no preconditions and cannot fail.
    unsafe { libc::geteuid() == 0 }
}
