//! Wheel installation through an external package manager.
//!
//! The installer is a command line such as `uv pip install`; the selected
//! URL is appended as the final argument and the child's output streams
//! straight through to ours.

use std::fmt;
use std::io;

use tracing::info;

use crate::error::{Result, WheelpickError};
use crate::shell::{self, CommandResult};

/// Installer used when none is configured.
pub const DEFAULT_INSTALLER: &str = "uv pip install";

/// Runs the installer process. Swappable so tests avoid real installs.
pub trait InstallRunner {
    /// Run `program` with `args`, streaming its output.
    fn run(&self, program: &str, args: &[String]) -> io::Result<CommandResult>;
}

/// Spawns the installer with inherited stdio and waits for it.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemInstallRunner;

impl InstallRunner for SystemInstallRunner {
    fn run(&self, program: &str, args: &[String]) -> io::Result<CommandResult> {
        shell::execute_inherited(program, args)
    }
}

/// A parsed installer command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallerCommand {
    program: String,
    args: Vec<String>,
}

impl InstallerCommand {
    /// Split a command line on whitespace. Returns `None` if it is blank.
    pub fn parse(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    /// Install `url`, waiting for the child to finish.
    ///
    /// A missing executable and a non-zero exit both fail with
    /// [`WheelpickError::InstallFailed`]. There is no retry.
    pub fn install(&self, url: &str, runner: &dyn InstallRunner) -> Result<()> {
        info!("Attempting to install from: {}", url);

        let mut args = self.args.clone();
        args.push(url.to_string());

        let result = runner.run(&self.program, &args).map_err(|e| {
            let message = if e.kind() == io::ErrorKind::NotFound {
                format!(
                    "'{}' command not found. Make sure it is installed and on PATH.",
                    self.program
                )
            } else {
                format!("could not run '{}': {}", self.program, e)
            };
            WheelpickError::InstallFailed {
                url: url.to_string(),
                message,
            }
        })?;

        if result.success {
            info!("Successfully installed {}", url);
            Ok(())
        } else {
            let code = result
                .exit_code
                .map_or_else(|| "a signal".to_string(), |c| format!("code {}", c));
            Err(WheelpickError::InstallFailed {
                url: url.to_string(),
                message: format!("'{}' exited with {}", self, code),
            })
        }
    }
}

impl fmt::Display for InstallerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}
