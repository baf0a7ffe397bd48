//! Shell command execution
//!
//! Release steps run project scripts through `sh -c` in the repository root.
//! Every command is fatal on a non-zero exit; the caller decides nothing about
//! partial failures.

pub mod mock;

pub use mock::MockRunner;

use crate::error::{ReleaseError, Result};
use crate::logging;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Runs shell commands on behalf of the release workflow
pub trait CommandRunner {
    /// Run `command` to completion and return its stdout.
    ///
    /// # Returns
    /// * `Ok(String)` - Captured stdout if the exit code is 0
    /// * `Err(ReleaseError::Command)` - Carrying the captured stderr otherwise
    fn run(&self, command: &str) -> Result<String>;

    /// Run `command` attached to the terminal, ignoring its exit status.
    ///
    /// Used to show the maintainer something to review.
    fn show(&self, command: &str) -> Result<()>;
}

/// Runs commands with `sh -c` in a fixed working directory
pub struct ShellRunner {
    workdir: PathBuf,
}

impl ShellRunner {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        ShellRunner {
            workdir: workdir.into(),
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn shell(&self, command: &str) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command).current_dir(&self.workdir);
        cmd
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, command: &str) -> Result<String> {
        tracing::debug!(component = "runner", "Executing: {}", logging::command(command));

        let output = self.shell(command).stdin(Stdio::null()).output()?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        for line in stdout.lines() {
            tracing::debug!(component = "runner", "{}", logging::output(line));
        }

        let code = output.status.code().unwrap_or(-1);
        tracing::debug!(component = "runner", exit_code = code, "Exit code: {}", code);

        if !output.status.success() {
            return Err(ReleaseError::Command {
                command: command.to_string(),
                code,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(stdout)
    }

    fn show(&self, command: &str) -> Result<()> {
        tracing::debug!(component = "runner", "Executing: {}", logging::command(command));

        let status = self.shell(command).status()?;
        tracing::debug!(
            component = "runner",
            exit_code = status.code().unwrap_or(-1),
            "review command finished"
        );
        Ok(())
    }
}
