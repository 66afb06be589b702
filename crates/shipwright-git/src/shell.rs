//! Command execution

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Instant;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, instrument};

use crate::repository::Result;
use shipwright_core::error::GitError;

/// Per-call execution options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecOptions {
    /// Log the command instead of running it
    pub dry_run: bool,
}

impl ExecOptions {
    /// Options for a command that mutates the repository or filesystem
    pub fn mutating(dry_run: bool) -> Self {
        Self { dry_run }
    }
}

/// Runs shell commands and returns their standard output
#[async_trait]
pub trait Shell: Send + Sync {
    /// Execute `command`; a non-zero exit status is an error
    async fn exec(&self, command: &str, options: ExecOptions) -> Result<String>;
}

/// [`Shell`] backed by `sh -c` in a fixed working directory
#[derive(Debug, Clone)]
pub struct SystemShell {
    cwd: PathBuf,
}

impl SystemShell {
    /// Create a shell rooted at `cwd`
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }
}

#[async_trait]
impl Shell for SystemShell {
    #[instrument(skip(self), fields(cwd = %self.cwd.display()))]
    async fn exec(&self, command: &str, options: ExecOptions) -> Result<String> {
        if options.dry_run {
            info!(command, "dry run: skipping command");
            return Ok(String::new());
        }

        let start = Instant::now();
        let output = Command::new("sh")
            .arg("-c")
            .arg(command)
            .current_dir(&self.cwd)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| GitError::CommandFailed {
                command: command.to_string(),
                reason: format!("failed to spawn: {}", e),
            })?;

        debug!(
            command,
            duration_ms = start.elapsed().as_millis(),
            success = output.status.success(),
            "command finished"
        );

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            return Err(GitError::CommandFailed {
                command: command.to_string(),
                reason: format!(
                    "exited with code {}: {}",
                    code,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Quote an argument for `sh`
pub fn quote(arg: &str) -> String {
    if !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./@:=+,".contains(c))
    {
        return arg.to_string();
    }

    format!("'{}'", arg.replace('\'', r"'\''"))
}
