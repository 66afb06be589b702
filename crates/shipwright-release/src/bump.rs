//! Version bumping

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument};

use shipwright_core::error::ReleaseError;
use shipwright_core::{PackageRelease, Result};
use shipwright_git::{ExecOptions, Shell};

/// Applies version increments for a whole release batch
#[async_trait]
pub trait VersionBumper: Send + Sync {
    /// Bump every package in `packages` in one invocation
    async fn bump(&self, packages: &[PackageRelease], dry_run: bool) -> Result<()>;
}

/// [`VersionBumper`] running a fixed command, e.g. `npx changeset version`
#[derive(Clone)]
pub struct CommandBumper {
    shell: Arc<dyn Shell>,
    command: String,
}

impl CommandBumper {
    /// Run `command` through `shell`
    pub fn new(shell: Arc<dyn Shell>, command: impl Into<String>) -> Self {
        Self {
            shell,
            command: command.into(),
        }
    }
}

#[async_trait]
impl VersionBumper for CommandBumper {
    #[instrument(skip(self, packages), fields(command = %self.command, packages = packages.len()))]
    async fn bump(&self, packages: &[PackageRelease], dry_run: bool) -> Result<()> {
        info!("bumping versions");
        self.shell
            .exec(&self.command, ExecOptions::mutating(dry_run))
            .await
            .map_err(|e| ReleaseError::BumpFailed(e.to_string()))?;
        Ok(())
    }
}
