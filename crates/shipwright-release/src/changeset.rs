//! Changeset files

use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use shipwright_core::error::ReleaseError;
use shipwright_core::{PackageRelease, ReleaseType, Result};

/// What happened to a changeset
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangesetOutcome {
    /// File was written
    Written(PathBuf),
    /// File already existed and was left alone
    Exists(PathBuf),
    /// Dry run; nothing was written
    DryRun(PathBuf),
}

impl ChangesetOutcome {
    /// Path of the changeset file
    pub fn path(&self) -> &Path {
        match self {
            Self::Written(p) | Self::Exists(p) | Self::DryRun(p) => p,
        }
    }
}

/// Changeset text for one package
pub fn changeset_content(name: &str, increment: ReleaseType, changelog: &str) -> String {
    format!("---\n'{}': '{}'\n---\n\n{}\n", name, increment, changelog)
}

/// `<slug>-<version>.md`, the slug keeping only ASCII alphanumerics
pub fn changeset_file_name(pkg: &PackageRelease) -> String {
    let slug: String = pkg
        .name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    format!("{}-{}.md", slug.trim_matches('-'), pkg.version)
}

/// Writes changesets into one directory
#[derive(Debug, Clone)]
pub struct ChangesetWriter {
    dir: PathBuf,
    dry_run: bool,
}

impl ChangesetWriter {
    /// Write into `dir`
    pub fn new(dir: impl Into<PathBuf>, dry_run: bool) -> Self {
        Self {
            dir: dir.into(),
            dry_run,
        }
    }

    /// Target directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the changeset for `pkg` unless it exists or this is a dry run
    #[instrument(skip(self, pkg), fields(package = %pkg.name))]
    pub async fn write(&self, pkg: &PackageRelease, increment: ReleaseType) -> Result<ChangesetOutcome> {
        let path = self.dir.join(changeset_file_name(pkg));
        let failed = |e: std::io::Error| ReleaseError::ChangesetWriteFailed {
            path: path.clone(),
            reason: e.to_string(),
        };

        if tokio::fs::try_exists(&path).await.map_err(failed)? {
            info!(path = %path.display(), "changeset already exists, skipping");
            return Ok(ChangesetOutcome::Exists(path));
        }

        if self.dry_run {
            info!(path = %path.display(), %increment, "would write changeset");
            return Ok(ChangesetOutcome::DryRun(path));
        }

        let content = changeset_content(
            &pkg.name,
            increment,
            pkg.changelog.as_deref().unwrap_or_default(),
        );
        tokio::fs::create_dir_all(&self.dir).await.map_err(failed)?;
        tokio::fs::write(&path, content).await.map_err(failed)?;

        info!(path = %path.display(), "wrote changeset");
        Ok(ChangesetOutcome::Written(path))
    }
}
