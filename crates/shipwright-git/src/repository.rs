//! Locating the repository a release runs in
//!
//! Package paths, log paths and changeset directories are all relative to the
//! working tree root, so a repository without one is rejected up front.

use std::path::{Path, PathBuf};

use git2::{ErrorCode, Repository};
use tracing::{debug, instrument};

use shipwright_core::error::GitError;

/// Result type for git operations
pub type Result<T> = std::result::Result<T, GitError>;

/// Repository with a working tree
pub struct GitRepo {
    pub(crate) repo: Repository,
    root: PathBuf,
}

impl GitRepo {
    /// Open the repository whose working tree root is `root`
    #[instrument(fields(root = %root.display()))]
    pub fn open(root: &Path) -> Result<Self> {
        let repo = Repository::open(root).map_err(|e| match e.code() {
            ErrorCode::NotFound => GitError::RepositoryNotFound(root.to_path_buf()),
            _ => GitError::OpenFailed(e.to_string()),
        })?;
        Self::with_worktree(repo)
    }

    /// Find the repository containing `dir`, typically a package directory
    #[instrument(fields(dir = %dir.display()))]
    pub fn discover(dir: &Path) -> Result<Self> {
        let repo = Repository::discover(dir).map_err(|e| match e.code() {
            ErrorCode::NotFound => GitError::NotARepository(dir.to_path_buf()),
            _ => GitError::OpenFailed(e.to_string()),
        })?;
        Self::with_worktree(repo)
    }

    fn with_worktree(repo: Repository) -> Result<Self> {
        let root = repo
            .workdir()
            .ok_or_else(|| GitError::BareRepository(repo.path().to_path_buf()))?
            .to_path_buf();
        debug!(root = %root.display(), "repository opened");
        Ok(Self { repo, root })
    }

    /// Working tree root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `dir` relative to the root, or `None` when it lies outside the working tree
    pub fn relative_path(&self, dir: &Path) -> Option<PathBuf> {
        if let Ok(rel) = dir.strip_prefix(&self.root) {
            return Some(rel.to_path_buf());
        }

        // Symlinked temp dirs (e.g. /var -> /private/var) only match once resolved
        let dir = dir.canonicalize().ok()?;
        let root = self.root.canonicalize().ok()?;
        dir.strip_prefix(root).ok().map(Path::to_path_buf)
    }
}
