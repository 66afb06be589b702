//! Commit log sources

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::instrument;

use crate::repository::{GitRepo, Result};
use crate::types::{LogField, RawCommit};
use shipwright_core::error::GitError;

/// Upper bound on commits returned by a single query
pub const MAX_LOG_COUNT: usize = 1000;

/// A request for raw commit history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogQuery {
    /// `A..B` or a single reference
    pub range: String,
    /// Only commits touching this directory
    pub path: Option<PathBuf>,
    /// Fields to populate
    pub fields: Vec<LogField>,
    /// Whether merge commits are returned
    pub include_merges: bool,
    /// Maximum number of commits
    pub max_count: usize,
}

impl LogQuery {
    /// Query `range` with default fields, no merges, capped at [`MAX_LOG_COUNT`]
    pub fn new(range: impl Into<String>) -> Self {
        Self {
            range: range.into(),
            path: None,
            fields: LogField::defaults(),
            include_merges: false,
            max_count: MAX_LOG_COUNT,
        }
    }

    /// Restrict to a directory
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// Source of raw commits
#[async_trait]
pub trait LogSource: Send + Sync {
    /// Return the commits selected by `query`, newest first
    async fn query(&self, query: &LogQuery) -> Result<Vec<RawCommit>>;
}

/// [`LogSource`] reading a local repository through libgit2
#[derive(Debug, Clone)]
pub struct GitLogSource {
    root: PathBuf,
}

impl GitLogSource {
    /// Read the repository at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl LogSource for GitLogSource {
    #[instrument(skip(self, query), fields(root = %self.root.display(), range = %query.range))]
    async fn query(&self, query: &LogQuery) -> Result<Vec<RawCommit>> {
        let root = self.root.clone();
        let query = query.clone();

        tokio::task::spawn_blocking(move || GitRepo::open(&root)?.log(&query))
            .await
            .map_err(|e| GitError::TaskFailed(e.to_string()))?
    }
}
