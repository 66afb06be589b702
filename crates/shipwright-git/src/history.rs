//! Commit history between two references

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::log::{LogQuery, LogSource};
use crate::repository::Result;
use crate::shell::Shell;
use crate::tags::{TagFallback, TagResolver};
use crate::types::{LogField, RawCommit};

/// `from..to`, or just `to` when both ends are the same
pub fn get_range(from: &str, to: &str) -> String {
    if from == to {
        to.to_string()
    } else {
        format!("{}..{}", from, to)
    }
}

/// Options for [`CommitHistory::get_git_log`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitLogOptions {
    /// Start tag; the root commit when absent or unknown
    pub from: Option<String>,
    /// End tag; `HEAD` when absent or unknown
    pub to: Option<String>,
    /// Only commits touching this directory
    pub directory: Option<PathBuf>,
    /// Exclude merge commits
    pub no_merges: bool,
    /// Fields to request from the log source
    pub fields: Vec<LogField>,
}

impl Default for GitLogOptions {
    fn default() -> Self {
        Self {
            from: None,
            to: None,
            directory: None,
            no_merges: true,
            fields: LogField::defaults(),
        }
    }
}

impl GitLogOptions {
    /// Start from a tag
    pub fn from(mut self, tag: impl Into<String>) -> Self {
        self.from = Some(tag.into());
        self
    }

    /// End at a tag
    pub fn to(mut self, tag: impl Into<String>) -> Self {
        self.to = Some(tag.into());
        self
    }

    /// Restrict to a directory
    pub fn in_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }
}

/// Reads raw history between resolved tags
#[derive(Clone)]
pub struct CommitHistory {
    resolver: TagResolver,
    source: Arc<dyn LogSource>,
}

impl CommitHistory {
    /// Resolve tags through `shell` and read commits from `source`
    pub fn new(shell: Arc<dyn Shell>, source: Arc<dyn LogSource>) -> Self {
        Self {
            resolver: TagResolver::new(shell),
            source,
        }
    }

    /// The tag resolver used for range ends
    pub fn resolver(&self) -> &TagResolver {
        &self.resolver
    }

    /// Raw commits in the resolved range. Log source errors propagate.
    #[instrument(skip(self))]
    pub async fn get_git_log(&self, options: &GitLogOptions) -> Result<Vec<RawCommit>> {
        let from = self
            .resolver
            .resolve(options.from.as_deref(), TagFallback::Root)
            .await?;
        let to = self
            .resolver
            .resolve(options.to.as_deref(), TagFallback::Head)
            .await?;

        let query = LogQuery {
            range: get_range(&from, &to),
            path: options.directory.clone(),
            fields: options.fields.clone(),
            include_merges: !options.no_merges,
            ..LogQuery::new(String::new())
        };

        debug!(range = %query.range, path = ?query.path, "querying commit log");
        self.source.query(&query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedShell;
    use async_trait::async_trait;
    use shipwright_core::error::GitError;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSource {
        queries: Mutex<Vec<LogQuery>>,
        fail: bool,
    }

    #[async_trait]
    impl LogSource for RecordingSource {
        async fn query(&self, query: &LogQuery) -> Result<Vec<RawCommit>> {
            self.queries.lock().unwrap().push(query.clone());
            if self.fail {
                return Err(GitError::InvalidRange {
                    range: query.range.clone(),
                    reason: "bad".to_string(),
                });
            }
            Ok(vec![RawCommit::new("abc1234", "feat: x", "feat: x")])
        }
    }

    #[test]
    fn test_get_range() {
        assert_eq!(get_range("v1", "HEAD"), "v1..HEAD");
        assert_eq!(get_range("HEAD", "HEAD"), "HEAD");
    }

    #[tokio::test]
    async fn test_get_git_log_resolves_both_ends() {
        let shell = Arc::new(
            ScriptedShell::new()
                .respond("git tag --list ui@1.0.0", "ui@1.0.0\n")
                .respond("git tag --list", ""),
        );
        let source = Arc::new(RecordingSource::default());
        let history = CommitHistory::new(shell, source.clone());

        let options = GitLogOptions::default()
            .from("ui@1.0.0")
            .in_directory("packages/ui");
        let commits = history.get_git_log(&options).await.unwrap();

        assert_eq!(commits.len(), 1);
        let queries = source.queries.lock().unwrap();
        assert_eq!(queries[0].range, "ui@1.0.0..HEAD");
        assert_eq!(queries[0].path, Some(PathBuf::from("packages/ui")));
        assert!(!queries[0].include_merges);
        assert_eq!(queries[0].max_count, crate::log::MAX_LOG_COUNT);
    }

    #[tokio::test]
    async fn test_first_release_uses_root_commit() {
        let shell = Arc::new(
            ScriptedShell::new()
                .respond("git tag --list", "")
                .respond("git rev-list --max-parents=0", "rootsha\n"),
        );
        let source = Arc::new(RecordingSource::default());
        let history = CommitHistory::new(shell, source.clone());

        history
            .get_git_log(&GitLogOptions::default().from("ui@0.0.1"))
            .await
            .unwrap();

        assert_eq!(source.queries.lock().unwrap()[0].range, "rootsha..HEAD");
    }

    #[tokio::test]
    async fn test_merges_included_when_requested() {
        let shell = Arc::new(ScriptedShell::new().respond("git rev-list", "rootsha\n"));
        let source = Arc::new(RecordingSource::default());
        let history = CommitHistory::new(shell, source.clone());

        let options = GitLogOptions {
            no_merges: false,
            ..GitLogOptions::default()
        };
        history.get_git_log(&options).await.unwrap();

        assert!(source.queries.lock().unwrap()[0].include_merges);
    }

    #[tokio::test]
    async fn test_source_error_propagates() {
        let shell = Arc::new(ScriptedShell::new().respond("git rev-list", "rootsha\n"));
        let source = Arc::new(RecordingSource {
            fail: true,
            ..Default::default()
        });
        let history = CommitHistory::new(shell, source);

        assert!(history
            .get_git_log(&GitLogOptions::default())
            .await
            .is_err());
    }
}
