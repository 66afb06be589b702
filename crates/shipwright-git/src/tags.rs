//! Tag resolution

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::repository::Result;
use crate::shell::{quote, ExecOptions, Shell};
use shipwright_core::error::GitError;

/// Reference used when a tag cannot be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TagFallback {
    /// The repository's first commit
    Root,
    /// The literal `HEAD`
    #[default]
    Head,
}

/// Resolves release tags to references through a [`Shell`]
#[derive(Clone)]
pub struct TagResolver {
    shell: Arc<dyn Shell>,
}

impl TagResolver {
    /// Create a resolver using `shell`
    pub fn new(shell: Arc<dyn Shell>) -> Self {
        Self { shell }
    }

    /// Resolve `tag` to a reference.
    ///
    /// An existing tag is returned unchanged. A missing tag, or a failed
    /// existence check, resolves through `fallback`.
    #[instrument(skip(self))]
    pub async fn resolve(&self, tag: Option<&str>, fallback: TagFallback) -> Result<String> {
        if let Some(tag) = tag.filter(|t| !t.is_empty()) {
            if self.tag_exists(tag).await {
                return Ok(tag.to_string());
            }
            debug!(tag, ?fallback, "tag not found, using fallback");
        }

        match fallback {
            TagFallback::Root => self.root_commit().await,
            TagFallback::Head => Ok("HEAD".to_string()),
        }
    }

    /// Whether `tag` exists. Command errors count as "does not exist".
    pub async fn tag_exists(&self, tag: &str) -> bool {
        let command = format!("git tag --list {}", quote(tag));
        match self.shell.exec(&command, ExecOptions::default()).await {
            Ok(out) => out.lines().any(|line| line.trim() == tag),
            Err(e) => {
                debug!(tag, error = %e, "tag existence check failed");
                false
            }
        }
    }

    /// Hash of the repository's first commit
    pub async fn root_commit(&self) -> Result<String> {
        let out = self
            .shell
            .exec("git rev-list --max-parents=0 HEAD", ExecOptions::default())
            .await?;

        out.lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string)
            .ok_or(GitError::NoCommits)
    }

    /// Tags matching a glob, most recently created first
    #[instrument(skip(self))]
    pub async fn tags_matching(&self, pattern: &str) -> Result<Vec<String>> {
        let command = format!(
            "git for-each-ref --sort=-creatordate --format='%(refname:short)' {}",
            quote(&format!("refs/tags/{}", pattern))
        );
        let out = self.shell.exec(&command, ExecOptions::default()).await?;

        let tags: Vec<String> = out
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        debug!(pattern, count = tags.len(), "listed matching tags");
        Ok(tags)
    }
}
