//! Parsed commit types

use serde::{Deserialize, Serialize};
use shipwright_git::RawCommit;

/// Structured fields of a conventional commit message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commitlint {
    /// Commit type, lower-cased (feat, fix, ...)
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub commit_type: Option<String>,
    /// Commit scope, lower-cased
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Message without prefix and pull request marker
    pub message: String,
    /// Indented body text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl Commitlint {
    /// A typeless commit
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    /// Key used to group this commit: its type, or its message when typeless
    pub fn group_key(&self) -> &str {
        self.commit_type.as_deref().unwrap_or(&self.message)
    }
}

/// A commit together with its parsed form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitValue {
    /// Commit as read from history
    pub base: RawCommit,
    /// Parsed message
    pub commitlint: Commitlint,
    /// Nested commits; empty unless squashed history is expanded
    #[serde(default)]
    pub commits: Vec<CommitValue>,
    /// Pull request number from a `(#N)` marker
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pr_number: Option<String>,
}

impl CommitValue {
    /// Pair a raw commit with its parsed form
    pub fn new(base: RawCommit, commitlint: Commitlint) -> Self {
        Self {
            base,
            commitlint,
            commits: Vec::new(),
            pr_number: None,
        }
    }

    /// Set the pull request number
    pub fn with_pr_number(mut self, pr_number: Option<String>) -> Self {
        self.pr_number = pr_number;
        self
    }
}
