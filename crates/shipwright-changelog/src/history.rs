//! Parsed commit history

use tracing::{debug, instrument};

use crate::parser::CommitParser;
use crate::types::CommitValue;
use shipwright_core::error::GitError;
use shipwright_git::{CommitHistory, GitLogOptions};

/// Read the raw log for `options` and parse every commit
#[instrument(skip(history, parser))]
pub async fn get_commits(
    history: &CommitHistory,
    parser: &CommitParser,
    options: &GitLogOptions,
) -> Result<Vec<CommitValue>, GitError> {
    let raw = history.get_git_log(options).await?;
    let commits: Vec<CommitValue> = raw.into_iter().map(|c| parser.parse_raw(c)).collect();

    debug!(count = commits.len(), "parsed commits");
    Ok(commits)
}
