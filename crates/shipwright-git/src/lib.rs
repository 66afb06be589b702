//! Shipwright Git - Git history for release automation
//!
//! This crate resolves release tags against a repository, computes revision
//! ranges and reads raw commit history, either through the `git` command line
//! ([`SystemShell`]) or through libgit2 ([`GitLogSource`]).

mod commits;
pub mod history;
pub mod log;
mod repository;
pub mod shell;
pub mod tags;
#[cfg(test)]
mod test_support;
pub mod types;

pub use history::{get_range, CommitHistory, GitLogOptions};
pub use log::{GitLogSource, LogQuery, LogSource, MAX_LOG_COUNT};
pub use repository::{GitRepo, Result};
pub use shell::{quote, ExecOptions, Shell, SystemShell};
pub use tags::{TagFallback, TagResolver};
pub use types::{LogField, RawCommit};
