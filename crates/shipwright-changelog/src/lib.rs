//! Shipwright Changelog - Commit parsing and changelog formatting
//!
//! Raw commits from [`shipwright_git`] are parsed into [`CommitValue`]s and
//! rendered into grouped, template-driven changelog lines.

pub mod formatter;
pub mod history;
pub mod parser;
pub mod types;

pub use formatter::{link, render, ChangelogFormatter};
pub use history::get_commits;
pub use parser::{extract_pr_number, CommitParser, DEFAULT_INDENT};
pub use types::{CommitValue, Commitlint};
