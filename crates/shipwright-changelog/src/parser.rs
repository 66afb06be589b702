//! Conventional commit parser
//!
//! Recognises an optional `type(scope): ` prefix on the first line of a
//! commit message. Anything without that prefix is kept whole as the message.

use regex::Regex;
use std::sync::LazyLock;

use crate::types::{CommitValue, Commitlint};
use shipwright_git::RawCommit;

/// Default body indentation width
pub const DEFAULT_INDENT: usize = 2;

/// Pull request marker anywhere in a title
static PR_NUMBER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(#(\d+)\)").expect("Invalid regex"));

/// Digits of the first `(#N)` marker in `text`
pub fn extract_pr_number(text: &str) -> Option<String> {
    PR_NUMBER_REGEX
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Parser for commit subjects and bodies
#[derive(Debug, Clone)]
pub struct CommitParser {
    indent: usize,
}

impl CommitParser {
    /// Create a parser indenting bodies by [`DEFAULT_INDENT`]
    pub fn new() -> Self {
        Self {
            indent: DEFAULT_INDENT,
        }
    }

    /// Create a parser with a custom body indentation
    pub fn with_indent(indent: usize) -> Self {
        Self { indent }
    }

    /// Parse a subject and the full raw message.
    ///
    /// The pull request marker is removed from the message but not captured;
    /// see [`extract_pr_number`].
    pub fn parse(&self, subject: &str, raw_body: &str) -> Commitlint {
        let first_line = subject.lines().next().unwrap_or_default();
        let title = strip_pr_marker(first_line);

        // Only the marker-free title is matched, so a stripped `(#N)` stays
        // at the head of the body.
        let body_text = raw_body.strip_prefix(title).unwrap_or(raw_body).trim();
        let body = (!body_text.is_empty()).then(|| self.indent(body_text));

        match split_prefix(title) {
            Some((commit_type, scope, message)) => Commitlint {
                commit_type: Some(commit_type.trim().to_lowercase()),
                scope: scope
                    .map(|s| s.trim().to_lowercase())
                    .filter(|s| !s.is_empty()),
                message: message.to_string(),
                body,
            },
            None => Commitlint {
                body,
                ..Commitlint::message(title)
            },
        }
    }

    /// Build a commit value from a hash and a full message
    pub fn to_commit_value(&self, hash: &str, message: &str) -> CommitValue {
        let title = message.lines().next().unwrap_or_default();
        let base = RawCommit::new(hash, title, message);
        self.parse_raw(base)
    }

    /// Parse a raw commit read from history
    pub fn parse_raw(&self, base: RawCommit) -> CommitValue {
        let commitlint = self.parse(&base.subject, &base.raw_body);
        let pr_number = extract_pr_number(&base.subject);
        CommitValue::new(base, commitlint).with_pr_number(pr_number)
    }

    /// Trim every line of `text` and prefix it with the indentation
    pub fn indent(&self, text: &str) -> String {
        let pad = " ".repeat(self.indent);
        text.lines()
            .map(|line| format!("{}{}", pad, line.trim()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for CommitParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Remove a trailing `(#N)` marker and the whitespace before it
fn strip_pr_marker(title: &str) -> &str {
    let Some(head) = title.trim_end().strip_suffix(')') else {
        return title;
    };
    let Some(open) = head.rfind("(#") else {
        return title;
    };

    let digits = &head[open + 2..];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return title;
    }

    head[..open].trim_end()
}

/// Split `type(scope): message`.
///
/// The scope ends at the first `)` followed by `: ` and a non-empty message.
fn split_prefix(title: &str) -> Option<(&str, Option<&str>, &str)> {
    let type_len = title.bytes().take_while(u8::is_ascii_alphabetic).count();
    if type_len == 0 {
        return None;
    }

    let (commit_type, rest) = title.split_at(type_len);

    if let Some(message) = rest.strip_prefix(": ") {
        return (!message.is_empty()).then_some((commit_type, None, message));
    }

    let inner = rest.strip_prefix('(')?;
    inner.match_indices(')').find_map(|(close, _)| {
        let message = inner[close + 1..].strip_prefix(": ")?;
        (!message.is_empty()).then_some((commit_type, Some(&inner[..close]), message))
    })
}
