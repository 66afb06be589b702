//! Git types

use serde::{Deserialize, Serialize};

/// A commit as read from history, before any parsing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCommit {
    /// Commit hash (full)
    pub hash: String,
    /// Short hash (first 7 characters)
    pub abbrev_hash: String,
    /// First line of the message
    pub subject: String,
    /// Full message, subject included
    pub raw_body: String,
    /// Message after the subject paragraph, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl RawCommit {
    /// Create a raw commit; the abbreviation is derived from the hash
    pub fn new(
        hash: impl Into<String>,
        subject: impl Into<String>,
        raw_body: impl Into<String>,
    ) -> Self {
        let hash = hash.into();
        let abbrev_hash = hash.chars().take(7).collect();

        Self {
            hash,
            abbrev_hash,
            subject: subject.into(),
            raw_body: raw_body.into(),
            body: None,
        }
    }

    /// Set the body
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Fields a log query may ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LogField {
    Hash,
    AbbrevHash,
    Subject,
    RawBody,
    Body,
}

impl LogField {
    /// Fields requested when the caller does not choose
    pub fn defaults() -> Vec<LogField> {
        vec![Self::Hash, Self::AbbrevHash, Self::Subject, Self::RawBody]
    }
}
