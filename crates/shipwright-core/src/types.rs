//! Core types for Shipwright

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Kind of version increment recorded in a changeset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseType {
    /// Major version bump (breaking changes)
    Major,
    /// Minor version bump (new features)
    Minor,
    /// Patch version bump (bug fixes)
    Patch,
    /// Pre-release version
    Prerelease,
}

impl ReleaseType {
    /// Returns the string representation of the release type
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Patch => "patch",
            Self::Prerelease => "prerelease",
        }
    }
}

impl Default for ReleaseType {
    fn default() -> Self {
        Self::Patch
    }
}

impl std::fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ReleaseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "major" => Ok(Self::Major),
            "minor" => Ok(Self::Minor),
            "patch" => Ok(Self::Patch),
            "prerelease" | "pre" => Ok(Self::Prerelease),
            _ => Err(format!("Unknown release type: {}", s)),
        }
    }
}

/// One package taking part in a release run.
///
/// Created with name, version and path; the pipeline fills in `last_tag` and
/// `changelog`, then refreshes `version` and `tag_name` after the bump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageRelease {
    /// Package name
    pub name: String,
    /// Current version
    pub version: String,
    /// Package directory, relative to the repository root
    pub path: PathBuf,
    /// Tag of the previous release
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_tag: Option<String>,
    /// Tag for the release being prepared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_name: Option<String>,
    /// Rendered changelog text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changelog: Option<String>,
}

impl PackageRelease {
    /// Create a new package release record
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            path: path.into(),
            last_tag: None,
            tag_name: None,
            changelog: None,
        }
    }

    /// Set a previously known release tag
    pub fn with_last_tag(mut self, tag: impl Into<String>) -> Self {
        self.last_tag = Some(tag.into());
        self
    }

    /// Set the changelog text
    pub fn with_changelog(mut self, changelog: impl Into<String>) -> Self {
        self.changelog = Some(changelog.into());
        self
    }

    /// `name@version`, as used in batch summaries
    pub fn versioned_name(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }
}

/// Tag and branch computed once per release run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseBranchParams {
    /// Release tag name
    pub tag_name: String,
    /// Release branch name
    pub release_branch: String,
}

/// Everything the pull request collaborator needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestDraft {
    /// Head branch of the pull request
    pub branch: String,
    /// Tag to create once merged
    pub tag_name: String,
    /// Pull request title
    pub title: String,
    /// Pull request body
    pub body: String,
}
