//! Configuration types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

use crate::types::ReleaseType;

/// Main configuration for Shipwright
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Project name
    pub name: Option<String>,

    /// Package directories taking part in releases
    pub packages: Vec<PackageConfig>,

    /// Changelog configuration
    pub changelog: ChangelogConfig,

    /// Git history configuration
    pub git: GitConfig,

    /// Tag, branch and pull request naming
    pub naming: NamingConfig,

    /// Release pipeline configuration
    pub release: ReleaseConfig,
}

/// A package directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageConfig {
    /// Name override; the manifest name is used when absent
    #[serde(default)]
    pub name: Option<String>,

    /// Path to package (relative to repo root)
    pub path: PathBuf,
}

/// Changelog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangelogConfig {
    /// Commit types to render, in output order
    pub types: Vec<TypeConfig>,

    /// Template for a single commit line
    pub commit_template: String,

    /// Whether commit bodies are appended below their line
    pub include_body: bool,

    /// Indentation width for commit bodies
    pub body_indent: usize,

    /// Repository URL used for commit and pull request links
    pub repo_url: Option<String>,
}

/// Default line template for a commit
pub const DEFAULT_COMMIT_TEMPLATE: &str =
    "\n- ${scopeHeader} ${commitlint.message} ${commitLink} ${prLink}";

impl Default for ChangelogConfig {
    fn default() -> Self {
        Self {
            types: default_types(),
            commit_template: DEFAULT_COMMIT_TEMPLATE.to_string(),
            include_body: false,
            body_indent: 2,
            repo_url: None,
        }
    }
}

fn default_types() -> Vec<TypeConfig> {
    vec![
        TypeConfig::new("feat").with_section("### Features"),
        TypeConfig::new("fix").with_section("### Bug Fixes"),
        TypeConfig::new("perf").with_section("### Performance Improvements"),
        TypeConfig::new("revert").with_section("### Reverts"),
        TypeConfig::new("docs").with_section("### Documentation").hidden(),
        TypeConfig::new("style").with_section("### Styles").hidden(),
        TypeConfig::new("refactor").with_section("### Code Refactoring").hidden(),
        TypeConfig::new("test").with_section("### Tests").hidden(),
        TypeConfig::new("build").with_section("### Build System").hidden(),
        TypeConfig::new("ci").with_section("### Continuous Integration").hidden(),
        TypeConfig::new("chore").with_section("### Chores").hidden(),
    ]
}

/// Configuration for a commit type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeConfig {
    /// Commit type this entry matches
    #[serde(rename = "type")]
    pub commit_type: String,
    /// Heading line emitted before the type's commits
    #[serde(default)]
    pub section: Option<String>,
    /// Whether to hide this type from changelog
    #[serde(default)]
    pub hidden: bool,
}

impl TypeConfig {
    /// Create a visible entry without a heading
    pub fn new(commit_type: impl Into<String>) -> Self {
        Self {
            commit_type: commit_type.into(),
            section: None,
            hidden: false,
        }
    }

    /// Set the heading
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    /// Mark the entry hidden
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }
}

/// Git history configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    /// Exclude merge commits from changelogs
    pub no_merges: bool,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self { no_merges: true }
    }
}

/// Naming templates.
///
/// Templates are kept as raw values; see [`crate::template::render_value`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Per-package tag (`${name}`, `${version}`)
    pub tag: Value,
    /// Pattern used to look up a package's previous tags
    pub tag_match: Value,
    /// Branch for a single-package release
    pub branch: Value,
    /// Branch for a batch release
    pub batch_branch: Value,
    /// Tag for a batch release
    pub batch_tag: Value,
    /// Pull request title
    pub pr_title: Value,
    /// Pull request body
    pub pr_body: Value,
    /// Per-package section of a batch pull request body
    pub pr_body_package: Value,
    /// Number of packages spelled out in a batch release name
    pub max_workspace: usize,
    /// Separator between name and version in a batch release name
    pub version_separator: String,
    /// Separator between packages in a batch release name
    pub workspace_separator: String,
    /// Extra variables available to branch templates
    pub shared: Map<String, Value>,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            tag: Value::from("${name}@${version}"),
            tag_match: Value::from("${name}@*"),
            branch: Value::from("release-${tagName}"),
            batch_branch: Value::from("batch-${releaseName}-${length}-packages-${timestamp}"),
            batch_tag: Value::from("batch-${length}-packages-${timestamp}"),
            pr_title: Value::from("[${pkgName}] Release ${tagName}"),
            pr_body: Value::from("## ${tagName}\n\n${changelog}"),
            pr_body_package: Value::from("## ${name}@${version}\n\n${changelog}\n"),
            max_workspace: 3,
            version_separator: "@".to_string(),
            workspace_separator: "_".to_string(),
            shared: Map::new(),
        }
    }
}

/// Release pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseConfig {
    /// Increment recorded in changesets
    pub increment: ReleaseType,
    /// Skip writing changeset files
    pub skip_changeset: bool,
    /// Directory holding changeset files
    pub changeset_dir: PathBuf,
    /// Command that applies changesets and bumps versions
    pub bump_command: Option<String>,
    /// Check out packages without changes again after the bump
    pub restore_unchanged: bool,
    /// Log mutations instead of performing them
    pub dry_run: bool,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            increment: ReleaseType::Patch,
            skip_changeset: false,
            changeset_dir: PathBuf::from(".changeset"),
            bump_command: Some("npx changeset version".to_string()),
            restore_unchanged: false,
            dry_run: false,
        }
    }
}
