//! Error types for Shipwright

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using ShipwrightError
pub type Result<T> = std::result::Result<T, ShipwrightError>;

/// Main error type for Shipwright operations
#[derive(Debug, Error)]
pub enum ShipwrightError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Git-related errors
    #[error(transparent)]
    Git(#[from] GitError),

    /// Template rendering errors
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Changelog-related errors
    #[error(transparent)]
    Changelog(#[from] ChangelogError),

    /// Manifest-related errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Release pipeline errors
    #[error(transparent)]
    Release(#[from] ReleaseError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found at {0}")]
    NotFound(PathBuf),

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

/// Git-related errors
#[derive(Debug, Error)]
pub enum GitError {
    /// Repository not found
    #[error("Git repository not found at {0}")]
    RepositoryNotFound(PathBuf),

    /// Not a git repository
    #[error("Not a git repository: {0}")]
    NotARepository(PathBuf),

    /// Failed to open repository
    #[error("Failed to open repository: {0}")]
    OpenFailed(String),

    /// Repository has no working tree to write changesets into
    #[error("Bare repository has no working tree: {0}")]
    BareRepository(PathBuf),

    /// A git command exited unsuccessfully
    #[error("Command failed: {command} - {reason}")]
    CommandFailed { command: String, reason: String },

    /// Revision range could not be resolved
    #[error("Invalid revision range '{range}': {reason}")]
    InvalidRange { range: String, reason: String },

    /// Repository has no root commit
    #[error("No commits found in repository")]
    NoCommits,

    /// Blocking git task was cancelled or panicked
    #[error("Git task failed: {0}")]
    TaskFailed(String),

    /// Git2 library error
    #[error("Git error: {0}")]
    Git2(#[from] git2::Error),
}

/// Template errors
#[derive(Debug, Error)]
pub enum TemplateError {
    /// A template setting holds something other than a string
    #[error("Template '{name}' must be a string, found {found}")]
    NotAString { name: String, found: &'static str },
}

/// Changelog-related errors
#[derive(Debug, Error)]
pub enum ChangelogError {
    /// Commit could not be serialized into a template context
    #[error("Failed to build template context for commit {hash}: {reason}")]
    Context { hash: String, reason: String },
}

/// Manifest-related errors
#[derive(Debug, Error)]
pub enum ManifestError {
    /// No supported manifest in the package directory
    #[error("Package manifest not found in {0}")]
    NotFound(PathBuf),

    /// Manifest exists but could not be parsed
    #[error("Failed to parse manifest {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    /// Manifest lacks a required field
    #[error("Manifest {path} is missing field '{field}'")]
    MissingField { path: PathBuf, field: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Release pipeline errors
#[derive(Debug, Error)]
pub enum ReleaseError {
    /// Naming operations need at least one package
    #[error("No packages to release")]
    NoPackages,

    /// The external version bump command failed
    #[error("Version bump failed: {0}")]
    BumpFailed(String),

    /// Writing a changeset file failed
    #[error("Failed to write changeset {path}: {reason}")]
    ChangesetWriteFailed { path: PathBuf, reason: String },
}
