//! Exit codes for the CLI

use shipwright_core::error::{ConfigError, GitError, ManifestError, ReleaseError, TemplateError};
use shipwright_core::ShipwrightError;

/// General error
pub const ERROR: i32 = 1;

/// Configuration error, including malformed naming templates
pub const CONFIG_ERROR: i32 = 2;

/// Git error
pub const GIT_ERROR: i32 = 3;

/// Release pipeline error (manifests, changesets, version bump)
pub const RELEASE_ERROR: i32 = 4;

/// Exit code for an error returned by a command
pub fn for_error(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<ShipwrightError>() {
        Some(ShipwrightError::Config(_) | ShipwrightError::Template(_)) => CONFIG_ERROR,
        Some(ShipwrightError::Git(_)) => GIT_ERROR,
        Some(ShipwrightError::Manifest(_) | ShipwrightError::Release(_)) => RELEASE_ERROR,
        Some(_) => ERROR,
        None if error.is::<ConfigError>() || error.is::<TemplateError>() => CONFIG_ERROR,
        None if error.is::<GitError>() => GIT_ERROR,
        None if error.is::<ManifestError>() || error.is::<ReleaseError>() => RELEASE_ERROR,
        None => ERROR,
    }
}
