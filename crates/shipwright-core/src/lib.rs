//! Shipwright Core - Core library for release automation
//!
//! This crate provides the shared types, error handling, configuration and
//! `${path}` templating used by the Shipwright crates.

pub mod config;
pub mod error;
pub mod template;
pub mod types;

pub use error::{Result, ShipwrightError};
pub use template::TemplateContext;
pub use types::{PackageRelease, PullRequestDraft, ReleaseBranchParams, ReleaseType};
