//! Shipwright Release - Release naming and pipeline orchestration
//!
//! Turns a set of packages into changelogs, changesets, a version bump and a
//! pull request draft.

pub mod bump;
pub mod changeset;
pub mod join;
pub mod manifest;
pub mod naming;
pub mod pipeline;

pub use bump::{CommandBumper, VersionBumper};
pub use changeset::{changeset_content, changeset_file_name, ChangesetOutcome, ChangesetWriter};
pub use join::join_all_or_fail;
pub use manifest::{FsManifestReader, Manifest, ManifestReader};
pub use naming::ReleaseNaming;
pub use pipeline::{ReleaseOptions, ReleasePipeline};
