//! Release pipeline
//!
//! Changelogs are generated concurrently, one task per package, and joined
//! fail-fast. Everything after the join runs in order: changesets, one
//! version bump for the whole batch, optional restore of untouched packages
//! and a manifest refresh.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, info, instrument, warn};

use crate::bump::{CommandBumper, VersionBumper};
use crate::changeset::{ChangesetOutcome, ChangesetWriter};
use crate::join::join_all_or_fail;
use crate::manifest::ManifestReader;
use crate::naming::ReleaseNaming;
use shipwright_changelog::{get_commits, ChangelogFormatter, CommitParser};
use shipwright_core::config::{Config, PackageConfig, ReleaseConfig, TypeConfig};
use shipwright_core::error::GitError;
use shipwright_core::{PackageRelease, PullRequestDraft, ReleaseType, Result, ShipwrightError};
use shipwright_git::{quote, CommitHistory, ExecOptions, GitLogOptions, LogSource, Shell};

/// Switches for one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseOptions {
    /// Increment recorded in changesets
    pub increment: ReleaseType,
    /// Log mutations instead of performing them
    pub dry_run: bool,
    /// Do not write changesets
    pub skip_changeset: bool,
    /// Check out packages without changes after the bump
    pub restore_unchanged: bool,
    /// Paths changed in this release, supplied by the caller
    pub changed_paths: Option<Vec<PathBuf>>,
}

impl ReleaseOptions {
    /// Options from the `release` configuration section
    pub fn from_config(config: &ReleaseConfig) -> Self {
        Self {
            increment: config.increment,
            dry_run: config.dry_run,
            skip_changeset: config.skip_changeset,
            restore_unchanged: config.restore_unchanged,
            changed_paths: None,
        }
    }
}

/// Orchestrates a release run over a set of packages
pub struct ReleasePipeline {
    shell: Arc<dyn Shell>,
    history: CommitHistory,
    manifests: Arc<dyn ManifestReader>,
    bumper: Option<Arc<dyn VersionBumper>>,
    naming: ReleaseNaming,
    parser: CommitParser,
    formatter: ChangelogFormatter,
    types: Vec<TypeConfig>,
    no_merges: bool,
    changeset_dir: PathBuf,
    options: ReleaseOptions,
}

impl ReleasePipeline {
    /// Build a pipeline for the repository at `root` from configuration.
    ///
    /// The configured bump command, if any, runs through `shell`.
    pub fn new(
        config: &Config,
        root: &Path,
        shell: Arc<dyn Shell>,
        source: Arc<dyn LogSource>,
        manifests: Arc<dyn ManifestReader>,
    ) -> Self {
        let bumper = config
            .release
            .bump_command
            .as_deref()
            .map(|cmd| Arc::new(CommandBumper::new(shell.clone(), cmd)) as Arc<dyn VersionBumper>);

        Self {
            history: CommitHistory::new(shell.clone(), source),
            shell,
            manifests,
            bumper,
            naming: ReleaseNaming::new(config.naming.clone()),
            parser: CommitParser::with_indent(config.changelog.body_indent),
            formatter: ChangelogFormatter::from_config(&config.changelog),
            types: config.changelog.types.clone(),
            no_merges: config.git.no_merges,
            changeset_dir: root.join(&config.release.changeset_dir),
            options: ReleaseOptions::from_config(&config.release),
        }
    }

    /// Replace the version bumper; `None` skips the bump
    pub fn with_bumper(mut self, bumper: Option<Arc<dyn VersionBumper>>) -> Self {
        self.bumper = bumper;
        self
    }

    /// Replace the naming engine
    pub fn with_naming(mut self, naming: ReleaseNaming) -> Self {
        self.naming = naming;
        self
    }

    /// Replace the run options
    pub fn with_options(mut self, options: ReleaseOptions) -> Self {
        self.options = options;
        self
    }

    /// The naming engine
    pub fn naming(&self) -> &ReleaseNaming {
        &self.naming
    }

    /// Read name and version of every configured package
    #[instrument(skip_all, fields(count = packages.len()))]
    pub async fn load_packages(&self, packages: &[PackageConfig]) -> Result<Vec<PackageRelease>> {
        join_all_or_fail(packages.iter().map(|pkg| async move {
            let manifest = self.manifests.read(&pkg.path).await?;
            let name = pkg.name.clone().unwrap_or(manifest.name);
            Ok::<_, ShipwrightError>(PackageRelease::new(name, manifest.version, pkg.path.clone()))
        }))
        .await
    }

    /// Run the whole pipeline and return the refreshed packages
    #[instrument(skip_all, fields(packages = packages.len(), dry_run = self.options.dry_run))]
    pub async fn run(&self, packages: Vec<PackageRelease>) -> Result<Vec<PackageRelease>> {
        let packages = self.generate_changelogs(packages).await?;
        self.write_changesets(&packages).await?;
        self.bump_versions(&packages).await?;
        self.restore_unchanged(&packages).await?;
        self.refresh_versions(packages).await
    }

    /// Generate every package's changelog concurrently
    pub async fn generate_changelogs(&self, packages: Vec<PackageRelease>) -> Result<Vec<PackageRelease>> {
        info!(count = packages.len(), "generating changelogs");
        let packages =
            join_all_or_fail(packages.into_iter().map(|pkg| self.generate_changelog(pkg))).await?;
        info!("changelogs generated");
        Ok(packages)
    }

    /// Resolve the last tag of `pkg` and render its changelog since that tag
    #[instrument(skip(self, pkg), fields(package = %pkg.name))]
    pub async fn generate_changelog(&self, mut pkg: PackageRelease) -> Result<PackageRelease> {
        let last_tag = self.resolve_last_tag(&pkg).await?;

        let options = GitLogOptions {
            from: Some(last_tag.clone()),
            directory: Some(pkg.path.clone()),
            no_merges: self.no_merges,
            ..GitLogOptions::default()
        };
        let commits = get_commits(&self.history, &self.parser, &options).await?;
        let changelog = self.formatter.changelog(&commits, &self.types)?;

        debug!(%last_tag, commits = commits.len(), "package changelog ready");
        pkg.last_tag = Some(last_tag);
        pkg.changelog = Some(changelog);
        Ok(pkg)
    }

    /// The tag the package was last released under.
    ///
    /// A known `last_tag` is reused. Otherwise the newest tag matching the
    /// package's tag pattern is used, or the candidate tag when none match.
    /// Lookup failures fall back to `<name>-v0.0.0`; template errors do not.
    pub async fn resolve_last_tag(&self, pkg: &PackageRelease) -> Result<String> {
        if let Some(tag) = &pkg.last_tag {
            warn!(package = %pkg.name, %tag, "reusing known last tag");
            return Ok(tag.clone());
        }

        // A non-string naming template is a configuration error and stays fatal
        // for the whole run. Only the tag lookup below is isolated per package.
        let candidate = self.naming.package_tag_name(pkg)?;
        let pattern = self.naming.tag_match_pattern(pkg)?;

        match self.latest_tag(&pattern).await {
            Ok(Some(tag)) => Ok(tag),
            Ok(None) => {
                debug!(package = %pkg.name, %candidate, "no previous tag, using candidate");
                Ok(candidate)
            }
            Err(e) => {
                let fallback = format!("{}-v0.0.0", pkg.name);
                warn!(package = %pkg.name, error = %e, %fallback, "tag lookup failed");
                Ok(fallback)
            }
        }
    }

    async fn latest_tag(&self, pattern: &str) -> std::result::Result<Option<String>, GitError> {
        let tags = self.history.resolver().tags_matching(pattern).await?;
        Ok(tags.into_iter().next())
    }

    /// Write one changeset per package, in order
    pub async fn write_changesets(&self, packages: &[PackageRelease]) -> Result<Vec<ChangesetOutcome>> {
        if self.options.skip_changeset {
            info!("skipping changesets");
            return Ok(Vec::new());
        }

        let writer = ChangesetWriter::new(&self.changeset_dir, self.options.dry_run);
        let mut outcomes = Vec::with_capacity(packages.len());
        for pkg in packages {
            outcomes.push(writer.write(pkg, self.options.increment).await?);
        }
        Ok(outcomes)
    }

    /// Run the version bump once for the batch
    pub async fn bump_versions(&self, packages: &[PackageRelease]) -> Result<()> {
        match &self.bumper {
            Some(bumper) => bumper.bump(packages, self.options.dry_run).await,
            None => {
                info!("no bump command configured");
                Ok(())
            }
        }
    }

    /// Check out packages with no entry in the changed path list.
    ///
    /// Returns the names of the restored packages.
    pub async fn restore_unchanged(&self, packages: &[PackageRelease]) -> Result<Vec<String>> {
        if !self.options.restore_unchanged {
            return Ok(Vec::new());
        }
        let Some(changed) = &self.options.changed_paths else {
            debug!("no changed paths supplied, nothing to restore");
            return Ok(Vec::new());
        };

        let mut restored = Vec::new();
        for pkg in packages {
            if changed.iter().any(|p| is_within(p, &pkg.path)) {
                continue;
            }

            let command = format!("git checkout -- {}", quote(&pkg.path.to_string_lossy()));
            self.shell
                .exec(&command, ExecOptions::mutating(self.options.dry_run))
                .await?;
            info!(package = %pkg.name, "restored unchanged package");
            restored.push(pkg.name.clone());
        }
        Ok(restored)
    }

    /// Re-read versions after the bump and recompute tag names
    pub async fn refresh_versions(&self, packages: Vec<PackageRelease>) -> Result<Vec<PackageRelease>> {
        join_all_or_fail(packages.into_iter().map(|mut pkg| async move {
            let manifest = self.manifests.read(&pkg.path).await?;
            pkg.version = manifest.version;
            pkg.tag_name = Some(self.naming.package_tag_name(&pkg)?);
            debug!(package = %pkg.versioned_name(), "version refreshed");
            Ok::<_, ShipwrightError>(pkg)
        }))
        .await
    }

    /// Compose the pull request for the finished set
    pub fn draft_pull_request(
        &self,
        packages: &[PackageRelease],
        context: &Map<String, Value>,
    ) -> Result<PullRequestDraft> {
        let mut vars = self.naming.config().shared.clone();
        vars.extend(context.clone());
        self.naming.draft(packages, &vars)
    }
}

/// Whether `path` lies under `dir`, ignoring `.` components
fn is_within(path: &Path, dir: &Path) -> bool {
    let strip = |p: &Path| -> PathBuf {
        p.components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect()
    };
    strip(path).starts_with(strip(dir))
}
