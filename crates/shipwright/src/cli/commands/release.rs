//! Release command

use std::path::PathBuf;

use clap::Args;
use serde_json::Map;
use tracing::info;

use shipwright_core::ReleaseType;
use shipwright_release::ReleaseOptions;

use super::Workspace;
use crate::cli::{output, Cli, OutputFormat};

/// Run the release pipeline
#[derive(Debug, Args)]
pub struct ReleaseCommand {
    /// Dry run - log changes instead of making them
    #[arg(long)]
    pub dry_run: bool,

    /// Do not write changeset files
    #[arg(long)]
    pub skip_changeset: bool,

    /// Increment recorded in changesets (major, minor, patch, prerelease)
    #[arg(short, long)]
    pub increment: Option<ReleaseType>,

    /// Check out packages without changes after the version bump
    #[arg(long)]
    pub restore_unchanged: bool,

    /// Path changed in this release (repeatable)
    #[arg(long, value_name = "PATH")]
    pub changed: Vec<PathBuf>,
}

impl ReleaseCommand {
    /// Execute the release command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(self.run(cli))
    }

    fn options(&self, base: ReleaseOptions) -> ReleaseOptions {
        ReleaseOptions {
            increment: self.increment.unwrap_or(base.increment),
            dry_run: base.dry_run || self.dry_run,
            skip_changeset: base.skip_changeset || self.skip_changeset,
            restore_unchanged: base.restore_unchanged || self.restore_unchanged,
            changed_paths: (!self.changed.is_empty()).then(|| self.changed.clone()),
        }
    }

    async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(
            dry_run = self.dry_run,
            skip_changeset = self.skip_changeset,
            increment = ?self.increment,
            changed = self.changed.len(),
            "executing release command"
        );
        let workspace = Workspace::load(cli)?;
        let options = self.options(ReleaseOptions::from_config(&workspace.config().release));
        let dry_run = options.dry_run;
        let pipeline = workspace.pipeline().with_options(options);

        if dry_run && !cli.quiet {
            output::info("Dry run: no files will be written");
        }

        let packages = pipeline.load_packages(&workspace.packages()).await?;
        let packages = pipeline.run(packages).await?;
        let draft = pipeline.draft_pull_request(&packages, &Map::new())?;

        match cli.format {
            OutputFormat::Json => {
                let out = serde_json::json!({
                    "packages": packages,
                    "pullRequest": draft,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            }
            OutputFormat::Text => {
                if !cli.quiet {
                    output::print_packages(&packages, cli.verbose);
                    println!();
                    output::print_draft(&draft, true);
                    println!();
                    output::success("Release prepared");
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command() -> ReleaseCommand {
        ReleaseCommand {
            dry_run: false,
            skip_changeset: false,
            increment: None,
            restore_unchanged: false,
            changed: Vec::new(),
        }
    }

    #[test]
    fn test_flags_override_config() {
        let cmd = ReleaseCommand {
            dry_run: true,
            increment: Some(ReleaseType::Major),
            changed: vec![PathBuf::from("packages/ui")],
            ..command()
        };
        let base = ReleaseOptions {
            skip_changeset: true,
            ..ReleaseOptions::default()
        };

        let options = cmd.options(base);

        assert!(options.dry_run);
        assert!(options.skip_changeset);
        assert_eq!(options.increment, ReleaseType::Major);
        assert_eq!(options.changed_paths, Some(vec![PathBuf::from("packages/ui")]));
    }

    #[test]
    fn test_config_values_kept_without_flags() {
        let base = ReleaseOptions {
            increment: ReleaseType::Minor,
            dry_run: true,
            ..ReleaseOptions::default()
        };

        let options = command().options(base);

        assert!(options.dry_run);
        assert_eq!(options.increment, ReleaseType::Minor);
        assert!(options.changed_paths.is_none());
    }
}
