//! Name command

use clap::Args;
use serde_json::Map;
use tracing::info;

use super::Workspace;
use crate::cli::{output, Cli, OutputFormat};

/// Print release identifiers for the configured packages
#[derive(Debug, Args)]
pub struct NameCommand {
    /// Generate changelogs so the pull request body is filled in
    #[arg(long)]
    pub with_changelog: bool,
}

impl NameCommand {
    /// Execute the name command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(self.run(cli))
    }

    async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(with_changelog = self.with_changelog, "executing name command");
        let workspace = Workspace::load(cli)?;
        let pipeline = workspace.pipeline();
        let naming = pipeline.naming();

        let mut packages = pipeline.load_packages(&workspace.packages()).await?;
        if self.with_changelog {
            packages = pipeline.generate_changelogs(packages).await?;
        }
        for pkg in &mut packages {
            pkg.tag_name = Some(naming.package_tag_name(pkg)?);
        }

        let release_name = naming.release_name(&packages)?;
        let draft = pipeline.draft_pull_request(&packages, &Map::new())?;

        match cli.format {
            OutputFormat::Json => {
                let out = serde_json::json!({
                    "releaseName": release_name,
                    "packages": packages,
                    "pullRequest": draft,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            }
            OutputFormat::Text => {
                println!("{}", output::key_value("release", &release_name));
                println!();
                output::print_packages(&packages, cli.verbose);
                println!();
                output::print_draft(&draft, self.with_changelog || cli.verbose);
            }
        }

        Ok(())
    }
}
