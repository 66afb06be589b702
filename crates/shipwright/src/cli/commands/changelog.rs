//! Changelog command

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use console::style;
use tracing::info;

use shipwright_changelog::{get_commits, render, ChangelogFormatter, CommitParser};
use shipwright_git::{CommitHistory, GitLogOptions, GitLogSource, SystemShell};

use super::Workspace;
use crate::cli::{Cli, OutputFormat};

/// Print the changelog of a directory
#[derive(Debug, Args)]
pub struct ChangelogCommand {
    /// Directory to restrict history to, relative to the repository root
    /// (default: the current directory)
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// Start tag (default: the first commit)
    #[arg(long)]
    pub from: Option<String>,

    /// End tag (default: HEAD)
    #[arg(long)]
    pub to: Option<String>,

    /// Include commit bodies
    #[arg(long)]
    pub body: bool,
}

impl ChangelogCommand {
    /// Execute the changelog command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(self.run(cli))
    }

    async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(path = ?self.path, from = ?self.from, to = ?self.to, "executing changelog command");
        let workspace = Workspace::load(cli)?;
        let config = workspace.config();

        let history = CommitHistory::new(
            Arc::new(SystemShell::new(workspace.root())),
            Arc::new(GitLogSource::new(workspace.root())),
        );
        let options = GitLogOptions {
            from: self.from.clone(),
            to: self.to.clone(),
            directory: self
                .path
                .clone()
                .or_else(|| workspace.current_dir().map(Path::to_path_buf)),
            no_merges: config.git.no_merges,
            ..GitLogOptions::default()
        };

        let parser = CommitParser::with_indent(config.changelog.body_indent);
        let commits = get_commits(&history, &parser, &options).await?;

        let formatter = ChangelogFormatter::from_config(&config.changelog)
            .with_body(self.body || config.changelog.include_body);
        let changelog = render(&formatter.format(&commits, &config.changelog.types)?);

        match cli.format {
            OutputFormat::Json => {
                let out = serde_json::json!({
                    "commits": commits,
                    "changelog": changelog,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            }
            OutputFormat::Text => {
                if commits.is_empty() {
                    if !cli.quiet {
                        println!("{}", style("No commits found in range.").yellow());
                    }
                } else {
                    println!("{}", changelog);
                }
            }
        }

        Ok(())
    }
}
