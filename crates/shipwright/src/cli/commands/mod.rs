//! CLI commands

mod changelog;
mod init;
mod name;
mod release;

pub use changelog::ChangelogCommand;
pub use init::InitCommand;
pub use name::NameCommand;
pub use release::ReleaseCommand;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use console::style;

use shipwright_core::config::{load_config_or_default, Config, PackageConfig};
use shipwright_git::{GitLogSource, GitRepo, SystemShell};
use shipwright_release::{FsManifestReader, ReleasePipeline};

use crate::cli::{output, Cli};

/// Repository root and configuration shared by the commands
pub(crate) struct Workspace {
    root: PathBuf,
    current_dir: PathBuf,
    config: Config,
}

impl Workspace {
    /// Discover the repository around the current directory and load its config
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let cwd = std::env::current_dir()?;
        let repo = GitRepo::discover(&cwd)?;
        let (config, config_path) = load_config_or_default(&cwd)?;

        if config_path.is_none() && !cli.quiet {
            output::warning(&format!(
                "No configuration found, using defaults. Run {} to create one.",
                style("shipwright init").cyan()
            ));
        }

        Ok(Self {
            root: repo.root().to_path_buf(),
            current_dir: repo.relative_path(&cwd).unwrap_or_default(),
            config,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory the command was run from, relative to the root
    pub fn current_dir(&self) -> Option<&Path> {
        (!self.current_dir.as_os_str().is_empty()).then_some(self.current_dir.as_path())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Configured packages; the repository root when none are listed
    pub fn packages(&self) -> Vec<PackageConfig> {
        if self.config.packages.is_empty() {
            vec![PackageConfig {
                name: None,
                path: PathBuf::from("."),
            }]
        } else {
            self.config.packages.clone()
        }
    }

    /// Pipeline wired to the local repository
    pub fn pipeline(&self) -> ReleasePipeline {
        ReleasePipeline::new(
            &self.config,
            &self.root,
            Arc::new(SystemShell::new(&self.root)),
            Arc::new(GitLogSource::new(&self.root)),
            Arc::new(FsManifestReader::new(&self.root)),
        )
    }
}
