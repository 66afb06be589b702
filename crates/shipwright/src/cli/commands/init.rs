//! Init command

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use shipwright_core::config::{
    parse_config, Config, ConfigFormat, DEFAULT_CONFIG_TEMPLATE, DEFAULT_CONFIG_TOML,
    DEFAULT_CONFIG_YAML,
};

use crate::cli::{output, Cli};

/// Write a starter configuration
#[derive(Debug, Args)]
pub struct InitCommand {
    /// Force overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,

    /// Write TOML instead of YAML
    #[arg(long)]
    pub toml: bool,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl InitCommand {
    /// Execute the init command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(force = self.force, toml = self.toml, "executing init command");
        let cwd = std::env::current_dir()?;
        let default_name = if self.toml {
            DEFAULT_CONFIG_TOML
        } else {
            DEFAULT_CONFIG_YAML
        };
        let config_path = self.output.clone().unwrap_or_else(|| cwd.join(default_name));

        if config_path.exists() && !self.force {
            anyhow::bail!(
                "Configuration file already exists at {}. Use --force to overwrite.",
                config_path.display()
            );
        }

        std::fs::write(&config_path, self.content()?)?;

        if !cli.quiet {
            output::success(&format!(
                "Created configuration at {}",
                output::path_style().apply_to(config_path.display())
            ));
        }

        Ok(())
    }

    fn content(&self) -> anyhow::Result<String> {
        if !self.toml {
            return Ok(DEFAULT_CONFIG_TEMPLATE.to_string());
        }

        let config: Config = parse_config(DEFAULT_CONFIG_TEMPLATE, ConfigFormat::Yaml)?;
        Ok(toml::to_string_pretty(&config)?)
    }
}
