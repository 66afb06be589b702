//! Configuration validation

use tracing::debug;

use crate::error::{ConfigError, Result};

use super::types::Config;

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    debug!("validating configuration");
    validate_changelog(config)?;
    validate_naming(config)?;
    validate_release(config)?;
    validate_packages(config)?;
    debug!("configuration validation passed");
    Ok(())
}

fn invalid(field: impl Into<String>, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.into(),
        message: message.into(),
    }
}

fn validate_changelog(config: &Config) -> Result<()> {
    for (i, entry) in config.changelog.types.iter().enumerate() {
        if entry.commit_type.trim().is_empty() {
            return Err(invalid(format!("changelog.types[{}].type", i), "type cannot be empty").into());
        }
    }

    Ok(())
}

// Template values are not checked here: a non-string template is reported
// when it is rendered.
fn validate_naming(config: &Config) -> Result<()> {
    if config.naming.max_workspace == 0 {
        return Err(invalid("naming.max_workspace", "must be at least 1").into());
    }

    Ok(())
}

fn validate_release(config: &Config) -> Result<()> {
    if config.release.changeset_dir.as_os_str().is_empty() {
        return Err(invalid("release.changeset_dir", "cannot be empty").into());
    }

    if let Some(command) = &config.release.bump_command {
        if command.trim().is_empty() {
            return Err(invalid("release.bump_command", "cannot be blank; omit it instead").into());
        }
    }

    Ok(())
}

fn validate_packages(config: &Config) -> Result<()> {
    for (i, package) in config.packages.iter().enumerate() {
        if package.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(invalid(format!("packages[{}].name", i), "package name cannot be empty").into());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PackageConfig, TypeConfig};
    use crate::error::ShipwrightError;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_empty_type_rejected() {
        let mut config = Config::default();
        config.changelog.types.push(TypeConfig::new(" "));
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ShipwrightError::Config(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_zero_max_workspace_rejected() {
        let mut config = Config::default();
        config.naming.max_workspace = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_blank_bump_command_rejected() {
        let mut config = Config::default();
        config.release.bump_command = Some("  ".to_string());
        assert!(validate_config(&config).is_err());

        config.release.bump_command = None;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_empty_package_name_rejected() {
        let mut config = Config::default();
        config.packages.push(PackageConfig {
            name: Some(String::new()),
            path: "packages/ui".into(),
        });
        assert!(validate_config(&config).is_err());
    }
}
