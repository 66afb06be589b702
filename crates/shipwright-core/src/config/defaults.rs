//! Default configuration values

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "shipwright.yaml";

/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "shipwright.toml";

/// Get list of config file names to search for
pub fn config_file_names() -> Vec<&'static str> {
    vec![
        DEFAULT_CONFIG_YAML,
        DEFAULT_CONFIG_TOML,
        ".shipwright.yaml",
        ".shipwright.toml",
    ]
}

/// Default configuration template
pub const DEFAULT_CONFIG_TEMPLATE: &str = r####"# Shipwright Configuration

packages:
  - path: .

changelog:
  include_body: false
  body_indent: 2
  types:
    - type: feat
      section: "### Features"
    - type: fix
      section: "### Bug Fixes"
    - type: perf
      section: "### Performance Improvements"
    - type: chore
      hidden: true

git:
  no_merges: true

naming:
  tag: "${name}@${version}"
  branch: "release-${tagName}"
  batch_branch: "batch-${releaseName}-${length}-packages-${timestamp}"
  batch_tag: "batch-${length}-packages-${timestamp}"
  max_workspace: 3

release:
  increment: patch
  changeset_dir: .changeset
  bump_command: npx changeset version
"####;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_template_parses() {
        let config: Config = serde_yaml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        assert_eq!(config.packages.len(), 1);
        assert_eq!(config.changelog.types.len(), 4);
        assert_eq!(config.naming.max_workspace, 3);
    }

    #[test]
    fn test_template_keeps_markdown_headings() {
        let config: Config = serde_yaml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        let sections: Vec<_> = config
            .changelog
            .types
            .iter()
            .filter_map(|t| t.section.as_deref())
            .collect();
        assert_eq!(
            sections,
            vec!["### Features", "### Bug Fixes", "### Performance Improvements"]
        );
        assert!(DEFAULT_CONFIG_TEMPLATE.ends_with("bump_command: npx changeset version\n"));
        assert_eq!(config.release.bump_command.as_deref(), Some("npx changeset version"));
    }
}
