//! Configuration system for Shipwright

pub mod defaults;
mod loader;
mod types;
pub mod validation;

pub use defaults::{config_file_names, DEFAULT_CONFIG_TEMPLATE, DEFAULT_CONFIG_TOML, DEFAULT_CONFIG_YAML};
pub use loader::{
    find_config, load_config, load_config_from_dir, load_config_or_default, parse_config,
    ConfigFormat,
};
pub use types::*;
pub use validation::validate_config;
