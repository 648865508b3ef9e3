//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::QuireConfig;
use std::path::Path;

/// Name of the configuration file looked up in a project directory.
pub const CONFIG_FILE_NAME: &str = "quire.toml";

/// Loads `<project_dir>/quire.toml`, or the defaults if the file does not exist.
pub fn load_config(project_dir: &Path) -> Result<QuireConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE_NAME);
    if !config_path.is_file() {
        return Ok(QuireConfig::default());
    }
    load_config_file(&config_path)
}

/// Loads and validates a configuration from an explicit file path.
pub fn load_config_file(path: &Path) -> Result<QuireConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `quire.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<QuireConfig, ConfigError> {
    let config: QuireConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &QuireConfig) -> Result<(), ConfigError> {
    if config
        .diagnostics
        .log
        .as_ref()
        .is_some_and(|log| log.as_os_str().is_empty())
    {
        return Err(ConfigError::ValidationError(
            "diagnostics.log must not be empty".to_string(),
        ));
    }
    if config.build.jobs == Some(0) {
        return Err(ConfigError::ValidationError(
            "build.jobs must be at least 1".to_string(),
        ));
    }
    Ok(())
}
