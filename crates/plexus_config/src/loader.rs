//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ProjectConfig;
use std::path::Path;

/// Loads and validates a `plexus.toml` configuration from a project directory.
///
/// Reads `<project_dir>/plexus.toml`, parses it, and validates required
/// fields.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    let config_path = project_dir.join("plexus.toml");
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `plexus.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that required fields are present and bounds are usable.
fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.project.name.is_empty() {
        return Err(ConfigError::MissingField("project.name".to_string()));
    }
    if config.project.top.is_empty() {
        return Err(ConfigError::MissingField("project.top".to_string()));
    }
    if config.elaboration.max_unroll_iterations == 0 {
        return Err(ConfigError::InvalidValue {
            field: "elaboration.max_unroll_iterations".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    if config.elaboration.max_specializations == 0 {
        return Err(ConfigError::InvalidValue {
            field: "elaboration.max_specializations".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(())
}
