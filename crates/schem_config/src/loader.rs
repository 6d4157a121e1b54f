//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ProjectConfig;
use std::path::Path;

/// The file name looked up in a project directory.
pub const CONFIG_FILE_NAME: &str = "schemgen.toml";

/// Loads and validates `<project_dir>/schemgen.toml`.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    load_config_from_path(&project_dir.join(CONFIG_FILE_NAME))
}

/// Loads and validates a configuration file at an explicit path.
pub fn load_config_from_path(path: &Path) -> Result<ProjectConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Checks value ranges and cross-field consistency.
///
/// An empty module name or output path is not rejected here; the generator
/// reports those as fatal generation errors so that programmatic callers get
/// the same behavior.
fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    let grid = config.schematic.grid_size;
    if grid.is_nan() || grid <= 0.0 {
        return Err(ConfigError::ValidationError(format!(
            "schematic.grid_size must be positive, got {grid}"
        )));
    }
    if !config.design.language.is_verilog() && config.design.architecture.trim().is_empty() {
        return Err(ConfigError::MissingField("design.architecture".to_string()));
    }
    Ok(())
}
