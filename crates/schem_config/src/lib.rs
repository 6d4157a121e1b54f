//! Parsing and validation of `schemgen.toml` project configuration files.
//!
//! The configuration names the design being generated (module, language,
//! architecture, output directory), the schematic grid, and lint overrides.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_path, load_config_from_str, CONFIG_FILE_NAME};
pub use types::*;
