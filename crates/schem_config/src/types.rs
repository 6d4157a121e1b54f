//! Configuration types deserialized from `schemgen.toml`.

use schem_common::Language;
use serde::Deserialize;

/// The top-level configuration parsed from `schemgen.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectConfig {
    /// The design being generated.
    #[serde(default)]
    pub design: DesignConfig,
    /// Schematic canvas settings.
    #[serde(default)]
    pub schematic: SchematicConfig,
    /// Lint settings (deny/allow/warn rules).
    #[serde(default)]
    pub lint: LintConfig,
}

/// Settings of the design whose HDL is generated.
#[derive(Debug, Deserialize)]
pub struct DesignConfig {
    /// Name of the generated entity/module.
    #[serde(default)]
    pub module: String,
    /// Output language of the generated files.
    #[serde(default)]
    pub language: Language,
    /// VHDL architecture name.
    #[serde(default = "default_architecture")]
    pub architecture: String,
    /// Directory the generated files are written to.
    #[serde(default)]
    pub output_path: String,
    /// Whether VHDL entity and architecture share one file.
    #[serde(default = "default_true")]
    pub single_file: bool,
}

impl Default for DesignConfig {
    fn default() -> Self {
        Self {
            module: String::new(),
            language: Language::default(),
            architecture: default_architecture(),
            output_path: String::new(),
            single_file: true,
        }
    }
}

fn default_architecture() -> String {
    "struct".to_string()
}

fn default_true() -> bool {
    true
}

/// Schematic canvas settings that influence structural inference.
#[derive(Debug, Deserialize)]
pub struct SchematicConfig {
    /// Canvas grid size; wire endpoints match terminals within a tenth of it.
    #[serde(default = "default_grid_size")]
    pub grid_size: f64,
}

impl Default for SchematicConfig {
    fn default() -> Self {
        Self {
            grid_size: default_grid_size(),
        }
    }
}

fn default_grid_size() -> f64 {
    20.0
}

/// Lint configuration controlling which rules are enabled or promoted.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct LintConfig {
    /// Rule names to treat as errors.
    #[serde(default)]
    pub deny: Vec<String>,
    /// Rule names to suppress.
    #[serde(default)]
    pub allow: Vec<String>,
    /// Rule names to keep as warnings.
    #[serde(default)]
    pub warn: Vec<String>,
}
