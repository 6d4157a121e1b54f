//! Symbol definitions of instantiated sub-designs.

use schem_common::Language;
use serde::{Deserialize, Serialize};

/// How the architecture of an instance is selected in VHDL.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigStatement {
    /// Default binding; a component is declared and instantiated.
    #[default]
    None,
    /// A configuration specification (`for u : e use entity ...`) is embedded
    /// in the enclosing declarative region.
    Embedded,
    /// The entity and architecture are named at the instance itself.
    AtInstance,
}

/// Library and configuration style of an instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Library holding the instantiated entity.
    #[serde(default = "default_library")]
    pub library: String,
    /// Configuration style.
    #[serde(default)]
    pub config_statement: ConfigStatement,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            library: default_library(),
            config_statement: ConfigStatement::None,
        }
    }
}

fn default_library() -> String {
    "work".to_string()
}

/// Everything the generator needs to know about an instantiated symbol.
///
/// Port and generic texts are written in the symbol's own `language`, which
/// may differ from the language of the design being generated.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SymbolDefinition {
    /// Language the symbol's entity/module is written in.
    #[serde(default)]
    pub language: Language,
    /// Library and configuration style.
    #[serde(default)]
    pub configuration: Configuration,
    /// Port declarations of the entity, one per entry.
    #[serde(default)]
    pub port_list: Vec<String>,
    /// Generic-map text of this instance (`g => v` or `.g(v)` lines).
    #[serde(default)]
    pub generic_block: String,
    /// Generic declarations of the entity, used for component declarations.
    #[serde(default)]
    pub generic_definition: String,
    /// Instance label as shown on the canvas; may carry a priority comment.
    pub instance_name: String,
    /// Name of the instantiated entity/module.
    pub entity_name: String,
    /// Architecture selected for the instance.
    #[serde(default)]
    pub architecture_name: String,
    /// Source file of the symbol's entity.
    #[serde(default)]
    pub filename: String,
    /// Further files the symbol depends on.
    #[serde(default)]
    pub additional_files: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let json = r#"{"instance_name": "u_cnt", "entity_name": "counter"}"#;
        let symbol: SymbolDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(symbol.language, Language::Vhdl);
        assert_eq!(symbol.configuration.library, "work");
        assert_eq!(symbol.configuration.config_statement, ConfigStatement::None);
        assert!(symbol.port_list.is_empty());
    }

    #[test]
    fn config_statement_names() {
        let c: ConfigStatement = serde_json::from_str("\"at_instance\"").unwrap();
        assert_eq!(c, ConfigStatement::AtInstance);
        let c: ConfigStatement = serde_json::from_str("\"embedded\"").unwrap();
        assert_eq!(c, ConfigStatement::Embedded);
    }
}
