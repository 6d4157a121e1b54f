//! Errors reported by the `schemgen` binary.

use std::path::PathBuf;

use schem_codegen::GenerateError;
use schem_config::ConfigError;

/// Everything that makes a command fail.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// No `schemgen.toml` above the starting directory.
    #[error("could not find schemgen.toml in {} or any parent directory", .0.display())]
    ProjectNotFound(PathBuf),

    /// The configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Generation refused the schematic.
    #[error(transparent)]
    Generate(#[from] GenerateError),

    /// Reading or writing a file failed.
    #[error("failed to access '{}': {source}", path.display())]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A JSON input could not be decoded.
    #[error("invalid JSON in '{}': {source}", path.display())]
    Json {
        /// The file involved.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// `lookup` found no entry for the requested line.
    #[error("no schematic construct is linked to line {line} of '{file}'")]
    NoLink {
        /// Generated file name.
        file: String,
        /// 1-based line.
        line: u32,
    },
}

impl CliError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CliError::Io {
            path: path.into(),
            source,
        }
    }
}
