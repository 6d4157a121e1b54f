//! Fatal generation errors.

use schem_common::InternalError;
use schem_model::SnapshotError;
use std::path::PathBuf;

/// Errors that abort generation before any text is produced.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// The design has no module/entity name.
    #[error("no module name is defined for the design")]
    MissingModuleName,

    /// No output directory is configured.
    #[error("no output path is defined for the design")]
    MissingOutputPath,

    /// The configured output directory does not exist.
    #[error("output path '{}' does not exist", .0.display())]
    OutputPathNotFound(PathBuf),

    /// An edit window in the editor is still open.
    #[error("generation refused while {0} is open")]
    EditInProgress(String),

    /// A pin names an instance that no instance element carries.
    #[error("instance '{0}' is referenced by a connection but no such instance exists")]
    UnresolvedInstanceName(String),

    /// The snapshot is internally inconsistent.
    #[error(transparent)]
    InvalidSnapshot(#[from] SnapshotError),

    /// An invariant of the generator was violated.
    #[error(transparent)]
    Internal(#[from] InternalError),
}
