//! Common result and error types for the schemgen workspace.

/// The standard result type for fallible internal operations.
///
/// `Err` indicates a broken internal invariant (a bug in schemgen), not a
/// user-facing problem. User problems are reported through the diagnostic
/// sink or the generator's own error type.
pub type SchemResult<T> = Result<T, InternalError>;

/// An internal error indicating a bug in schemgen, not a problem with the schematic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("internal generator error: {message}")]
pub struct InternalError {
    /// Description of the internal error.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for InternalError {
    fn from(message: String) -> Self {
        Self { message }
    }
}
