//! Structured advisory messages.

use crate::code::DiagnosticCode;
use crate::label::Label;
use crate::severity::Severity;
use schem_source::Span;
use serde::{Deserialize, Serialize};

/// A structured diagnostic with an optional location in generated text.
///
/// Findings about the schematic itself (priority collisions, empty generate
/// frames) carry [`Span::DUMMY`] and name the offending element ids in their
/// notes; sensitivity findings point into the generated file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// The code identifying the kind of finding.
    pub code: DiagnosticCode,
    /// The main message.
    pub message: String,
    /// The primary location, or [`Span::DUMMY`].
    pub primary_span: Span,
    /// Additional annotated spans.
    pub labels: Vec<Label>,
    /// Explanatory footnotes.
    pub notes: Vec<String>,
    /// Actionable suggestions.
    pub help: Vec<String>,
}

impl Diagnostic {
    /// Creates a new error diagnostic.
    pub fn error(code: DiagnosticCode, message: impl Into<String>, span: Span) -> Self {
        Self::with_severity(Severity::Error, code, message, span)
    }

    /// Creates a new warning diagnostic.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>, span: Span) -> Self {
        Self::with_severity(Severity::Warning, code, message, span)
    }

    fn with_severity(
        severity: Severity,
        code: DiagnosticCode,
        message: impl Into<String>,
        span: Span,
    ) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            primary_span: span,
            labels: Vec::new(),
            notes: Vec::new(),
            help: Vec::new(),
        }
    }

    /// Adds a label to this diagnostic.
    pub fn with_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    /// Adds a note to this diagnostic.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Adds a help message to this diagnostic.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help.push(help.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::Category;

    #[test]
    fn builder_methods() {
        let code = DiagnosticCode::new(Category::Warning, 301);
        let diag = Diagnostic::warning(code, "duplicate priority", Span::DUMMY)
            .with_label(Label::primary(Span::DUMMY, "here"))
            .with_note("elements 3 and 7 both carry priority 2")
            .with_help("give every sibling a distinct priority");
        assert_eq!(diag.severity, Severity::Warning);
        assert_eq!(format!("{}", diag.code), "W301");
        assert_eq!(diag.labels.len(), 1);
        assert_eq!(diag.notes.len(), 1);
        assert_eq!(diag.help.len(), 1);
    }

    #[test]
    fn error_constructor() {
        let code = DiagnosticCode::new(Category::Warning, 105);
        let diag = Diagnostic::error(code, "promoted", Span::DUMMY);
        assert!(diag.severity.is_error());
    }
}
