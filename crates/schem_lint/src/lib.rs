//! Lint rules run over generated HDL text.
//!
//! The rules compare the sensitivity lists of combinational processes in
//! schematic blocks against the signals those processes read. Findings are
//! [`Diagnostic`]s; [`sensitivity_warnings`] renders them as the one-line
//! warnings shown next to a generation run.

#![warn(missing_docs)]

mod context;
mod engine;
mod rules;
mod sensitivity;
mod tokens;

pub use context::{BlockRegion, LintContext};
pub use engine::{LintEngine, RuleSummary};
pub use rules::{register_builtin_rules, MissingSensitivity, SuperfluousSensitivity};
pub use sensitivity::{analyze, Mismatch, SensitivityFinding};

use schem_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, Severity};

/// A single lint rule that checks a generated file for design issues.
///
/// Each rule has a unique diagnostic code, a human-readable name, a description,
/// and a default severity. The `check` method should emit diagnostics via the
/// provided sink.
pub trait LintRule: Send + Sync {
    /// Returns the diagnostic code for this rule (e.g., W105).
    fn code(&self) -> DiagnosticCode;

    /// Returns the short kebab-case name of this rule (e.g., "missing-sensitivity").
    fn name(&self) -> &str;

    /// Returns a human-readable description of what this rule checks.
    fn description(&self) -> &str;

    /// Returns the default severity for diagnostics emitted by this rule.
    fn default_severity(&self) -> Severity;

    /// Checks one generated file and emits diagnostics to the sink.
    fn check(&self, ctx: &LintContext<'_>, sink: &DiagnosticSink);
}

/// The sensitivity findings among `diagnostics`, one newline-terminated line each.
pub fn sensitivity_warnings(diagnostics: &[Diagnostic]) -> Vec<String> {
    let codes = [MissingSensitivity.code(), SuperfluousSensitivity.code()];
    diagnostics
        .iter()
        .filter(|d| codes.contains(&d.code))
        .map(|d| format!("{}\n", d.message))
        .collect()
}
