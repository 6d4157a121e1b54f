//! W106: a sensitivity list names a signal the process never reads.

use schem_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Label, Severity};

use crate::sensitivity::{analyze, Mismatch};
use crate::{LintContext, LintRule};

/// Detects signals listed in a combinational sensitivity list but never
/// read in the body.
pub struct SuperfluousSensitivity;

impl LintRule for SuperfluousSensitivity {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Warning, 106)
    }

    fn name(&self) -> &str {
        "superfluous-sensitivity"
    }

    fn description(&self) -> &str {
        "signal in a sensitivity list that the process never reads"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &LintContext<'_>, sink: &DiagnosticSink) {
        let file = &ctx.source().name;
        for finding in analyze(ctx) {
            if finding.mismatch != Mismatch::NotNeeded {
                continue;
            }
            sink.emit(
                Diagnostic::warning(self.code(), finding.message(ctx.module, file), finding.span)
                    .with_label(Label::primary(
                        finding.span,
                        format!("`{}` is never read", finding.signal),
                    ))
                    .with_help("remove the signal from the sensitivity list"),
            );
        }
    }
}
