//! W105: a combinational process reads a signal its sensitivity list lacks.

use schem_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Label, Severity};

use crate::sensitivity::{analyze, Mismatch};
use crate::{LintContext, LintRule};

/// Detects signals read in a combinational process body but absent from
/// its sensitivity list. Simulation then misses events the hardware reacts to.
pub struct MissingSensitivity;

impl LintRule for MissingSensitivity {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Warning, 105)
    }

    fn name(&self) -> &str {
        "missing-sensitivity"
    }

    fn description(&self) -> &str {
        "signal read in a combinational process but missing from its sensitivity list"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &LintContext<'_>, sink: &DiagnosticSink) {
        let file = &ctx.source().name;
        for finding in analyze(ctx) {
            if finding.mismatch != Mismatch::Missing {
                continue;
            }
            sink.emit(
                Diagnostic::warning(self.code(), finding.message(ctx.module, file), finding.span)
                    .with_label(Label::primary(
                        finding.span,
                        format!("`{}` is read in the process body", finding.signal),
                    ))
                    .with_help("add the signal to the sensitivity list"),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::*;

    #[test]
    fn missing_signal_fires() {
        let db = db_with(MUX);
        let readable = mux_readable();
        let blocks = [MUX_BLOCK];
        let sink = DiagnosticSink::new();
        MissingSensitivity.check(&whole_file(&db, &readable, &blocks), &sink);
        let diags = sink.take_all();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, DiagnosticCode::new(Category::Warning, 105));
        assert_eq!(
            diags[0].message,
            "HDL Sensitivity  : Warning in module mux: The signal b is missing in the sensitivity-list (sel, a, spare) in line 3 of file mux.vhd."
        );
        assert_eq!(db.snippet(diags[0].primary_span), "(sel, a, spare)");
    }

    #[test]
    fn complete_list_is_quiet() {
        let db = db_with(&MUX.replace("spare)", "spare, b)"));
        let readable = mux_readable();
        let blocks = [MUX_BLOCK];
        let sink = DiagnosticSink::new();
        MissingSensitivity.check(&whole_file(&db, &readable, &blocks), &sink);
        assert!(sink.take_all().is_empty());
    }

    #[test]
    fn text_outside_blocks_is_ignored() {
        let db = db_with(MUX);
        let readable = mux_readable();
        let sink = DiagnosticSink::new();
        MissingSensitivity.check(&whole_file(&db, &readable, &[]), &sink);
        assert!(sink.take_all().is_empty());
    }
}
