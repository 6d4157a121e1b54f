//! Lint engine that manages rule registration, configuration, and execution.
//!
//! The `LintEngine` accepts a `LintConfig` to control which rules are denied,
//! allowed, or warned, then runs each enabled rule over a generated file.

use std::collections::HashSet;

use log::debug;
use schem_config::LintConfig;
use schem_diagnostics::{DiagnosticCode, DiagnosticSink, Severity};

use crate::rules::register_builtin_rules;
use crate::{LintContext, LintRule};

/// A registered rule and the level it runs at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleSummary {
    /// Diagnostic code of the rule.
    pub code: DiagnosticCode,
    /// Kebab-case rule name, as used by `allow`/`deny`.
    pub name: String,
    /// What the rule checks.
    pub description: String,
    /// Severity of its findings; `None` when the rule is allowed.
    pub severity: Option<Severity>,
}

/// The lint engine that orchestrates running lint rules on generated text.
///
/// Rules are registered at construction time. The engine respects the
/// `LintConfig` to suppress rules (allow), promote rules to errors (deny),
/// or keep them at their default severity (warn).
pub struct LintEngine {
    rules: Vec<Box<dyn LintRule>>,
    denied: HashSet<String>,
    allowed: HashSet<String>,
}

impl LintEngine {
    /// Creates a new lint engine configured by the given `LintConfig`.
    ///
    /// All builtin rules are registered automatically. Rules listed in
    /// `config.deny` are promoted to error severity, and rules listed
    /// in `config.allow` are suppressed entirely.
    pub fn new(config: &LintConfig) -> Self {
        let mut engine = Self {
            rules: Vec::new(),
            denied: config.deny.iter().cloned().collect(),
            allowed: config.allow.iter().cloned().collect(),
        };
        register_builtin_rules(&mut engine);
        engine
    }

    /// Registers a lint rule with the engine.
    pub fn register(&mut self, rule: Box<dyn LintRule>) {
        self.rules.push(rule);
    }

    /// Describes every registered rule as this engine will run it.
    pub fn rules(&self) -> Vec<RuleSummary> {
        self.rules
            .iter()
            .map(|rule| {
                let severity = if self.allowed.contains(rule.name()) {
                    None
                } else if self.denied.contains(rule.name()) {
                    Some(Severity::Error)
                } else {
                    Some(rule.default_severity())
                };
                RuleSummary {
                    code: rule.code(),
                    name: rule.name().to_string(),
                    description: rule.description().to_string(),
                    severity,
                }
            })
            .collect()
    }

    /// Runs every enabled rule over the file described by `ctx`.
    ///
    /// Allowed rules are skipped; diagnostics of denied rules are promoted
    /// to error severity.
    pub fn run(&self, ctx: &LintContext<'_>, sink: &DiagnosticSink) {
        for rule in &self.rules {
            if self.allowed.contains(rule.name()) {
                debug!(rule = rule.name(); "lint rule allowed, skipping");
                continue;
            }

            let temp_sink = DiagnosticSink::new();
            rule.check(ctx, &temp_sink);

            let is_denied = self.denied.contains(rule.name());
            for mut diag in temp_sink.take_all() {
                if is_denied {
                    diag.severity = Severity::Error;
                }
                sink.emit(diag);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::*;
    use schem_diagnostics::{Category, Diagnostic};
    use schem_source::Span;

    struct DummyRule;
    impl LintRule for DummyRule {
        fn code(&self) -> DiagnosticCode {
            DiagnosticCode::new(Category::Warning, 999)
        }
        fn name(&self) -> &str {
            "dummy-rule"
        }
        fn description(&self) -> &str {
            "a test rule"
        }
        fn default_severity(&self) -> Severity {
            Severity::Warning
        }
        fn check(&self, _ctx: &LintContext<'_>, sink: &DiagnosticSink) {
            sink.emit(Diagnostic::warning(self.code(), "dummy warning", Span::DUMMY));
        }
    }

    fn config(deny: &[&str], allow: &[&str]) -> LintConfig {
        LintConfig {
            deny: deny.iter().map(|s| s.to_string()).collect(),
            allow: allow.iter().map(|s| s.to_string()).collect(),
            warn: Vec::new(),
        }
    }

    fn run(engine: &LintEngine) -> Vec<Diagnostic> {
        let db = db_with(MUX);
        let readable = mux_readable();
        let blocks = [MUX_BLOCK];
        let sink = DiagnosticSink::new();
        engine.run(&whole_file(&db, &readable, &blocks), &sink);
        sink.take_all()
    }

    fn names(engine: &LintEngine) -> Vec<String> {
        engine.rules().into_iter().map(|r| r.name).collect()
    }

    #[test]
    fn engine_registers_builtin_rules() {
        let engine = LintEngine::new(&LintConfig::default());
        assert_eq!(names(&engine), vec!["missing-sensitivity", "superfluous-sensitivity"]);
    }

    #[test]
    fn engine_runs_all_rules() {
        let diags = run(&LintEngine::new(&LintConfig::default()));
        let codes: Vec<String> = diags.iter().map(|d| d.code.to_string()).collect();
        assert_eq!(codes, vec!["W105", "W106"]);
        assert!(diags.iter().all(|d| d.severity == Severity::Warning));
    }

    #[test]
    fn engine_custom_rule() {
        let mut engine = LintEngine::new(&LintConfig::default());
        engine.register(Box::new(DummyRule));
        assert_eq!(names(&engine).len(), 3);
        assert!(run(&engine).iter().any(|d| d.message == "dummy warning"));
    }

    #[test]
    fn engine_allow_suppresses_rule() {
        let diags = run(&LintEngine::new(&config(&[], &["superfluous-sensitivity"])));
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code.number, 105);
    }

    #[test]
    fn engine_deny_promotes_severity() {
        let diags = run(&LintEngine::new(&config(&["missing-sensitivity"], &[])));
        assert_eq!(diags[0].severity, Severity::Error);
        assert_eq!(diags[1].severity, Severity::Warning);
    }

    #[test]
    fn summaries_reflect_configuration() {
        let config = config(&["dummy-rule"], &["superfluous-sensitivity"]);
        let mut engine = LintEngine::new(&config);
        engine.register(Box::new(DummyRule));
        let rules = engine.rules();
        assert_eq!(rules[0].code.to_string(), "W105");
        assert_eq!(rules[0].severity, Some(Severity::Warning));
        assert_eq!(rules[1].severity, None);
        assert_eq!(rules[2].severity, Some(Severity::Error));
        assert_eq!(rules[2].description, "a test rule");
    }
}
