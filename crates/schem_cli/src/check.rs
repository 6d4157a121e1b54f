//! `schemgen check`: generate in memory and report findings only.

use chrono::Utc;
use log::debug;
use schem_config::LintConfig;
use schem_lint::{LintEngine, RuleSummary};

use crate::pipeline::{
    build_request, format_timestamp, load_project, load_snapshot, merge_lint_config, report,
    snapshot_path,
};
use crate::{CheckArgs, CliError, GlobalArgs};

/// Runs the `schemgen check` command.
///
/// Returns exit code 0 if no errors, 1 if there are errors.
pub fn run(args: &CheckArgs, global: &GlobalArgs) -> Result<i32, CliError> {
    if args.list_rules {
        return list_rules(args, global);
    }
    let design = &args.design;
    let (project_dir, config) = load_project(global)?;
    let snapshot = load_snapshot(&snapshot_path(&project_dir, design))?;
    let request = build_request(
        &project_dir,
        &config,
        design,
        format_timestamp(Utc::now()),
    );
    if !global.quiet {
        eprintln!("   Checking {}", request.module_name);
    }

    let generated = schem_codegen::generate(&request, &snapshot)?;
    let errors = report(
        &generated.diagnostics,
        &generated.sensitivity_warnings,
        &generated.sources,
        design.format,
        global,
    );
    Ok(if errors > 0 { 1 } else { 0 })
}

/// Prints the lint rules as the project configuration and flags set them.
fn list_rules(args: &CheckArgs, global: &GlobalArgs) -> Result<i32, CliError> {
    let lint = match load_project(global) {
        Ok((_, config)) => config.lint,
        Err(CliError::ProjectNotFound(dir)) => {
            debug!(dir:?; "no project found, listing default rule levels");
            LintConfig::default()
        }
        Err(e) => return Err(e),
    };
    let lint = merge_lint_config(&lint, &args.design.allow, &args.design.deny);
    print!("{}", rule_list(&LintEngine::new(&lint).rules()));
    Ok(0)
}

/// One aligned row per rule: code, name, level and description.
pub fn rule_list(rules: &[RuleSummary]) -> String {
    let width = rules.iter().map(|r| r.name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for rule in rules {
        let level = match rule.severity {
            Some(severity) => severity.to_string(),
            None => "allow".to_string(),
        };
        out.push_str(&format!(
            "{}  {:<width$}  {:<7}  {}\n",
            rule.code, rule.name, level, rule.description
        ));
    }
    out
}
