//! `schemgen generate`: write the HDL files and the link dictionary.

use chrono::Utc;
use log::info;

use crate::pipeline::{
    build_request, format_timestamp, load_project, load_snapshot, report, snapshot_path,
    write_generated,
};
use crate::{CliError, DesignArgs, GlobalArgs};

/// Runs the `schemgen generate` command.
///
/// Returns exit code 0 on success, 1 when a denied rule fired. Files are
/// written either way.
pub fn run(args: &DesignArgs, global: &GlobalArgs) -> Result<i32, CliError> {
    let (project_dir, config) = load_project(global)?;
    let snapshot = load_snapshot(&snapshot_path(&project_dir, args))?;
    let request = build_request(
        &project_dir,
        &config,
        args,
        format_timestamp(Utc::now()),
    );
    if !global.quiet {
        eprintln!("   Generating {} ({:?})", request.module_name, request.language);
    }

    let generated = schem_codegen::generate(&request, &snapshot)?;
    write_generated(&request.output_path, &generated)?;
    if !global.quiet {
        for file in &generated.files {
            eprintln!("      Wrote {}", file.path.display());
        }
    }
    info!(files = generated.files.len(); "generation complete");

    let errors = report(
        &generated.diagnostics,
        &generated.sensitivity_warnings,
        &generated.sources,
        args.format,
        global,
    );
    Ok(if errors > 0 { 1 } else { 0 })
}
