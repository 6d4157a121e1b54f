//! Shared pipeline helpers for CLI commands.
//!
//! Project root resolution, snapshot loading, request assembly, writing of
//! generated files and the link dictionary, and diagnostic reporting.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{debug, info};
use schem_codegen::{GenerateRequest, Generated, LinkDictionary};
use schem_config::{LintConfig, ProjectConfig, CONFIG_FILE_NAME};
use schem_diagnostics::{Diagnostic, DiagnosticRenderer, Severity, TerminalRenderer};
use schem_model::ConnectionSnapshot;
use schem_source::SourceDb;

use crate::{CliError, DesignArgs, GlobalArgs, ReportFormat};

/// File the link dictionary is stored in, inside the output directory.
pub const LINKS_FILE_NAME: &str = "schemgen-links.json";

/// Walks up from `start` looking for the nearest directory containing `schemgen.toml`.
pub fn find_project_root(start: &Path) -> Result<PathBuf, CliError> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE_NAME).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(CliError::ProjectNotFound(start.to_path_buf()));
        }
    }
}

/// Resolves the project root directory and loads its configuration.
///
/// If `--config` is specified, that file is loaded and its directory is the
/// root. Otherwise the current directory and its parents are searched.
pub fn load_project(global: &GlobalArgs) -> Result<(PathBuf, ProjectConfig), CliError> {
    if let Some(ref config_path) = global.config {
        let path = PathBuf::from(config_path);
        let (dir, file) = if path.is_dir() {
            (path.clone(), path.join(CONFIG_FILE_NAME))
        } else {
            let dir = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            (dir, path)
        };
        let config = schem_config::load_config_from_path(&file)?;
        return Ok((dir, config));
    }
    let cwd = std::env::current_dir().map_err(|e| CliError::io(".", e))?;
    let dir = find_project_root(&cwd)?;
    let config = schem_config::load_config(&dir)?;
    Ok((dir, config))
}

/// Reads a connection snapshot from JSON.
pub fn load_snapshot(path: &Path) -> Result<ConnectionSnapshot, CliError> {
    let text = std::fs::read_to_string(path).map_err(|e| CliError::io(path, e))?;
    serde_json::from_str(&text).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Merges CLI `--allow`/`--deny` flags with the config file's lint section.
///
/// CLI flags take precedence: if a rule appears in both CLI `--allow` and
/// config `deny`, the CLI `--allow` wins.
pub fn merge_lint_config(
    config: &LintConfig,
    allow_args: &[String],
    deny_args: &[String],
) -> LintConfig {
    let mut deny = config.deny.clone();
    let mut allow = config.allow.clone();

    for rule in deny_args {
        allow.retain(|r| r != rule);
        if !deny.contains(rule) {
            deny.push(rule.clone());
        }
    }
    for rule in allow_args {
        deny.retain(|r| r != rule);
        if !allow.contains(rule) {
            allow.push(rule.clone());
        }
    }

    LintConfig {
        deny,
        allow,
        warn: config.warn.clone(),
    }
}

/// Builds the generation request from the configuration and CLI overrides.
pub fn build_request(
    project_dir: &Path,
    config: &ProjectConfig,
    args: &DesignArgs,
    timestamp: String,
) -> GenerateRequest {
    let mut request = GenerateRequest::from_config(config, project_dir, timestamp);
    if let Some(module) = &args.module {
        request.module_name = module.clone();
    }
    if let Some(lang) = args.lang {
        request.language = lang.into();
    }
    if let Some(output) = &args.output {
        request.output_path = project_dir.join(output);
    }
    if args.split {
        request.single_file = false;
    }
    request.lint = merge_lint_config(&config.lint, &args.allow, &args.deny);
    request
}

/// Resolves the snapshot path relative to the project directory.
pub fn snapshot_path(project_dir: &Path, args: &DesignArgs) -> PathBuf {
    project_dir.join(&args.snapshot)
}

/// Formats a UTC time as `YYYY-MM-DD HH:MM:SS`.
pub fn format_timestamp(time: DateTime<Utc>) -> String {
    time.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Reads the link dictionary of an output directory; empty when absent.
pub fn load_links(output_dir: &Path) -> Result<LinkDictionary, CliError> {
    let path = output_dir.join(LINKS_FILE_NAME);
    if !path.exists() {
        return Ok(LinkDictionary::new());
    }
    let text = std::fs::read_to_string(&path).map_err(|e| CliError::io(&path, e))?;
    serde_json::from_str(&text).map_err(|source| CliError::Json { path, source })
}

/// Writes the generated files and merges their links into the dictionary.
pub fn write_generated(output_dir: &Path, generated: &Generated) -> Result<(), CliError> {
    for file in &generated.files {
        std::fs::write(&file.path, &file.text).map_err(|e| CliError::io(&file.path, e))?;
        info!(path:? = file.path; "wrote generated file");
    }
    let mut links = load_links(output_dir)?;
    for file in &generated.files {
        links.replace_file(&file.name, &generated.links);
    }
    let path = output_dir.join(LINKS_FILE_NAME);
    let json = serde_json::to_string_pretty(&links).map_err(|source| CliError::Json {
        path: path.clone(),
        source,
    })?;
    std::fs::write(&path, json).map_err(|e| CliError::io(&path, e))?;
    debug!(entries = generated.links.len(); "updated link dictionary");
    Ok(())
}

/// Prints diagnostics and sensitivity warnings; returns the error count.
pub fn report(
    diagnostics: &[Diagnostic],
    warnings: &[String],
    sources: &SourceDb,
    format: ReportFormat,
    global: &GlobalArgs,
) -> usize {
    match format {
        ReportFormat::Text => {
            if !global.quiet {
                let renderer = TerminalRenderer::new(global.color);
                for diag in diagnostics {
                    eprintln!("{}", renderer.render(diag, sources));
                }
                for warning in warnings {
                    eprint!("{warning}");
                }
            }
        }
        ReportFormat::Json => {
            let json =
                serde_json::to_string_pretty(diagnostics).unwrap_or_else(|_| "[]".to_string());
            println!("{json}");
        }
    }

    let errors = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    let warnings = diagnostics.len() - errors;
    if !global.quiet && format == ReportFormat::Text {
        eprintln!("   Result: {errors} error(s), {warnings} warning(s)");
    }
    errors
}
