//! schemgen CLI: generates HDL from a schematic snapshot and answers
//! line-to-schematic lookups.
//!
//! `schemgen generate` writes the VHDL or Verilog files and the link
//! dictionary, `schemgen check` runs the same pipeline without writing, and
//! `schemgen lookup` reports which schematic construct produced a line.

#![warn(missing_docs)]

mod check;
mod error;
mod generate;
mod lookup;
mod pipeline;

use std::process;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{debug, info, LevelFilter};
use schem_common::Language;

pub use error::CliError;

/// schemgen: schematic-to-HDL generation and linking.
#[derive(Parser, Debug)]
#[command(name = "schemgen", version, about = "Schematic to HDL generator")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a custom `schemgen.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate the HDL files and the link dictionary.
    Generate(DesignArgs),
    /// Run generation and linting without writing any file.
    Check(CheckArgs),
    /// Show the schematic construct behind a line of a generated file.
    Lookup(LookupArgs),
}

/// Design selection shared by `generate` and `check`.
#[derive(Args, Debug)]
pub struct DesignArgs {
    /// Connection snapshot exported by the schematic editor.
    #[arg(default_value = "schematic.json")]
    pub snapshot: String,

    /// Override the module/entity name.
    #[arg(short, long)]
    pub module: Option<String>,

    /// Override the output language.
    #[arg(short, long, value_enum)]
    pub lang: Option<HdlLanguage>,

    /// Override the output directory.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Write VHDL entity and architecture into separate files.
    #[arg(long)]
    pub split: bool,

    /// Rule names to suppress (e.g., `--allow superfluous-sensitivity`).
    #[arg(long, num_args = 1..)]
    pub allow: Vec<String>,

    /// Rule names to promote to errors (e.g., `--deny missing-sensitivity`).
    #[arg(long, num_args = 1..)]
    pub deny: Vec<String>,

    /// Output format for diagnostics.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `schemgen check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// The design to check.
    #[command(flatten)]
    pub design: DesignArgs,

    /// Print the lint rules and the level each runs at, then exit.
    #[arg(long)]
    pub list_rules: bool,
}

/// Arguments for the `schemgen lookup` subcommand.
#[derive(Args, Debug)]
pub struct LookupArgs {
    /// Generated file name, as written in its `Filename:` header.
    pub file: String,

    /// 1-based line number.
    pub line: u32,

    /// Override the directory holding the link dictionary.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// HDL language selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum HdlLanguage {
    /// VHDL-2008.
    Vhdl,
    /// Verilog-2005.
    Verilog,
    /// SystemVerilog-2017.
    #[value(name = "systemverilog")]
    SystemVerilog,
}

impl From<HdlLanguage> for Language {
    fn from(lang: HdlLanguage) -> Self {
        match lang {
            HdlLanguage::Vhdl => Language::Vhdl,
            HdlLanguage::Verilog => Language::Verilog,
            HdlLanguage::SystemVerilog => Language::SystemVerilog,
        }
    }
}

/// Diagnostic output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::from_str(&cli.log_level).unwrap_or_else(|_| {
            eprintln!("Invalid log level: {}. Using 'warn' instead.", cli.log_level);
            LevelFilter::Warn
        })
    };
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();
    info!(log_level:?; "Starting schemgen");
    debug!(command:? = cli.command; "Parsed arguments");

    let color = match cli.color {
        ColorChoice::Auto => std::env::var("TERM").is_ok_and(|t| t != "dumb"),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };
    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Generate(ref args) => generate::run(args, &global),
        Command::Check(ref args) => check::run(args, &global),
        Command::Lookup(ref args) => lookup::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_generate_default() {
        let cli = Cli::parse_from(["schemgen", "generate"]);
        match cli.command {
            Command::Generate(ref args) => {
                assert_eq!(args.snapshot, "schematic.json");
                assert!(args.module.is_none());
                assert!(args.lang.is_none());
                assert!(!args.split);
                assert_eq!(args.format, ReportFormat::Text);
            }
            _ => panic!("expected Generate command"),
        }
        assert_eq!(cli.log_level, "warn");
    }

    #[test]
    fn parse_generate_with_args() {
        let cli = Cli::parse_from([
            "schemgen",
            "generate",
            "design.json",
            "--module",
            "counter",
            "--lang",
            "systemverilog",
            "--output",
            "hdl",
            "--deny",
            "missing-sensitivity",
            "--format",
            "json",
        ]);
        match cli.command {
            Command::Generate(ref args) => {
                assert_eq!(args.snapshot, "design.json");
                assert_eq!(args.module.as_deref(), Some("counter"));
                assert_eq!(args.lang, Some(HdlLanguage::SystemVerilog));
                assert_eq!(args.output.as_deref(), Some("hdl"));
                assert_eq!(args.deny, vec!["missing-sensitivity"]);
                assert_eq!(args.format, ReportFormat::Json);
            }
            _ => panic!("expected Generate command"),
        }
    }

    #[test]
    fn parse_check_multiple_allow() {
        let cli = Cli::parse_from([
            "schemgen",
            "check",
            "--split",
            "--allow",
            "missing-sensitivity",
            "superfluous-sensitivity",
        ]);
        match cli.command {
            Command::Check(ref args) => {
                assert!(args.design.split);
                assert!(!args.list_rules);
                assert_eq!(
                    args.design.allow,
                    vec!["missing-sensitivity", "superfluous-sensitivity"]
                );
            }
            _ => panic!("expected Check command"),
        }
    }

    #[test]
    fn parse_check_list_rules() {
        let cli = Cli::parse_from([
            "schemgen",
            "check",
            "--list-rules",
            "--deny",
            "missing-sensitivity",
        ]);
        match cli.command {
            Command::Check(ref args) => {
                assert!(args.list_rules);
                assert_eq!(args.design.snapshot, "schematic.json");
                assert_eq!(args.design.deny, vec!["missing-sensitivity"]);
            }
            _ => panic!("expected Check command"),
        }
    }

    #[test]
    fn parse_lookup() {
        let cli = Cli::parse_from(["schemgen", "lookup", "top.vhd", "12", "--format", "json"]);
        match cli.command {
            Command::Lookup(ref args) => {
                assert_eq!(args.file, "top.vhd");
                assert_eq!(args.line, 12);
                assert_eq!(args.format, ReportFormat::Json);
            }
            _ => panic!("expected Lookup command"),
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from([
            "schemgen",
            "--quiet",
            "--color",
            "never",
            "--log-level",
            "debug",
            "--config",
            "/p/schemgen.toml",
            "check",
        ]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert_eq!(cli.color, ColorChoice::Never);
        assert_eq!(cli.log_level, "debug");
        assert_eq!(cli.config.as_deref(), Some("/p/schemgen.toml"));
    }

    #[test]
    fn languages_map() {
        assert_eq!(Language::from(HdlLanguage::Vhdl), Language::Vhdl);
        assert_eq!(Language::from(HdlLanguage::SystemVerilog), Language::SystemVerilog);
    }
}
