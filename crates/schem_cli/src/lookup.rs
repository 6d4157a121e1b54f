//! `schemgen lookup`: the schematic construct behind a generated line.

use std::path::PathBuf;

use schem_codegen::{LinkDictionary, LinkObject, LinkTarget};

use crate::pipeline::{load_links, load_project};
use crate::{CliError, GlobalArgs, LookupArgs, ReportFormat};

/// Runs the `schemgen lookup` command.
pub fn run(args: &LookupArgs, global: &GlobalArgs) -> Result<i32, CliError> {
    let output_dir = match &args.output {
        Some(dir) => PathBuf::from(dir),
        None => {
            let (project_dir, config) = load_project(global)?;
            project_dir.join(&config.design.output_path)
        }
    };
    let links = load_links(&output_dir)?;
    let target = find(&links, &args.file, args.line)?;
    match args.format {
        ReportFormat::Text => println!("{}", describe(target)),
        ReportFormat::Json => {
            let json = serde_json::to_string_pretty(target).unwrap_or_else(|_| "{}".to_string());
            println!("{json}");
        }
    }
    Ok(0)
}

fn find<'a>(links: &'a LinkDictionary, file: &str, line: u32) -> Result<&'a LinkTarget, CliError> {
    links.lookup(file, line).ok_or_else(|| CliError::NoLink {
        file: file.to_string(),
        line,
    })
}

/// One-line description of a link target.
pub fn describe(target: &LinkTarget) -> String {
    let object = match &target.object {
        LinkObject::Design => "design".to_string(),
        LinkObject::Element { id } => format!("element {id}"),
        LinkObject::Signal { name } => format!("signal {name}"),
        LinkObject::Port { instance, port } => format!("port {port} of element {instance}"),
        LinkObject::Component { entity } => format!("component {entity}"),
    };
    format!("{} {object} (line {} of the construct)", target.kind, target.sub_line + 1)
}
