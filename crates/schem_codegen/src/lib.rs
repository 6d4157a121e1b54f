//! HDL generation from a schematic connection snapshot.
//!
//! [`generate`] runs the whole pipeline: wire connectivity is inferred from
//! geometry, elements are ordered by generate-frame nesting and priority,
//! the interface and content emitters write VHDL or Verilog text, and every
//! emitted line that belongs to a schematic construct is recorded as a
//! [`LinkEntry`]. The generated files are then linted for sensitivity-list
//! mismatches.

#![warn(missing_docs)]

pub mod body;
pub mod connectivity;
pub mod error;
pub mod hierarchy;
pub mod instance;
pub mod interface;
mod layout;
pub mod links;
pub mod output;
pub mod priority;
pub mod translate;
pub mod writer;

pub use connectivity::{Connectivity, InstanceConnectionDefinition};
pub use error::GenerateError;
pub use hierarchy::{EnclosureQuery, GeometricEnclosure, SequenceItem, SortItem, SortedSequence};
pub use links::{LinkDictionary, LinkEntry, LinkKind, LinkObject, LinkTarget};
pub use output::{GenerateRequest, Generated, GeneratedFile};
pub use writer::SourceWriter;

use log::debug;
use schem_diagnostics::DiagnosticSink;
use schem_lint::{sensitivity_warnings, BlockRegion, LintContext, LintEngine};
use schem_model::{ConnectionSnapshot, SchematicElement};
use schem_source::SourceDb;
use std::collections::HashSet;

fn validate(request: &GenerateRequest, snapshot: &ConnectionSnapshot) -> Result<(), GenerateError> {
    if request.module_name.trim().is_empty() {
        return Err(GenerateError::MissingModuleName);
    }
    if request.output_path.as_os_str().is_empty() {
        return Err(GenerateError::MissingOutputPath);
    }
    if !request.output_path.is_dir() {
        return Err(GenerateError::OutputPathNotFound(request.output_path.clone()));
    }
    if let Some(edit) = snapshot.open_edits.first() {
        return Err(GenerateError::EditInProgress(format!(
            "a {} edit of '{}'",
            edit.kind, edit.target
        )));
    }
    snapshot.validate()?;
    Ok(())
}

/// Every pin must name an instance that exists in the schematic.
fn check_instance_names(snapshot: &ConnectionSnapshot) -> Result<(), GenerateError> {
    let labels: HashSet<&str> = snapshot
        .elements
        .iter()
        .filter_map(|(_, e)| e.symbol())
        .map(instance::label)
        .collect();
    for pin in &snapshot.pins {
        let name = instance::bare_name(&pin.instance_name);
        if !labels.contains(name) {
            return Err(GenerateError::UnresolvedInstanceName(name.to_string()));
        }
    }
    Ok(())
}

/// Sort input for every element, priorities taken from the element text.
pub fn sort_items(snapshot: &ConnectionSnapshot) -> Vec<SortItem> {
    snapshot
        .elements
        .iter()
        .map(|(id, element)| {
            let priority = match &element.content {
                SchematicElement::Block { text } => priority::leading_priority(text).1,
                SchematicElement::Instance { symbol } => {
                    priority::trailing_priority(&symbol.instance_name).1
                }
                SchematicElement::GenerateFrame { condition } => {
                    priority::trailing_priority(condition).1
                }
            };
            SortItem {
                id,
                kind: element.kind(),
                priority,
                rect: element.rect,
            }
        })
        .collect()
}

/// Generates the HDL files of a schematic.
///
/// Fails without producing any text when the request is incomplete, an edit
/// is still open, or the snapshot is inconsistent. Advisories never fail the
/// run; they are returned with the text.
pub fn generate(
    request: &GenerateRequest,
    snapshot: &ConnectionSnapshot,
) -> Result<Generated, GenerateError> {
    validate(request, snapshot)?;
    check_instance_names(snapshot)?;
    let language = request.language;
    let module = request.module_name.trim();

    let connectivity = connectivity::extract(
        language,
        request.grid_size,
        &snapshot.connectors,
        &snapshot.pins,
        &snapshot.wires,
    );
    debug!(
        inputs = connectivity.inputs.len(),
        outputs = connectivity.outputs.len(),
        inouts = connectivity.inouts.len(),
        signals = connectivity.signals.len(),
        connections = connectivity.connections.len();
        "extracted connectivity"
    );

    let items = sort_items(snapshot);
    let sorted = hierarchy::sort(&items, &GeometricEnclosure::new(&items));
    debug!(items = sorted.items.len(), advisories = sorted.diagnostics.len(); "sorted elements");

    let names = request.file_names();
    let ctx = body::BodyContext {
        module,
        architecture: &request.architecture,
        language,
        snapshot,
        connectivity: &connectivity,
        sequence: &sorted.items,
    };

    let mut writers = Vec::new();
    let mut w = SourceWriter::new(names[0].clone());
    request.header(&mut w);
    interface::emit(&mut w, module, language, &snapshot.texts, &connectivity);
    if let Some(content_name) = names.get(1) {
        writers.push(w);
        w = SourceWriter::new(content_name.clone());
        request.header(&mut w);
    } else if !language.is_verilog() {
        w.blank();
    }
    let blocks = body::emit(&mut w, &ctx)?;
    writers.push(w);

    let mut sources = SourceDb::new();
    let mut files = Vec::new();
    let mut links = Vec::new();
    let mut content_file = None;
    for writer in writers {
        let name = writer.file().to_string();
        let (text, entries) = writer.finish();
        content_file = Some(sources.add_source(name.clone(), text.clone()));
        links.extend(entries);
        files.push(GeneratedFile {
            path: request.output_path.join(&name),
            name,
            text,
        });
    }
    let content_file = content_file
        .ok_or_else(|| schem_common::InternalError::new("no file was generated"))?;

    let sink = DiagnosticSink::new();
    for diag in sorted.diagnostics {
        sink.emit(diag);
    }
    let readable = connectivity.readable_names(language);
    let regions: Vec<BlockRegion> = blocks
        .iter()
        .filter(|b| b.line_count > 0)
        .map(|b| BlockRegion {
            first_line: b.first_line,
            line_count: b.line_count,
        })
        .collect();
    let lint_ctx = LintContext {
        sources: &sources,
        file: content_file,
        module,
        language,
        readable: &readable,
        blocks: &regions,
    };
    LintEngine::new(&request.lint).run(&lint_ctx, &sink);

    let diagnostics = sink.take_all();
    let sensitivity_warnings = sensitivity_warnings(&diagnostics);
    debug!(
        files = files.len(),
        links = links.len(),
        diagnostics = diagnostics.len();
        "generation finished"
    );
    Ok(Generated {
        files,
        links,
        diagnostics,
        sensitivity_warnings,
        sources,
    })
}
