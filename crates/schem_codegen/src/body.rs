//! Architecture (VHDL) and module content (Verilog) emission.

use crate::connectivity::Connectivity;
use crate::hierarchy::SequenceItem;
use crate::instance;
use crate::interface::emit_packages;
use crate::layout::{align_vhdl, separated, Row};
use crate::links::{LinkKind, LinkObject};
use crate::priority::{leading_priority, trailing_priority};
use crate::writer::{dedent_lines, SourceWriter};
use log::trace;
use schem_common::{InternalError, Language, SchemResult};
use schem_decl::{parse, SignalDeclaration};
use schem_model::{
    ConfigStatement, ConnectionSnapshot, ElementId, SchematicElement, SymbolDefinition,
};
use std::collections::HashSet;

/// Everything the content emitter reads.
pub struct BodyContext<'a> {
    /// Module/entity name.
    pub module: &'a str,
    /// VHDL architecture name.
    pub architecture: &'a str,
    /// Design language.
    pub language: Language,
    /// The schematic.
    pub snapshot: &'a ConnectionSnapshot,
    /// Ports, signals and pin connections.
    pub connectivity: &'a Connectivity,
    /// Elements in emission order.
    pub sequence: &'a [SequenceItem],
}

/// Where the lines of a block ended up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmittedBlock {
    /// The block element.
    pub id: ElementId,
    /// First emitted line.
    pub first_line: u32,
    /// Number of emitted lines.
    pub line_count: u32,
}

impl BodyContext<'_> {
    fn element(&self, id: ElementId) -> SchemResult<&SchematicElement> {
        self.snapshot
            .elements
            .try_get(id)
            .map(|e| &e.content)
            .ok_or_else(|| InternalError::new(format!("element {id} is not in the schematic")))
    }

    fn instances(&self) -> impl Iterator<Item = (ElementId, &SymbolDefinition)> + '_ {
        self.sequence.iter().filter_map(|item| match item {
            SequenceItem::Element(id) => self
                .snapshot
                .elements
                .try_get(*id)
                .and_then(|e| e.symbol())
                .map(|s| (*id, s)),
            _ => None,
        })
    }
}

/// Splits a `label:` prefix off a generate condition.
pub fn split_label(condition: &str) -> (Option<&str>, &str) {
    if let Some((label, rest)) = condition.split_once(':') {
        let label = label.trim();
        let is_label = !label.is_empty()
            && !rest.starts_with('=')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if is_label {
            return (Some(label), rest.trim());
        }
    }
    (None, condition.trim())
}

/// Writes the architecture or module content and returns the emitted blocks.
pub fn emit(w: &mut SourceWriter, ctx: &BodyContext<'_>) -> SchemResult<Vec<EmittedBlock>> {
    let texts = &ctx.snapshot.texts;
    if ctx.language.is_verilog() {
        w.indent();
        emit_packages(w, LinkKind::InternalsPackages, &texts.internals_packages);
        emit_declarations(w, LinkKind::FirstDeclarations, &texts.first_declarations);
        emit_signals(w, ctx);
        emit_declarations(w, LinkKind::LastDeclarations, &texts.last_declarations);
        let blocks = emit_sequence(w, ctx)?;
        w.dedent();
        w.line_text("endmodule");
        return Ok(blocks);
    }

    emit_packages(w, LinkKind::InternalsPackages, &texts.internals_packages);
    w.line_text(&format!("architecture {} of {} is", ctx.architecture, ctx.module));
    w.indent();
    emit_declarations(w, LinkKind::FirstDeclarations, &texts.first_declarations);
    emit_signals(w, ctx);
    emit_declarations(w, LinkKind::LastDeclarations, &texts.last_declarations);
    emit_components(w, ctx);
    emit_top_level_configurations(w, ctx);
    w.dedent();
    w.line_text("begin");
    w.indent();
    let blocks = emit_sequence(w, ctx)?;
    w.dedent();
    w.line_text("end architecture;");
    Ok(blocks)
}

fn emit_declarations(w: &mut SourceWriter, kind: LinkKind, text: &str) {
    let lines = dedent_lines(text);
    w.linked_lines(kind, &LinkObject::Design, &lines);
}

fn emit_signals(w: &mut SourceWriter, ctx: &BodyContext<'_>) {
    let language = ctx.language;
    let mut decls: Vec<SignalDeclaration> = ctx
        .connectivity
        .signals
        .iter()
        .map(|raw| {
            let d = parse(raw, language);
            SignalDeclaration {
                subrange: String::new(),
                record_slice: String::new(),
                ..d
            }
        })
        .collect();
    decls.sort_by(|a, b| a.name.cmp(&b.name));

    let lines = if language.is_verilog() {
        let default_kind = if language == Language::SystemVerilog {
            "logic"
        } else {
            "wire"
        };
        let rows: Vec<Row> = decls
            .iter()
            .map(|d| {
                let starts_with_kind = d
                    .type_spec
                    .split_whitespace()
                    .next()
                    .is_some_and(|word| !word.starts_with('[') && word != "signed");
                let type_spec = if starts_with_kind {
                    d.type_spec.clone()
                } else {
                    format!("{default_kind} {}", d.type_spec).trim_end().to_string()
                };
                let code = SignalDeclaration {
                    type_spec,
                    comment: String::new(),
                    ..d.clone()
                }
                .recompose(language);
                Row {
                    code,
                    comment: (!d.comment.is_empty()).then(|| d.comment.clone()),
                }
            })
            .collect();
        separated(&rows, ";", true, language)
    } else {
        separated(&align_vhdl(&decls, "signal "), ";", true, language)
    };
    for (decl, line) in decls.iter().zip(&lines) {
        let object = LinkObject::Signal {
            name: decl.name.clone(),
        };
        w.linked(LinkKind::SignalDeclaration, &object, 0, line);
    }
}

fn emit_components(w: &mut SourceWriter, ctx: &BodyContext<'_>) {
    let mut declared: HashSet<&str> = HashSet::new();
    for (_, symbol) in ctx.instances() {
        if symbol.configuration.config_statement == ConfigStatement::AtInstance {
            continue;
        }
        if declared.insert(symbol.entity_name.as_str()) {
            instance::emit_component(w, symbol);
        }
    }
}

fn nested_ids(sequence: &[SequenceItem]) -> HashSet<ElementId> {
    sequence
        .iter()
        .filter_map(|item| match item {
            SequenceItem::BeginGenerate(children) => Some(children.iter().copied()),
            _ => None,
        })
        .flatten()
        .collect()
}

fn emit_configuration(w: &mut SourceWriter, id: ElementId, symbol: &SymbolDefinition) {
    w.linked(
        LinkKind::EmbeddedLibraryInstruction,
        &LinkObject::Element { id },
        0,
        &instance::configuration_spec(symbol),
    );
}

fn emit_top_level_configurations(w: &mut SourceWriter, ctx: &BodyContext<'_>) {
    let nested = nested_ids(ctx.sequence);
    for (id, symbol) in ctx.instances() {
        if symbol.configuration.config_statement == ConfigStatement::Embedded
            && !nested.contains(&id)
        {
            emit_configuration(w, id, symbol);
        }
    }
}

fn emit_sequence(w: &mut SourceWriter, ctx: &BodyContext<'_>) -> SchemResult<Vec<EmittedBlock>> {
    let language = ctx.language;
    let mut blocks = Vec::new();
    let mut frames: Vec<(ElementId, Option<String>)> = Vec::new();
    let mut last_frame: Option<(ElementId, Option<String>)> = None;

    for item in ctx.sequence {
        match item {
            SequenceItem::Element(id) => {
                let id = *id;
                let object = LinkObject::Element { id };
                match ctx.element(id)? {
                    SchematicElement::Block { text } => {
                        let lines = dedent_lines(leading_priority(text).0);
                        blocks.push(EmittedBlock {
                            id,
                            first_line: w.line(),
                            line_count: lines.len() as u32,
                        });
                        w.linked_lines(LinkKind::Block, &object, &lines);
                    }
                    SchematicElement::Instance { symbol } => {
                        instance::emit(w, id, symbol, language, &ctx.connectivity.connections);
                    }
                    SchematicElement::GenerateFrame { condition } => {
                        let condition = trailing_priority(condition).0;
                        let (label, rest) = split_label(condition);
                        if language.is_verilog() {
                            w.linked(LinkKind::Generate, &object, 0, "generate");
                            for (i, line) in dedent_lines(rest).iter().enumerate() {
                                w.linked(LinkKind::Generate, &object, i as u32 + 1, line);
                            }
                        } else {
                            w.linked_lines(LinkKind::Generate, &object, &dedent_lines(condition));
                        }
                        last_frame = Some((id, label.map(str::to_string)));
                    }
                }
            }
            SequenceItem::BeginGenerate(children) => {
                let frame = last_frame.take().ok_or_else(|| {
                    InternalError::new("generate body opened without a generate frame")
                })?;
                if language.is_verilog() {
                    match &frame.1 {
                        Some(label) => w.line_text(&format!("begin : {label}")),
                        None => w.line_text("begin"),
                    }
                } else {
                    w.indent();
                    for &child in children {
                        if let SchematicElement::Instance { symbol } = ctx.element(child)? {
                            if symbol.configuration.config_statement == ConfigStatement::Embedded {
                                emit_configuration(w, child, symbol);
                            }
                        }
                    }
                    w.dedent();
                    w.line_text("begin");
                }
                frames.push(frame);
                w.indent();
            }
            SequenceItem::EndGenerate(id) => {
                let (frame_id, label) = frames.pop().ok_or_else(|| {
                    InternalError::new(format!("generate frame {id} closed but never opened"))
                })?;
                if frame_id != *id {
                    return Err(InternalError::new(format!(
                        "generate frame {id} closed while frame {frame_id} is open"
                    )));
                }
                w.dedent();
                if language.is_verilog() {
                    w.line_text("end");
                    w.line_text("endgenerate;");
                } else {
                    match label {
                        Some(label) => w.line_text(&format!("end generate {label};")),
                        None => w.line_text("end generate;"),
                    }
                }
            }
        }
    }
    if let Some((open, _)) = frames.last() {
        return Err(InternalError::new(format!("generate frame {open} never closed")));
    }
    trace!(blocks = blocks.len(); "emitted element sequence");
    Ok(blocks)
}
