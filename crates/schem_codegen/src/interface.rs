//! Entity (VHDL) and module header (Verilog) emission.

use crate::connectivity::Connectivity;
use crate::layout::{align_vhdl, separated, Row};
use crate::links::{LinkKind, LinkObject};
use crate::writer::{dedent_lines, SourceWriter};
use schem_common::Language;
use schem_decl::{parse, SignalDeclaration};
use schem_model::FreeText;

/// Returns the ports in emission order: inputs, outputs, inouts.
///
/// Each bucket is sorted by its full declaration text (VHDL) or by the port
/// name (Verilog).
pub fn ordered_ports(connectivity: &Connectivity, language: Language) -> Vec<SignalDeclaration> {
    let mut ports = Vec::new();
    for bucket in [&connectivity.inputs, &connectivity.outputs, &connectivity.inouts] {
        let mut decls: Vec<(String, SignalDeclaration)> = bucket
            .iter()
            .map(|d| (d.trim().to_string(), parse(d, language)))
            .collect();
        if language.is_verilog() {
            decls.sort_by(|a, b| a.1.name.cmp(&b.1.name));
        } else {
            decls.sort_by(|a, b| a.0.cmp(&b.0));
        }
        ports.extend(decls.into_iter().map(|(_, d)| d));
    }
    ports
}

/// Writes package lines, followed by a blank line when there are any.
pub(crate) fn emit_packages(w: &mut SourceWriter, kind: LinkKind, text: &str) {
    let lines = dedent_lines(text);
    if lines.is_empty() {
        return;
    }
    w.linked_lines(kind, &LinkObject::Design, &lines);
    w.blank();
}

/// Writes the interface of the design: packages and the entity or module
/// header.
pub fn emit(
    w: &mut SourceWriter,
    module: &str,
    language: Language,
    texts: &FreeText,
    connectivity: &Connectivity,
) {
    emit_packages(w, LinkKind::InterfacePackages, &texts.interface_packages);
    let ports = ordered_ports(connectivity, language);
    if language.is_verilog() {
        emit_module_header(w, module, language, &texts.interface_generics, &ports);
    } else {
        emit_entity(w, module, &texts.interface_generics, &ports);
    }
}

/// Writes a parenthesized VHDL declaration group (`generic (` / `port (`).
///
/// Returns the next free sub-line.
pub(crate) fn emit_vhdl_group(
    w: &mut SourceWriter,
    opener: &str,
    decls: &[SignalDeclaration],
    frame: (LinkKind, &LinkObject, u32),
    row_link: impl Fn(&SignalDeclaration, u32) -> (LinkKind, LinkObject, u32),
) -> u32 {
    let (kind, object, mut sub_line) = frame;
    w.linked(kind, object, sub_line, opener);
    sub_line += 1;
    w.indent();
    let lines = separated(&align_vhdl(decls, ""), ";", false, Language::Vhdl);
    for (decl, line) in decls.iter().zip(&lines) {
        let (row_kind, row_object, row_sub) = row_link(decl, sub_line);
        w.linked(row_kind, &row_object, row_sub, line);
        sub_line += 1;
    }
    w.dedent();
    w.linked(kind, object, sub_line, ");");
    sub_line + 1
}

/// Parses user generic declarations, one per line.
fn generic_declarations(text: &str, language: Language) -> Vec<SignalDeclaration> {
    text.lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| {
            let row = Row::from_text(l, language);
            let mut decl = parse(&row.code, language);
            decl.comment = row.comment.unwrap_or_default();
            decl
        })
        .collect()
}

fn emit_entity(w: &mut SourceWriter, module: &str, generics: &str, ports: &[SignalDeclaration]) {
    let design = LinkObject::Design;
    let mut entity_line = 0;
    w.linked(LinkKind::Entity, &design, entity_line, &format!("entity {module} is"));
    entity_line += 1;
    w.indent();

    let generics = generic_declarations(generics, Language::Vhdl);
    if !generics.is_empty() {
        emit_vhdl_group(
            w,
            "generic (",
            &generics,
            (LinkKind::InterfaceGenerics, &design, 0),
            |_, sub| (LinkKind::InterfaceGenerics, LinkObject::Design, sub),
        );
    }
    if !ports.is_empty() {
        entity_line = emit_vhdl_group(
            w,
            "port (",
            ports,
            (LinkKind::Entity, &design, entity_line),
            |d, _| {
                (
                    LinkKind::PortDeclaration,
                    LinkObject::Signal {
                        name: d.name.clone(),
                    },
                    0,
                )
            },
        );
    }
    w.dedent();
    w.linked(
        LinkKind::Entity,
        &design,
        entity_line,
        &format!("end entity {module};"),
    );
}

fn emit_module_header(
    w: &mut SourceWriter,
    module: &str,
    language: Language,
    generics: &str,
    ports: &[SignalDeclaration],
) {
    let design = LinkObject::Design;
    let generic_rows: Vec<Row> = generics
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| Row::from_text(l, language))
        .collect();
    if generic_rows.is_empty() && ports.is_empty() {
        w.linked(LinkKind::Entity, &design, 0, &format!("module {module};"));
        return;
    }
    w.linked(LinkKind::Entity, &design, 0, &format!("module {module}"));
    w.indent();

    if !generic_rows.is_empty() {
        let opener = if generics.trim_start().starts_with("parameter") {
            "#("
        } else {
            "#(parameter"
        };
        let mut sub_line = 0;
        w.linked(LinkKind::InterfaceGenerics, &design, sub_line, opener);
        w.indent();
        for line in separated(&generic_rows, ",", false, language) {
            sub_line += 1;
            w.linked(LinkKind::InterfaceGenerics, &design, sub_line, &line);
        }
        w.dedent();
        let closer = if ports.is_empty() { ");" } else { ")" };
        w.linked(LinkKind::InterfaceGenerics, &design, sub_line + 1, closer);
    }

    if !ports.is_empty() {
        w.linked(LinkKind::Entity, &design, 1, "(");
        w.indent();
        let rows: Vec<Row> = ports
            .iter()
            .map(|d| Row {
                code: d.without_comment(language),
                comment: (!d.comment.is_empty()).then(|| d.comment.clone()),
            })
            .collect();
        for (decl, line) in ports.iter().zip(separated(&rows, ",", false, language)) {
            let object = LinkObject::Signal {
                name: decl.name.clone(),
            };
            w.linked(LinkKind::PortDeclaration, &object, 0, &line);
        }
        w.dedent();
        w.linked(LinkKind::Entity, &design, 2, ");");
    }
    w.dedent();
}
