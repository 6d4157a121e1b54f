//! Instantiation text of schematic instances, plus the VHDL component
//! declarations and configuration specifications they need.

use crate::connectivity::InstanceConnectionDefinition;
use crate::interface::emit_vhdl_group;
use crate::layout::{align_associations, separated, Row};
use crate::links::{LinkKind, LinkObject};
use crate::priority::trailing_priority;
use crate::translate;
use crate::writer::SourceWriter;
use schem_common::Language;
use schem_decl::{parse, split_comment};
use schem_model::{ConfigStatement, ElementId, SymbolDefinition};

/// An instance name with its priority and any other trailing comment removed.
pub fn bare_name(instance_name: &str) -> &str {
    let name = trailing_priority(instance_name).0;
    let name = split_comment(name, Language::Vhdl).0;
    split_comment(name, Language::Verilog).0.trim()
}

/// The label the instance is emitted with.
pub fn label(symbol: &SymbolDefinition) -> &str {
    bare_name(&symbol.instance_name)
}

/// `lib.entity(arch)`, the architecture part omitted when unknown.
fn entity_reference(symbol: &SymbolDefinition) -> String {
    let mut text = format!("{}.{}", symbol.configuration.library, symbol.entity_name);
    if !symbol.architecture_name.is_empty() {
        text.push('(');
        text.push_str(&symbol.architecture_name);
        text.push(')');
    }
    text
}

/// The configuration specification binding a component instance.
pub fn configuration_spec(symbol: &SymbolDefinition) -> String {
    format!(
        "for {} : {} use entity {};",
        label(symbol),
        symbol.entity_name,
        entity_reference(symbol)
    )
}

/// Returns `(port name, actual)` for every port of the symbol.
///
/// Unconnected ports get `open` (VHDL) or an empty actual (Verilog).
fn port_actuals(
    id: ElementId,
    symbol: &SymbolDefinition,
    language: Language,
    connections: &[InstanceConnectionDefinition],
) -> Vec<(String, String)> {
    symbol
        .port_list
        .iter()
        .map(|p| parse(p, symbol.language).name)
        .filter(|name| !name.is_empty())
        .map(|name| {
            let actual = connections
                .iter()
                .filter(|c| c.instance == id)
                .find(|c| parse(&c.port_declaration, symbol.language).name == name)
                .map(|c| parse(&c.connected_signal_declaration, language).connection_text(language))
                .unwrap_or_else(|| {
                    if language.is_verilog() {
                        String::new()
                    } else {
                        "open".to_string()
                    }
                });
            (name, actual)
        })
        .collect()
}

/// Writes the instantiation of `symbol` in the design language.
pub fn emit(
    w: &mut SourceWriter,
    id: ElementId,
    symbol: &SymbolDefinition,
    language: Language,
    connections: &[InstanceConnectionDefinition],
) {
    let ports = port_actuals(id, symbol, language, connections);
    let generics = translate::generic_mappings(&symbol.generic_block, symbol.language);
    if language.is_verilog() {
        emit_verilog(w, id, symbol, &ports, &generics);
    } else {
        emit_vhdl(w, id, symbol, &ports, &generics);
    }
}

fn emit_vhdl(
    w: &mut SourceWriter,
    id: ElementId,
    symbol: &SymbolDefinition,
    ports: &[(String, String)],
    generics: &[translate::GenericMapping],
) {
    let element = LinkObject::Element { id };
    let mut header = match symbol.configuration.config_statement {
        ConfigStatement::AtInstance => {
            format!("{}: entity {}", label(symbol), entity_reference(symbol))
        }
        ConfigStatement::None | ConfigStatement::Embedded => {
            format!("{}: {}", label(symbol), symbol.entity_name)
        }
    };
    if ports.is_empty() && generics.is_empty() {
        header.push(';');
    }
    w.linked(LinkKind::InstanceName, &element, 0, &header);
    w.indent();

    if !generics.is_empty() {
        w.linked(LinkKind::GenericMapping, &element, 0, "generic map (");
        w.indent();
        let pairs: Vec<_> = generics
            .iter()
            .map(|g| (g.name.clone(), g.value.clone(), g.comment.clone()))
            .collect();
        let lines = separated(&align_associations(&pairs), ",", false, Language::Vhdl);
        let mut sub_line = 1;
        for line in &lines {
            w.linked(LinkKind::GenericMapping, &element, sub_line, line);
            sub_line += 1;
        }
        w.dedent();
        let closer = if ports.is_empty() { ");" } else { ")" };
        w.linked(LinkKind::GenericMapping, &element, sub_line, closer);
    }

    if !ports.is_empty() {
        w.linked(LinkKind::PortConnection, &element, 0, "port map (");
        w.indent();
        let pairs: Vec<_> = ports
            .iter()
            .map(|(name, actual)| (name.clone(), actual.clone(), None))
            .collect();
        let lines = separated(&align_associations(&pairs), ",", false, Language::Vhdl);
        for ((name, _), line) in ports.iter().zip(&lines) {
            let object = LinkObject::Port {
                instance: id,
                port: name.clone(),
            };
            w.linked(LinkKind::PortConnection, &object, 0, line);
        }
        w.dedent();
        w.linked(LinkKind::PortConnection, &element, 1, ");");
    }
    w.dedent();
}

fn emit_verilog(
    w: &mut SourceWriter,
    id: ElementId,
    symbol: &SymbolDefinition,
    ports: &[(String, String)],
    generics: &[translate::GenericMapping],
) {
    let element = LinkObject::Element { id };
    let entity = &symbol.entity_name;
    let name = label(symbol);
    let port_open = if ports.is_empty() { "();" } else { "(" };

    if generics.is_empty() {
        w.linked(
            LinkKind::InstanceName,
            &element,
            0,
            &format!("{entity} {name} {port_open}"),
        );
    } else {
        w.linked(LinkKind::InstanceName, &element, 0, &format!("{entity} #("));
        w.indent();
        let rows: Vec<Row> = generics
            .iter()
            .map(|g| Row {
                code: g.association(Language::Verilog),
                comment: g.comment.clone(),
            })
            .collect();
        for (i, line) in separated(&rows, ",", false, Language::Verilog).iter().enumerate() {
            w.linked(LinkKind::GenericMapping, &element, i as u32, line);
        }
        w.dedent();
        w.linked(
            LinkKind::InstanceName,
            &element,
            1,
            &format!(") {name} {port_open}"),
        );
    }

    if !ports.is_empty() {
        w.indent();
        let width = ports.iter().map(|(n, _)| n.len()).max().unwrap_or(0);
        let rows: Vec<Row> = ports
            .iter()
            .map(|(port, actual)| Row {
                code: format!(".{port:<width$} ({actual})"),
                comment: None,
            })
            .collect();
        let lines = separated(&rows, ",", false, Language::Verilog);
        for ((port, _), line) in ports.iter().zip(&lines) {
            let object = LinkObject::Port {
                instance: id,
                port: port.clone(),
            };
            w.linked(LinkKind::PortConnection, &object, 0, line);
        }
        w.dedent();
        w.linked(LinkKind::PortConnection, &element, 0, ");");
    }
}

/// Writes a VHDL component declaration for `symbol`'s entity, translating
/// Verilog ports and parameters.
pub fn emit_component(w: &mut SourceWriter, symbol: &SymbolDefinition) {
    let object = LinkObject::Component {
        entity: symbol.entity_name.clone(),
    };
    let kind = LinkKind::ComponentDeclaration;
    let mut sub_line = 0;
    w.linked(kind, &object, sub_line, &format!("component {} is", symbol.entity_name));
    sub_line += 1;
    w.indent();

    let generics: Vec<_> =
        translate::generic_definitions(&symbol.generic_definition, symbol.language, Language::Vhdl)
            .iter()
            .map(|g| parse(g, Language::Vhdl))
            .collect();
    let row_link = |_: &schem_decl::SignalDeclaration, sub: u32| (kind, object.clone(), sub);
    if !generics.is_empty() {
        sub_line = emit_vhdl_group(w, "generic (", &generics, (kind, &object, sub_line), row_link);
    }
    let ports: Vec<_> = symbol
        .port_list
        .iter()
        .filter(|p| !p.trim().is_empty())
        .map(|p| parse(&translate::port(p, symbol.language, Language::Vhdl), Language::Vhdl))
        .collect();
    if !ports.is_empty() {
        sub_line = emit_vhdl_group(w, "port (", &ports, (kind, &object, sub_line), row_link);
    }
    w.dedent();
    w.linked(kind, &object, sub_line, "end component;");
}

#[cfg(test)]
mod tests {
    use super::*;
    use schem_model::Configuration;

    fn symbol(language: Language, config_statement: ConfigStatement) -> SymbolDefinition {
        let (ports, generic_block, generic_definition) = if language.is_verilog() {
            (
                vec!["input clk".to_string(), "output wire [7:0] q".to_string()],
                ".WIDTH(8)".to_string(),
                "parameter WIDTH = 4".to_string(),
            )
        } else {
            (
                vec![
                    "clk : in std_logic".to_string(),
                    "q : out std_logic_vector(7 downto 0)".to_string(),
                ],
                "g_width => 8".to_string(),
                "g_width : natural := 4".to_string(),
            )
        };
        SymbolDefinition {
            language,
            configuration: Configuration {
                library: "work".to_string(),
                config_statement,
            },
            port_list: ports,
            generic_block,
            generic_definition,
            instance_name: "u_reg -- 2".to_string(),
            entity_name: "reg8".to_string(),
            architecture_name: "rtl".to_string(),
            ..Default::default()
        }
    }

    fn connection(port: &str, signal: &str) -> InstanceConnectionDefinition {
        InstanceConnectionDefinition {
            instance_name: "u_reg".to_string(),
            entity_name: "reg8".to_string(),
            port_declaration: port.to_string(),
            connected_signal_declaration: signal.to_string(),
            instance: ElementId::from_raw(3),
        }
    }

    #[test]
    fn vhdl_component_instance() {
        let s = symbol(Language::Vhdl, ConfigStatement::None);
        let conns = [connection("clk : in std_logic", "sys_clk : std_logic")];
        let mut w = SourceWriter::new("top.vhd");
        emit(&mut w, ElementId::from_raw(3), &s, Language::Vhdl, &conns);
        let (text, links) = w.finish();
        assert_eq!(
            text,
            "u_reg: reg8\n\
            \x20   generic map (\n\
            \x20       g_width => 8\n\
            \x20   )\n\
            \x20   port map (\n\
            \x20       clk => sys_clk,\n\
            \x20       q   => open\n\
            \x20   );\n"
        );
        assert_eq!(links[0].kind, LinkKind::InstanceName);
        let port_line = links.iter().find(|l| l.line == 7).unwrap();
        assert_eq!(
            port_line.object,
            LinkObject::Port {
                instance: ElementId::from_raw(3),
                port: "q".to_string()
            }
        );
    }

    #[test]
    fn comments_are_dropped_from_labels() {
        assert_eq!(bare_name("u_fifo -- 2"), "u_fifo");
        assert_eq!(bare_name("u_x -- spare"), "u_x");
        assert_eq!(bare_name("u_y // keep -- 3"), "u_y");
        assert_eq!(bare_name(" u_z "), "u_z");

        let mut s = symbol(Language::Vhdl, ConfigStatement::Embedded);
        s.instance_name = "u_reg -- spare".to_string();
        assert_eq!(configuration_spec(&s), "for u_reg : reg8 use entity work.reg8(rtl);");
        let mut w = SourceWriter::new("top.vhd");
        emit(&mut w, ElementId::from_raw(3), &s, Language::Vhdl, &[]);
        let (text, _) = w.finish();
        assert!(text.starts_with("u_reg: reg8\n"));
    }

    #[test]
    fn vhdl_entity_instance_of_verilog_symbol() {
        let s = symbol(Language::Verilog, ConfigStatement::AtInstance);
        let conns = [connection(
            "output wire [7:0] q",
            "data(7 downto 0) : std_logic_vector(15 downto 0)",
        )];
        let mut w = SourceWriter::new("top.vhd");
        emit(&mut w, ElementId::from_raw(3), &s, Language::Vhdl, &conns);
        let (text, _) = w.finish();
        assert!(text.starts_with("u_reg: entity work.reg8(rtl)\n"));
        assert!(text.contains("        WIDTH => 8\n"));
        assert!(text.contains("        clk => open,\n"));
        assert!(text.contains("        q   => data(7 downto 0)\n"));
    }

    #[test]
    fn verilog_instance() {
        let s = symbol(Language::Vhdl, ConfigStatement::None);
        let conns = [connection("q : out std_logic_vector(7 downto 0)", "wire [7:0] bus:[3:0]")];
        let mut w = SourceWriter::new("top.v");
        emit(&mut w, ElementId::from_raw(3), &s, Language::Verilog, &conns);
        let (text, _) = w.finish();
        assert_eq!(
            text,
            "reg8 #(\n\
            \x20   .g_width(8)\n\
            ) u_reg (\n\
            \x20   .clk (),\n\
            \x20   .q   (bus[3:0])\n\
            );\n"
        );
    }

    #[test]
    fn component_translated_from_verilog() {
        let s = symbol(Language::Verilog, ConfigStatement::Embedded);
        let mut w = SourceWriter::new("top.vhd");
        emit_component(&mut w, &s);
        let (text, links) = w.finish();
        assert_eq!(
            text,
            "component reg8 is\n\
            \x20   generic (\n\
            \x20       WIDTH : integer := 4\n\
            \x20   );\n\
            \x20   port (\n\
            \x20       clk : in std_logic;\n\
            \x20       q   : out std_logic_vector(7 downto 0)\n\
            \x20   );\n\
             end component;\n"
        );
        let subs: Vec<u32> = links.iter().map(|l| l.sub_line).collect();
        assert_eq!(subs, (0..9).collect::<Vec<u32>>());
        assert!(links.iter().all(|l| l.kind == LinkKind::ComponentDeclaration));
        assert_eq!(
            configuration_spec(&s),
            "for u_reg : reg8 use entity work.reg8(rtl);"
        );
    }
}
