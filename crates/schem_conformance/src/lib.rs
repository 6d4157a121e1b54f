//! Conformance test helpers for the schemgen generator.
//!
//! Provides a snapshot builder that lays nets out on a simple grid so tests
//! can describe a schematic by its ports, signals and elements, plus
//! functions that run generation and check the produced link entries
//! against the produced text.

#![warn(missing_docs)]

use std::path::Path;

use schem_codegen::{GenerateError, GenerateRequest, Generated};
use schem_common::{Direction, Language, Point, Rect};
use schem_config::LintConfig;
use schem_model::{
    ConnectionSnapshot, Connector, Element, ElementId, Pin, SymbolDefinition, WireSegment,
};

/// Horizontal distance between two nets.
const NET_PITCH: f64 = 100.0;
/// Row of the interface connectors.
const CONNECTOR_Y: f64 = 0.0;
/// Row of the instance pins.
const PIN_Y: f64 = 50.0;
/// Row where free wire ends are drawn.
const FREE_Y: f64 = 1000.0;

/// Builds connection snapshots net by net.
#[derive(Default)]
pub struct SnapshotBuilder {
    snapshot: ConnectionSnapshot,
    nets: u32,
}

impl SnapshotBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    fn next_x(&mut self) -> f64 {
        self.nets += 1;
        f64::from(self.nets) * NET_PITCH
    }

    fn wire(&mut self, declaration: &str, x: f64, from: f64, to: f64) {
        self.snapshot.wires.push(WireSegment {
            declaration: declaration.to_string(),
            start: Point::new(x, from),
            end: Point::new(x, to),
        });
    }

    fn connector(&mut self, direction: Direction, x: f64) {
        self.snapshot.connectors.push(Connector {
            direction,
            position: Point::new(x, CONNECTOR_Y),
        });
    }

    fn pin(&mut self, instance: ElementId, port_declaration: &str, x: f64) {
        let symbol = self
            .snapshot
            .elements
            .try_get(instance)
            .and_then(Element::symbol)
            .cloned()
            .unwrap_or_default();
        self.snapshot.pins.push(Pin {
            entity_name: symbol.entity_name,
            instance_name: symbol.instance_name,
            architecture_name: symbol.architecture_name,
            instance,
            position: Point::new(x, PIN_Y),
            port_declaration: port_declaration.to_string(),
        });
    }

    /// Adds an interface port: a connector and a wire touching it.
    pub fn port(&mut self, direction: Direction, declaration: &str) -> &mut Self {
        let x = self.next_x();
        self.connector(direction, x);
        self.wire(declaration, x, CONNECTOR_Y, FREE_Y);
        self
    }

    /// Adds an internal signal: a wire touching nothing.
    pub fn signal(&mut self, declaration: &str) -> &mut Self {
        let x = self.next_x();
        self.wire(declaration, x, FREE_Y, FREE_Y + 40.0);
        self
    }

    /// Adds a block element.
    pub fn block(&mut self, rect: Rect, text: &str) -> ElementId {
        self.snapshot.elements.alloc(Element::block(rect, text))
    }

    /// Adds an instance element.
    pub fn instance(&mut self, rect: Rect, symbol: SymbolDefinition) -> ElementId {
        self.snapshot.elements.alloc(Element::instance(rect, symbol))
    }

    /// Adds a generate frame element.
    pub fn frame(&mut self, rect: Rect, condition: &str) -> ElementId {
        self.snapshot
            .elements
            .alloc(Element::generate_frame(rect, condition))
    }

    /// Connects an instance port to a new internal signal.
    pub fn connect(&mut self, instance: ElementId, port: &str, signal: &str) -> &mut Self {
        let x = self.next_x();
        self.pin(instance, port, x);
        self.wire(signal, x, PIN_Y, FREE_Y);
        self
    }

    /// Connects an instance port straight to a new interface port.
    pub fn connect_port(
        &mut self,
        instance: ElementId,
        port: &str,
        direction: Direction,
        declaration: &str,
    ) -> &mut Self {
        let x = self.next_x();
        self.connector(direction, x);
        self.pin(instance, port, x);
        self.wire(declaration, x, CONNECTOR_Y, PIN_Y);
        self
    }

    /// Sets a free-text section through a closure.
    pub fn texts(&mut self, f: impl FnOnce(&mut schem_model::FreeText)) -> &mut Self {
        f(&mut self.snapshot.texts);
        self
    }

    /// Returns the snapshot built so far.
    pub fn build(&self) -> ConnectionSnapshot {
        self.snapshot.clone()
    }
}

/// A VHDL symbol with the given ports.
pub fn vhdl_symbol(instance_name: &str, entity: &str, ports: &[&str]) -> SymbolDefinition {
    SymbolDefinition {
        language: Language::Vhdl,
        port_list: ports.iter().map(|p| p.to_string()).collect(),
        instance_name: instance_name.to_string(),
        entity_name: entity.to_string(),
        architecture_name: "rtl".to_string(),
        ..Default::default()
    }
}

/// A Verilog symbol with the given ports.
pub fn verilog_symbol(instance_name: &str, entity: &str, ports: &[&str]) -> SymbolDefinition {
    SymbolDefinition {
        language: Language::Verilog,
        ..vhdl_symbol(instance_name, entity, ports)
    }
}

/// A request writing into `dir` with a fixed timestamp.
pub fn request(dir: &Path, module: &str, language: Language) -> GenerateRequest {
    GenerateRequest {
        module_name: module.to_string(),
        language,
        architecture: "struct".to_string(),
        output_path: dir.to_path_buf(),
        single_file: true,
        grid_size: 20.0,
        timestamp: "2026-10-18 12:00:00".to_string(),
        lint: LintConfig::default(),
    }
}

/// Runs generation for a single-file design.
pub fn generate_in(
    dir: &Path,
    module: &str,
    language: Language,
    snapshot: &ConnectionSnapshot,
) -> Result<Generated, GenerateError> {
    schem_codegen::generate(&request(dir, module, language), snapshot)
}

/// The text after the two header lines of a generated file.
pub fn body(text: &str) -> String {
    text.lines()
        .skip(2)
        .map(|l| format!("{l}\n"))
        .collect()
}

/// The 1-based line of the first line of `text` equal to `line`.
pub fn line_of(text: &str, line: &str) -> Option<u32> {
    text.lines()
        .position(|l| l == line)
        .map(|i| i as u32 + 1)
}

/// Describes every link entry that points outside its file or at a blank line.
pub fn link_problems(generated: &Generated) -> Vec<String> {
    let mut problems = Vec::new();
    for entry in &generated.links {
        let Some(file) = generated.file(&entry.file) else {
            problems.push(format!("{} names an unknown file", entry.file));
            continue;
        };
        match file.text.lines().nth(entry.line as usize - 1) {
            Some(line) if !line.trim().is_empty() => {}
            Some(_) => problems.push(format!("{}:{} is blank", entry.file, entry.line)),
            None => problems.push(format!(
                "{}:{} is past the end of the file",
                entry.file, entry.line
            )),
        }
    }
    problems
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_lays_out_nets() {
        let mut b = SnapshotBuilder::new();
        b.port(Direction::Input, "a : std_logic").signal("s : std_logic");
        let id = b.instance(Rect::default(), vhdl_symbol("u1", "sub", &["d : in std_logic"]));
        b.connect(id, "d : in std_logic", "n : std_logic");
        let snap = b.build();
        assert_eq!(snap.connectors.len(), 1);
        assert_eq!(snap.wires.len(), 3);
        assert_eq!(snap.pins[0].instance_name, "u1");
        assert_eq!(snap.pins[0].position, snap.wires[2].start);
    }

    #[test]
    fn line_helpers() {
        assert_eq!(line_of("a\nb\nc\n", "b"), Some(2));
        assert_eq!(line_of("a\n", "z"), None);
        assert_eq!(body("-- x\n-- y\nz\n"), "z\n");
    }
}
