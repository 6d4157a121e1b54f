//! Classification of wires into ports, internal signals and pin connections.

use log::trace;
use schem_common::{Direction, Language, Point};
use schem_decl::{insert_direction, parse};
use schem_model::{Connector, ElementId, Pin, WireSegment};
use std::collections::HashSet;

/// A wire attached to a pin of an instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstanceConnectionDefinition {
    /// Instance label carried by the pin.
    pub instance_name: String,
    /// Entity/module of the instance.
    pub entity_name: String,
    /// The port declaration of the pin, in the symbol's language.
    pub port_declaration: String,
    /// The raw declaration of the connected wire.
    pub connected_signal_declaration: String,
    /// The instance element.
    pub instance: ElementId,
}

/// Port, signal and instance-connection declarations derived from the wires.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Connectivity {
    /// Input port declarations.
    pub inputs: Vec<String>,
    /// Output port declarations.
    pub outputs: Vec<String>,
    /// Bidirectional port declarations.
    pub inouts: Vec<String>,
    /// Internal signal declarations, one per signal name.
    pub signals: Vec<String>,
    /// Wires attached to instance pins.
    pub connections: Vec<InstanceConnectionDefinition>,
}

impl Connectivity {
    /// Names of the signals a process can read: inputs, inouts and internals.
    pub fn readable_names(&self, language: Language) -> Vec<String> {
        self.inputs
            .iter()
            .chain(&self.inouts)
            .chain(&self.signals)
            .map(|d| parse(d, language).name)
            .collect()
    }

    /// Connections of the given instance element.
    pub fn connections_of(
        &self,
        instance: ElementId,
    ) -> impl Iterator<Item = &InstanceConnectionDefinition> {
        self.connections.iter().filter(move |c| c.instance == instance)
    }
}

/// Matches every wire endpoint against connectors and pins.
///
/// An endpoint touches a terminal when both coordinate deltas are below
/// `0.1 * grid_size`.
pub fn extract(
    language: Language,
    grid_size: f64,
    connectors: &[Connector],
    pins: &[Pin],
    wires: &[WireSegment],
) -> Connectivity {
    let tolerance = 0.1 * grid_size;
    let touches = |endpoints: &[Point; 2], position: Point| {
        endpoints.iter().any(|p| p.is_near(position, tolerance))
    };

    let mut result = Connectivity::default();
    let mut port_backed: HashSet<String> = HashSet::new();
    let mut unmatched: Vec<&WireSegment> = Vec::new();

    for wire in wires {
        let endpoints = wire.endpoints();
        let mut is_port = false;
        for connector in connectors {
            if !touches(&endpoints, connector.position) {
                continue;
            }
            let port = insert_direction(&wire.declaration, connector.direction, language);
            trace!(port = port.as_str(); "wire touches connector");
            let bucket = match connector.direction {
                Direction::Input => &mut result.inputs,
                Direction::Output => &mut result.outputs,
                Direction::Inout => &mut result.inouts,
            };
            if !bucket.contains(&port) {
                bucket.push(port);
            }
            port_backed.insert(parse(&wire.declaration, language).name);
            is_port = true;
        }
        for pin in pins {
            if touches(&endpoints, pin.position) {
                result.connections.push(InstanceConnectionDefinition {
                    instance_name: pin.instance_name.clone(),
                    entity_name: pin.entity_name.clone(),
                    port_declaration: pin.port_declaration.clone(),
                    connected_signal_declaration: wire.declaration.clone(),
                    instance: pin.instance,
                });
            }
        }
        if !is_port {
            unmatched.push(wire);
        }
    }

    let mut seen: HashSet<String> = HashSet::new();
    for wire in unmatched {
        let decl = parse(&wire.declaration, language);
        if decl.name.is_empty() || port_backed.contains(&decl.name) {
            continue;
        }
        if seen.insert(decl.name.clone()) {
            result.signals.push(wire.declaration.trim().to_string());
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRID: f64 = 20.0;

    fn wire(declaration: &str, start: (f64, f64), end: (f64, f64)) -> WireSegment {
        WireSegment {
            declaration: declaration.to_string(),
            start: Point::new(start.0, start.1),
            end: Point::new(end.0, end.1),
        }
    }

    fn connector(direction: Direction, x: f64, y: f64) -> Connector {
        Connector {
            direction,
            position: Point::new(x, y),
        }
    }

    fn pin(x: f64, y: f64, port: &str) -> Pin {
        Pin {
            entity_name: "sub".to_string(),
            instance_name: "u_sub".to_string(),
            architecture_name: "rtl".to_string(),
            instance: ElementId::from_raw(4),
            position: Point::new(x, y),
            port_declaration: port.to_string(),
        }
    }

    #[test]
    fn connectors_classify_by_direction() {
        let connectors = [
            connector(Direction::Input, 0.0, 0.0),
            connector(Direction::Output, 200.0, 0.0),
            connector(Direction::Inout, 200.0, 100.0),
        ];
        let wires = [
            wire("clk_i : std_logic", (0.0, 0.0), (60.0, 0.0)),
            wire("q_o : std_logic_vector(3 downto 0)", (140.0, 0.0), (200.0, 0.0)),
            wire("io : std_logic", (140.0, 100.0), (201.9, 101.9)),
        ];
        let c = extract(Language::Vhdl, GRID, &connectors, &[], &wires);
        assert_eq!(c.inputs, vec!["clk_i : in std_logic"]);
        assert_eq!(c.outputs, vec!["q_o : out std_logic_vector(3 downto 0)"]);
        assert_eq!(c.inouts, vec!["io : inout std_logic"]);
        assert!(c.signals.is_empty());
    }

    #[test]
    fn tolerance_is_strict() {
        let connectors = [connector(Direction::Input, 0.0, 0.0)];
        let wires = [wire("a : std_logic", (2.0, 0.0), (60.0, 0.0))];
        let c = extract(Language::Vhdl, GRID, &connectors, &[], &wires);
        assert!(c.inputs.is_empty());
        assert_eq!(c.signals, vec!["a : std_logic"]);
    }

    #[test]
    fn pins_do_not_consume_wires() {
        let pins = [pin(100.0, 40.0, "d : in std_logic")];
        let wires = [wire("s_d : std_logic -- data", (0.0, 40.0), (100.0, 40.0))];
        let c = extract(Language::Vhdl, GRID, &[], &pins, &wires);
        assert_eq!(c.signals, vec!["s_d : std_logic -- data"]);
        assert_eq!(c.connections.len(), 1);
        let conn = &c.connections[0];
        assert_eq!(conn.instance, ElementId::from_raw(4));
        assert_eq!(conn.port_declaration, "d : in std_logic");
        assert_eq!(conn.connected_signal_declaration, "s_d : std_logic -- data");
        assert_eq!(c.connections_of(ElementId::from_raw(4)).count(), 1);
    }

    #[test]
    fn port_backed_segments_are_not_signals() {
        let connectors = [connector(Direction::Output, 0.0, 0.0)];
        let wires = [
            wire("y : std_logic", (0.0, 0.0), (40.0, 0.0)),
            wire("y : std_logic", (40.0, 0.0), (40.0, 80.0)),
            wire("n : std_logic", (40.0, 80.0), (90.0, 80.0)),
            wire("n : std_logic", (90.0, 80.0), (90.0, 120.0)),
        ];
        let c = extract(Language::Vhdl, GRID, &connectors, &[], &wires);
        assert_eq!(c.outputs, vec!["y : out std_logic"]);
        assert_eq!(c.signals, vec!["n : std_logic"]);
    }

    #[test]
    fn verilog_ports_and_readable_names() {
        let connectors = [
            connector(Direction::Input, 0.0, 0.0),
            connector(Direction::Output, 0.0, 100.0),
        ];
        let wires = [
            wire("[7:0] d", (0.0, 0.0), (50.0, 0.0)),
            wire("reg q", (0.0, 100.0), (50.0, 100.0)),
            wire("logic t", (60.0, 60.0), (70.0, 60.0)),
        ];
        let c = extract(Language::SystemVerilog, GRID, &connectors, &[], &wires);
        assert_eq!(c.inputs, vec!["input [7:0] d"]);
        assert_eq!(c.outputs, vec!["output reg q"]);
        assert_eq!(c.readable_names(Language::SystemVerilog), vec!["d", "t"]);
    }
}
