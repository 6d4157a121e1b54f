//! The connection snapshot handed over by the schematic editor.

use crate::arena::Arena;
use crate::element::{Element, ElementKind};
use crate::ids::ElementId;
use schem_common::{Direction, Point};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An interface terminal of the schematic (entity port).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    /// Port direction.
    pub direction: Direction,
    /// Location of the terminal's hot spot.
    pub position: Point,
}

/// A terminal of an instance, matched against wires like a [`Connector`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    /// Entity/module of the instance.
    pub entity_name: String,
    /// Instance label (without priority comment).
    pub instance_name: String,
    /// Architecture selected for the instance.
    #[serde(default)]
    pub architecture_name: String,
    /// The instance element this pin belongs to.
    pub instance: ElementId,
    /// Location of the pin's hot spot.
    pub position: Point,
    /// The port declaration the pin represents, in the symbol's language.
    pub port_declaration: String,
}

/// A drawn wire carrying a signal declaration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WireSegment {
    /// Raw signal declaration attached to the wire.
    pub declaration: String,
    /// First endpoint.
    pub start: Point,
    /// Second endpoint.
    pub end: Point,
}

impl WireSegment {
    /// Returns both endpoints.
    pub fn endpoints(&self) -> [Point; 2] {
        [self.start, self.end]
    }
}

/// Free-text sections edited outside the canvas.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FreeText {
    /// Library/package imports preceding the entity or module.
    pub interface_packages: String,
    /// Generic/parameter declarations of the entity or module.
    pub interface_generics: String,
    /// Library/package imports local to the architecture.
    pub internals_packages: String,
    /// Declarations placed before the generated signal declarations.
    pub first_declarations: String,
    /// Declarations placed after the generated signal declarations.
    pub last_declarations: String,
}

/// The kind of edit window that may still be open in the editor.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditKind {
    /// An instance-name edit.
    InstanceName,
    /// A signal-name edit on a wire.
    SignalName,
    /// A free-text edit (block or declaration section).
    FreeText,
}

impl fmt::Display for EditKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditKind::InstanceName => write!(f, "instance-name"),
            EditKind::SignalName => write!(f, "signal-name"),
            EditKind::FreeText => write!(f, "free-text"),
        }
    }
}

/// An edit window that has not been closed yet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenEdit {
    /// What is being edited.
    pub kind: EditKind,
    /// What the edit refers to (instance or signal name, section title).
    #[serde(default)]
    pub target: String,
}

/// Inconsistencies between the parts of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    /// A pin refers to an element that does not exist or is not an instance.
    #[error("pin '{port}' of instance '{instance_name}' refers to element {element}, which is not an instance")]
    DanglingPin {
        /// Instance label carried by the pin.
        instance_name: String,
        /// Port declaration carried by the pin.
        port: String,
        /// The referenced element.
        element: ElementId,
    },
}

/// Everything the generator reads from the schematic.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectionSnapshot {
    /// Interface terminals.
    #[serde(default)]
    pub connectors: Vec<Connector>,
    /// Instance terminals.
    #[serde(default)]
    pub pins: Vec<Pin>,
    /// Wires with their declarations.
    #[serde(default)]
    pub wires: Vec<WireSegment>,
    /// Blocks, instances and generate frames, keyed by [`ElementId`].
    #[serde(default)]
    pub elements: Arena<ElementId, Element>,
    /// Free-text sections.
    #[serde(default)]
    pub texts: FreeText,
    /// Edit windows still open in the editor.
    #[serde(default)]
    pub open_edits: Vec<OpenEdit>,
}

impl ConnectionSnapshot {
    /// Checks that every pin refers to an instance element.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        for pin in &self.pins {
            let is_instance = self
                .elements
                .try_get(pin.instance)
                .is_some_and(|e| e.kind() == ElementKind::Instance);
            if !is_instance {
                return Err(SnapshotError::DanglingPin {
                    instance_name: pin.instance_name.clone(),
                    port: pin.port_declaration.clone(),
                    element: pin.instance,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::SymbolDefinition;
    use schem_common::Rect;

    fn pin_to(element: u32) -> Pin {
        Pin {
            entity_name: "sub".to_string(),
            instance_name: "u1".to_string(),
            architecture_name: "rtl".to_string(),
            instance: ElementId::from_raw(element),
            position: Point::new(0.0, 0.0),
            port_declaration: "a : in std_logic".to_string(),
        }
    }

    #[test]
    fn pins_must_reference_instances() {
        let mut snapshot = ConnectionSnapshot::default();
        snapshot.elements.alloc(Element::block(Rect::default(), "x <= y;"));
        snapshot.elements.alloc(Element::instance(
            Rect::default(),
            SymbolDefinition {
                instance_name: "u1".to_string(),
                entity_name: "sub".to_string(),
                ..Default::default()
            },
        ));
        snapshot.pins.push(pin_to(1));
        assert!(snapshot.validate().is_ok());

        snapshot.pins.push(pin_to(0));
        let err = snapshot.validate().unwrap_err();
        assert!(matches!(err, SnapshotError::DanglingPin { .. }));

        snapshot.pins.pop();
        snapshot.pins.push(pin_to(9));
        assert!(snapshot.validate().is_err());
    }

    #[test]
    fn deserialize_minimal_json() {
        let json = r#"{
            "connectors": [{"direction": "input", "position": {"x": 0, "y": 20}}],
            "wires": [{"declaration": "clk_i : std_logic",
                       "start": {"x": 0, "y": 20}, "end": {"x": 60, "y": 20}}],
            "elements": [{"type": "block", "text": "y <= a;",
                          "rect": {"a": {"x": 0, "y": 0}, "b": {"x": 10, "y": 10}}}]
        }"#;
        let snapshot: ConnectionSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.connectors[0].direction, Direction::Input);
        assert_eq!(snapshot.wires[0].endpoints()[1], Point::new(60.0, 20.0));
        assert_eq!(snapshot.elements.len(), 1);
        assert!(snapshot.open_edits.is_empty());
        assert_eq!(snapshot.texts, FreeText::default());
    }
}
