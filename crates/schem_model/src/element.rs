//! Schematic elements: blocks, instances, and generate frames.

use crate::symbol::SymbolDefinition;
use schem_common::Rect;
use serde::{Deserialize, Serialize};

/// The content of a schematic element.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SchematicElement {
    /// Free HDL text placed on the canvas.
    Block {
        /// The HDL text, possibly led by a priority comment line.
        text: String,
    },
    /// An instance of another entity/module.
    Instance {
        /// The instantiated symbol.
        symbol: SymbolDefinition,
    },
    /// A region representing a conditional or iterative generate construct.
    GenerateFrame {
        /// The generate condition, e.g. `gen: if g_enable generate -- 5`.
        condition: String,
    },
}

/// Discriminant of [`SchematicElement`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ElementKind {
    /// [`SchematicElement::Block`].
    Block,
    /// [`SchematicElement::Instance`].
    Instance,
    /// [`SchematicElement::GenerateFrame`].
    GenerateFrame,
}

/// A schematic element with its bounding rectangle on the canvas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Bounding rectangle; for generate frames this is the frame itself.
    pub rect: Rect,
    /// The element content.
    #[serde(flatten)]
    pub content: SchematicElement,
}

impl Element {
    /// Creates a block element.
    pub fn block(rect: Rect, text: impl Into<String>) -> Self {
        Self {
            rect,
            content: SchematicElement::Block { text: text.into() },
        }
    }

    /// Creates an instance element.
    pub fn instance(rect: Rect, symbol: SymbolDefinition) -> Self {
        Self {
            rect,
            content: SchematicElement::Instance { symbol },
        }
    }

    /// Creates a generate-frame element.
    pub fn generate_frame(rect: Rect, condition: impl Into<String>) -> Self {
        Self {
            rect,
            content: SchematicElement::GenerateFrame {
                condition: condition.into(),
            },
        }
    }

    /// Returns the element's kind.
    pub fn kind(&self) -> ElementKind {
        match self.content {
            SchematicElement::Block { .. } => ElementKind::Block,
            SchematicElement::Instance { .. } => ElementKind::Instance,
            SchematicElement::GenerateFrame { .. } => ElementKind::GenerateFrame,
        }
    }

    /// Returns the symbol if this element is an instance.
    pub fn symbol(&self) -> Option<&SymbolDefinition> {
        match &self.content {
            SchematicElement::Instance { symbol } => Some(symbol),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tagged_json_shape() {
        let json = r#"{"type": "generate_frame", "condition": "g: if c generate",
                       "rect": {"a": {"x": 0, "y": 0}, "b": {"x": 50, "y": 50}}}"#;
        let element: Element = serde_json::from_str(json).unwrap();
        assert_eq!(element.kind(), ElementKind::GenerateFrame);
        assert_eq!(element.rect.right(), 50.0);
    }

    #[test]
    fn symbol_accessor() {
        let symbol = SymbolDefinition {
            instance_name: "u1".to_string(),
            entity_name: "sub".to_string(),
            ..Default::default()
        };
        let inst = Element::instance(Rect::default(), symbol);
        assert_eq!(inst.symbol().map(|s| s.entity_name.as_str()), Some("sub"));
        assert!(Element::block(Rect::default(), "x <= y;").symbol().is_none());
    }
}
