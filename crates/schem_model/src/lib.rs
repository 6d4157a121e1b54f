//! The connectivity snapshot consumed by the HDL generator.
//!
//! The schematic editor hands over a [`ConnectionSnapshot`]: connectors, pins,
//! wires, free-text sections, and the schematic elements (blocks, instances,
//! generate frames). Elements are stored as tagged-union values in an
//! id-indexed [`Arena`]; an [`ElementId`] is the element's stable canvas key.

#![warn(missing_docs)]

pub mod arena;
pub mod element;
pub mod ids;
pub mod snapshot;
pub mod symbol;

pub use arena::{Arena, ArenaId};
pub use element::{Element, ElementKind, SchematicElement};
pub use ids::ElementId;
pub use snapshot::{
    ConnectionSnapshot, Connector, EditKind, FreeText, OpenEdit, Pin, SnapshotError, WireSegment,
};
pub use symbol::{ConfigStatement, Configuration, SymbolDefinition};
