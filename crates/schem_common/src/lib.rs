//! Shared foundational types used across the schemgen workspace.
//!
//! This crate provides the HDL [`Language`] selector, port [`Direction`]s,
//! schematic geometry ([`Point`], [`Rect`]) and the common internal result type.

#![warn(missing_docs)]

pub mod direction;
pub mod geometry;
pub mod language;
pub mod result;

pub use direction::Direction;
pub use geometry::{Point, Rect};
pub use language::{Language, ParseLanguageError};
pub use result::{InternalError, SchemResult};
