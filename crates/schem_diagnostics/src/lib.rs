//! Advisory findings with severity, codes and labels, plus terminal rendering.
//!
//! Generation never fails on advisories: ordering fallbacks, empty generate
//! frames and sensitivity-list findings are collected as [`Diagnostic`]s in a
//! [`DiagnosticSink`] and handed back alongside the generated text.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod label;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use label::{Label, LabelStyle};
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
