//! Generated-text storage, span tracking, and line resolution for diagnostics.
//!
//! Generated HDL files are registered in a [`SourceDb`] so that lint findings
//! can point at byte ranges ([`Span`]) which are later resolved to
//! line/column coordinates ([`ResolvedSpan`]).

#![warn(missing_docs)]

pub mod file_id;
pub mod resolved_span;
pub mod source_db;
pub mod source_file;
pub mod span;

pub use file_id::FileId;
pub use resolved_span::ResolvedSpan;
pub use source_db::SourceDb;
pub use source_file::SourceFile;
pub use span::Span;
