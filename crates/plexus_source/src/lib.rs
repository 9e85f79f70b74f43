//! Source text management and span tracking for diagnostics.
//!
//! Every node the parser hands to the elaborator carries a [`Span`]; this
//! crate owns the text those spans point into. The [`SourceDb`] registers
//! in-memory sources (the engine itself never touches the filesystem) and
//! resolves byte offsets to the 1-indexed line/column coordinates shown in
//! rendered diagnostics.

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
