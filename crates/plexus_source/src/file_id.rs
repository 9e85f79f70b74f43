//! Opaque identifier for source files registered with the session.

use serde::{Deserialize, Serialize};

/// Opaque identifier for a source registered with the [`SourceDb`](crate::SourceDb).
///
/// Each source gets a unique `FileId` on registration; [`Span`](crate::Span)
/// values pair a `FileId` with a byte range to locate a node.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct FileId(u32);

impl FileId {
    /// A dummy file ID for synthetic spans (engine-generated constructs
    /// such as unrolled loop bodies or synthesized assignments).
    pub const DUMMY: FileId = FileId(u32::MAX);

    /// Creates a `FileId` from a raw `u32` value.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw `u32` value of this `FileId`.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}
