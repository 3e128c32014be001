//! Shared Tidemark data models consumed by the engine and the check crates.
//!
//! The structures in this crate are designed to be:
//! - serializable via `serde` for persistence and transport
//! - read-only to checks once a run has started

/// Diff-related data types describing a changeset.
pub mod patch;
/// Diagnostics produced by checks.
pub mod message;

pub use message::{Message, MessageLine, Severity};
pub use patch::{FileStatus, LineKind, Patch, PatchHunk, PatchLine, PatchStats, NULL_OID};
