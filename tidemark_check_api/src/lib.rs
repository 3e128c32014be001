//! Interfaces shared by the Tidemark engine and its consistency checks.
//!
//! A run hands every check the same [`CheckContext`]: the changeset's patches,
//! a [`Workspace`] for reading the schema and structure files at their head
//! revision, and the memoized classification built from both.

#![warn(clippy::all, clippy::pedantic, missing_docs)]
#![cfg_attr(
    not(test),
    deny(
        clippy::dbg_macro,
        clippy::panic,
        clippy::print_stderr,
        clippy::print_stdout,
        clippy::todo,
        clippy::unwrap_used
    )
)]

mod classify;
mod context;
mod registry;
mod sink;
mod types;
pub mod version;
mod workspace;

pub use classify::{is_annotation_only, is_migration_path, is_migration_related, Classification};
pub use context::{CheckContext, MigrationEntry, SchemaSnapshot, StructureSnapshot};
pub use registry::CheckRegistry;
pub use sink::{Anchor, MessageSink};
pub use types::{CheckSettings, CheckSummary, Layout, DEFAULT_LARGE_DIFF_THRESHOLD};
pub use version::StructureMarker;
pub use workspace::{InMemoryWorkspace, Workspace, WorkspaceError, WorkspaceResult};

/// A single consistency rule evaluated against a changeset.
pub trait Check: Send + Sync {
    /// Stable identifier used for lookup, logging and message attribution.
    fn id(&self) -> &'static str;

    /// Human-friendly label for UI surfaces.
    fn label(&self) -> &'static str;

    /// Evaluate the rule and push any findings into `sink`.
    ///
    /// Checks never fail: missing inputs turn the rule into a no-op and
    /// recoverable problems are reported as messages.
    fn run(&self, ctx: &CheckContext<'_>, sink: &mut MessageSink);
}
