//! Core library for Tidemark's migration consistency review.
//!
//! The crate is layered around three primary responsibilities:
//! - repository access and changeset extraction
//! - configuration of the check run
//! - orchestration of the consistency checks over a changeset

#![warn(
    clippy::all,
    clippy::cargo,
    clippy::nursery,
    clippy::pedantic,
    missing_docs
)]
#![cfg_attr(
    not(test),
    deny(
        clippy::dbg_macro,
        clippy::expect_used,
        clippy::panic,
        clippy::print_stderr,
        clippy::print_stdout,
        clippy::todo,
        clippy::unwrap_used
    )
)]

/// Configuration file loading.
pub mod config;
/// Check orchestration over a changeset.
pub mod engine;
/// Git repository access and changeset extraction.
pub mod repository;
/// Working-tree access for checks.
pub mod workspace;

pub use config::Config;
pub use engine::Engine;
pub use repository::Repository;
pub use tidemark_api::{
    FileStatus, LineKind, Message, MessageLine, Patch, PatchHunk, PatchLine, PatchStats, Severity,
};
pub use tidemark_check_api::{CheckSettings, InMemoryWorkspace, Layout, Workspace};
pub use workspace::GitWorkspace;

/// Common result type for the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the core library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Underlying git operation failed.
    #[error("git error: {source}")]
    Git {
        /// Original libgit2 error bubbled up by the core library.
        #[from]
        source: git2::Error,
    },
    /// Provided path does not correspond to a git repository.
    #[error("path does not reference a git repository: {path}")]
    NotARepository {
        /// Path that failed to resolve to a repository.
        path: String,
    },
    /// Bare repositories are currently unsupported.
    #[error("repository at {path} is bare and unsupported")]
    BareRepository {
        /// Path of the repository lacking a working tree.
        path: String,
    },
    /// Repository has no head revision to diff.
    #[error("repository has no head revision to diff")]
    MissingHeadRevision,
    /// The base revision could not be resolved.
    #[error("cannot resolve revision {revision}: {source}")]
    UnknownRevision {
        /// Revision expression as given by the caller.
        revision: String,
        /// Original libgit2 error.
        #[source]
        source: git2::Error,
    },
    /// Filesystem interaction failed.
    #[error("failed to access {path}: {source}")]
    Io {
        /// Filesystem path involved in the failed operation.
        path: String,
        /// Source I/O error returned by the standard library.
        #[source]
        source: std::io::Error,
    },
    /// Configuration file is not valid TOML for [`Config`].
    #[error("invalid configuration in {path}: {source}")]
    Config {
        /// Path of the configuration file.
        path: String,
        /// Parse error reported by `toml`.
        #[source]
        source: toml::de::Error,
    },
}
