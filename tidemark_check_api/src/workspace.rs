use std::collections::{BTreeMap, BTreeSet};

/// Errors surfaced by a [`Workspace`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    /// The file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Repository-relative path of the file.
        path: String,
        /// Source I/O error returned by the standard library.
        #[source]
        source: std::io::Error,
    },
    /// The ignore-rule lookup could not be performed.
    #[error("ignore lookup for {path} unavailable: {message}")]
    IgnoreLookup {
        /// Repository-relative path that was queried.
        path: String,
        /// Human-readable reason.
        message: String,
    },
}

/// Convenience result alias for workspace operations.
pub type WorkspaceResult<T> = std::result::Result<T, WorkspaceError>;

/// Read access to the working tree at the reviewed revision.
pub trait Workspace: Send + Sync {
    /// Contents of a repository-relative file, or `None` when it does not exist.
    ///
    /// # Errors
    ///
    /// Implementors should surface read failures other than a missing file.
    fn read_file(&self, path: &str) -> WorkspaceResult<Option<String>>;

    /// Whether the repository's ignore rules exclude `path`.
    ///
    /// # Errors
    ///
    /// Implementors should surface failures of the underlying lookup.
    fn is_ignored(&self, path: &str) -> WorkspaceResult<bool>;
}

/// Workspace backed by in-memory file contents.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkspace {
    files: BTreeMap<String, String>,
    ignored: BTreeSet<String>,
}

impl InMemoryWorkspace {
    /// Create an empty workspace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<String>, contents: impl Into<String>) -> Self {
        self.files.insert(path.into(), contents.into());
        self
    }

    /// Mark a path as excluded by ignore rules.
    #[must_use]
    pub fn with_ignored(mut self, path: impl Into<String>) -> Self {
        self.ignored.insert(path.into());
        self
    }
}

impl Workspace for InMemoryWorkspace {
    fn read_file(&self, path: &str) -> WorkspaceResult<Option<String>> {
        Ok(self.files.get(path).cloned())
    }

    fn is_ignored(&self, path: &str) -> WorkspaceResult<bool> {
        Ok(self.ignored.contains(path))
    }
}
