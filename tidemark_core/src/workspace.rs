use std::io::ErrorKind;
use std::sync::Mutex;

use tidemark_check_api::{Workspace, WorkspaceError, WorkspaceResult};

use crate::Repository;

/// Workspace reading files from a repository's working tree.
#[derive(Debug)]
pub struct GitWorkspace {
    repository: Mutex<Repository>,
}

impl GitWorkspace {
    /// Wrap an opened repository.
    #[must_use]
    pub const fn new(repository: Repository) -> Self {
        Self {
            repository: Mutex::new(repository),
        }
    }
}

impl Workspace for GitWorkspace {
    fn read_file(&self, path: &str) -> WorkspaceResult<Option<String>> {
        let full_path = {
            let repository = self.repository.lock().map_err(|_| WorkspaceError::Read {
                path: path.to_owned(),
                source: std::io::Error::new(ErrorKind::Other, "repository lock poisoned"),
            })?;
            repository.root().join(path)
        };

        match std::fs::read_to_string(&full_path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(WorkspaceError::Read {
                path: path.to_owned(),
                source,
            }),
        }
    }

    fn is_ignored(&self, path: &str) -> WorkspaceResult<bool> {
        let repository = self
            .repository
            .lock()
            .map_err(|_| WorkspaceError::IgnoreLookup {
                path: path.to_owned(),
                message: "repository lock poisoned".into(),
            })?;

        repository
            .is_ignored(path)
            .map_err(|err| WorkspaceError::IgnoreLookup {
                path: path.to_owned(),
                message: err.to_string(),
            })
    }
}
