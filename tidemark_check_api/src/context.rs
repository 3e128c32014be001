use std::collections::HashSet;
use std::fmt;

use once_cell::sync::OnceCell;
use tidemark_api::Patch;
use tracing::{debug, warn};

use crate::version::{self, StructureMarker};
use crate::{CheckSettings, Classification, Workspace};

/// A migration version paired with the patch that introduces it.
#[derive(Debug, Clone, Copy)]
pub struct MigrationEntry<'a> {
    /// Version parsed from the migration file name.
    pub version: &'a str,
    /// The migration patch.
    pub patch: &'a Patch,
}

/// The schema snapshot as found in the working tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaSnapshot {
    /// Repository-relative path of the file.
    pub path: String,
    /// Version declared by the file, if it could be parsed.
    pub version: Option<String>,
}

/// The structure dump as found in the working tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureSnapshot {
    /// Repository-relative path of the file.
    pub path: String,
    /// Full file contents.
    pub contents: String,
    /// Marker lines in file order.
    pub markers: Vec<StructureMarker>,
}

impl StructureSnapshot {
    /// Build a snapshot from raw contents.
    #[must_use]
    pub fn new(path: impl Into<String>, contents: String) -> Self {
        let markers = version::structure_markers(&contents);
        Self {
            path: path.into(),
            contents,
            markers,
        }
    }

    /// Whether some marker records `version`.
    #[must_use]
    pub fn records(&self, version: &str) -> bool {
        self.markers
            .iter()
            .any(|marker| marker.version.contains(version))
    }
}

/// Everything a check may look at during one run.
///
/// Derived data is computed on first use and shared by all checks of the run.
pub struct CheckContext<'a> {
    patches: &'a [Patch],
    workspace: &'a dyn Workspace,
    settings: &'a CheckSettings,
    classification: OnceCell<Classification<'a>>,
    migrations: OnceCell<Vec<(String, &'a Patch)>>,
    known_versions: OnceCell<HashSet<String>>,
    schema: OnceCell<Option<SchemaSnapshot>>,
    structure: OnceCell<Option<StructureSnapshot>>,
}

impl<'a> CheckContext<'a> {
    /// Create a context over an immutable changeset.
    #[must_use]
    pub fn new(
        patches: &'a [Patch],
        workspace: &'a dyn Workspace,
        settings: &'a CheckSettings,
    ) -> Self {
        Self {
            patches,
            workspace,
            settings,
            classification: OnceCell::new(),
            migrations: OnceCell::new(),
            known_versions: OnceCell::new(),
            schema: OnceCell::new(),
            structure: OnceCell::new(),
        }
    }

    /// All patches of the changeset.
    #[must_use]
    pub const fn patches(&self) -> &'a [Patch] {
        self.patches
    }

    /// Settings of the run.
    #[must_use]
    pub const fn settings(&self) -> &'a CheckSettings {
        self.settings
    }

    /// The changeset grouped by role.
    pub fn classification(&self) -> &Classification<'a> {
        self.classification
            .get_or_init(|| Classification::new(self.patches, &self.settings.layout))
    }

    /// Newly added migrations.
    pub fn migration_patches(&self) -> &[&'a Patch] {
        &self.classification().migrations
    }

    /// Patches touching the schema snapshot.
    pub fn schema_patches(&self) -> &[&'a Patch] {
        &self.classification().schema
    }

    /// Patches touching the structure dump.
    pub fn structure_patches(&self) -> &[&'a Patch] {
        &self.classification().structure
    }

    /// Patches unrelated to migrations.
    pub fn unrelated_patches(&self) -> &[&'a Patch] {
        &self.classification().unrelated
    }

    /// Versions of the added migrations, in changeset order.
    pub fn migration_versions(&self) -> impl Iterator<Item = MigrationEntry<'_>> + '_ {
        self.migration_list()
            .iter()
            .map(|(version, patch)| MigrationEntry {
                version: version.as_str(),
                patch: *patch,
            })
    }

    /// Whether an added migration carries `version`.
    pub fn has_migration_version(&self, version: &str) -> bool {
        self.known_versions
            .get_or_init(|| {
                self.migration_list()
                    .iter()
                    .map(|(version, _)| version.clone())
                    .collect()
            })
            .contains(version)
    }

    /// The schema snapshot, unless it is missing or ignored.
    pub fn schema(&self) -> Option<&SchemaSnapshot> {
        self.schema
            .get_or_init(|| {
                let path = &self.settings.layout.schema_path;
                self.tracked_file(path).map(|contents| SchemaSnapshot {
                    path: path.clone(),
                    version: version::schema_version(&contents),
                })
            })
            .as_ref()
    }

    /// The structure dump, unless it is missing or ignored.
    pub fn structure(&self) -> Option<&StructureSnapshot> {
        self.structure
            .get_or_init(|| {
                let path = &self.settings.layout.structure_path;
                self.tracked_file(path)
                    .map(|contents| StructureSnapshot::new(path.clone(), contents))
            })
            .as_ref()
    }

    fn migration_list(&self) -> &[(String, &'a Patch)] {
        self.migrations.get_or_init(|| {
            self.migration_patches()
                .iter()
                .map(|patch| {
                    let version = version::filename_version(patch.path());
                    if !version::is_canonical(&version) {
                        debug!(
                            path = patch.path(),
                            version = %version,
                            "migration version is not a 14-digit timestamp"
                        );
                    }
                    (version, *patch)
                })
                .collect()
        })
    }

    fn tracked_file(&self, path: &str) -> Option<String> {
        match self.workspace.is_ignored(path) {
            Ok(true) => {
                debug!(path, "file excluded by ignore rules; dependent checks skipped");
                return None;
            }
            Ok(false) => {}
            Err(err) => warn!(path, error = %err, "ignore lookup failed; treating file as tracked"),
        }

        match self.workspace.read_file(path) {
            Ok(Some(contents)) => Some(contents),
            Ok(None) => {
                debug!(path, "file not present in workspace");
                None
            }
            Err(err) => {
                warn!(path, error = %err, "failed to read file; dependent checks skipped");
                None
            }
        }
    }
}

impl fmt::Debug for CheckContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckContext")
            .field("patches", &self.patches.len())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
