//! Partitioning of a changeset into migration, schema, structure and
//! unrelated patches.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tidemark_api::Patch;

use crate::Layout;

static MIGRATION_FILE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]+_\w+\.\w+$").expect("valid migration file name pattern")
});

/// The changeset grouped by role. Each group keeps changeset order.
///
/// The groups are computed independently: a migration that was edited rather
/// than added is in none of the first three groups, yet still not unrelated.
#[derive(Debug, Clone, Default)]
pub struct Classification<'a> {
    /// Newly added migration files.
    pub migrations: Vec<&'a Patch>,
    /// Patches touching the schema snapshot.
    pub schema: Vec<&'a Patch>,
    /// Patches touching the structure dump.
    pub structure: Vec<&'a Patch>,
    /// Patches that have nothing to do with migrations.
    pub unrelated: Vec<&'a Patch>,
}

impl<'a> Classification<'a> {
    /// Classify every patch of the changeset.
    #[must_use]
    pub fn new(patches: &'a [Patch], layout: &Layout) -> Self {
        let mut classification = Self::default();

        for patch in patches {
            let new_path = patch.new_path.as_deref();

            if patch.is_added() && new_path.is_some_and(|path| is_migration_path(path, layout)) {
                classification.migrations.push(patch);
            }
            if new_path.is_some_and(|path| path.ends_with(&layout.schema_path)) {
                classification.schema.push(patch);
            }
            if new_path.is_some_and(|path| path.ends_with(&layout.structure_path)) {
                classification.structure.push(patch);
            }
            if !is_migration_related(patch.path(), layout) && !is_annotation_only(patch, layout) {
                classification.unrelated.push(patch);
            }
        }

        classification
    }
}

/// Whether `path` names a timestamped file below the migrations directory.
#[must_use]
pub fn is_migration_path(path: &str, layout: &Layout) -> bool {
    let dir = layout.migrations_dir.trim_matches('/');
    let Some((parent, name)) = path.rsplit_once('/') else {
        return false;
    };

    let parent = format!("/{parent}/");
    parent.contains(&format!("/{dir}/")) && MIGRATION_FILE_NAME.is_match(name)
}

/// Whether `path` is a migration, the schema snapshot or the structure dump.
#[must_use]
pub fn is_migration_related(path: &str, layout: &Layout) -> bool {
    is_migration_path(path, layout)
        || path.ends_with(&layout.schema_path)
        || path.ends_with(&layout.structure_path)
}

/// Whether the patch only touches comments or blank lines of a source file.
///
/// Generated model annotations land in comments, so such edits may travel
/// with a migration.
#[must_use]
pub fn is_annotation_only(patch: &Patch, layout: &Layout) -> bool {
    let annotated = Path::new(patch.path())
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| layout.annotated_extensions.iter().any(|known| known == ext));

    annotated
        && patch.changed_lines().all(|line| {
            let trimmed = line.content.trim_start();
            trimmed.is_empty() || trimmed.starts_with('#')
        })
}

#[cfg(test)]
mod tests {
    use tidemark_api::{LineKind, PatchHunk};

    use super::*;

    const BASE_OID: &str = "1111111111111111111111111111111111111111";

    fn migration(path: &str) -> Patch {
        Patch::added(path, vec![PatchHunk::additions(["class AddX", "end"])])
    }

    fn edit(path: &str, lines: Vec<(LineKind, &str)>) -> Patch {
        let lines = lines
            .into_iter()
            .map(|(kind, text)| (kind, text.to_owned()))
            .collect();
        Patch::modified(path, BASE_OID, vec![PatchHunk::new(1, 1, lines)])
    }

    #[test]
    fn migration_paths() {
        let layout = Layout::default();
        assert!(is_migration_path("db/migrate/20220919220000_add_x.rb", &layout));
        assert!(is_migration_path(
            "engines/billing/db/migrate/archive/20220919220000_add_x.rb",
            &layout
        ));
        assert!(!is_migration_path("db/migrate/README.md", &layout));
        assert!(!is_migration_path("db/seeds/20220919220000_add_x.rb", &layout));
        assert!(!is_migration_path("20220919220000_add_x.rb", &layout));
    }

    #[test]
    fn groups_are_built_independently() {
        let layout = Layout::default();
        let patches = vec![
            migration("db/migrate/20220919220000_add_x.rb"),
            edit(
                "db/migrate/20200101000000_old.rb",
                vec![(LineKind::Addition, "  add_index :x, :y")],
            ),
            edit("db/schema.rb", vec![(LineKind::Addition, "  t.string :x")]),
            edit(
                "db/structure.sql",
                vec![(LineKind::Addition, "('20220919220000');")],
            ),
            edit(
                "app/models/user.rb",
                vec![(LineKind::Addition, "  validates :name")],
            ),
        ];

        let classification = Classification::new(&patches, &layout);
        assert_eq!(classification.migrations.len(), 1);
        assert_eq!(classification.schema.len(), 1);
        assert_eq!(classification.structure.len(), 1);
        assert_eq!(classification.unrelated.len(), 1);
        assert_eq!(classification.unrelated[0].path(), "app/models/user.rb");
    }

    #[test]
    fn annotation_edits_are_not_unrelated() {
        let layout = Layout::default();
        let patches = vec![edit(
            "app/models/user.rb",
            vec![
                (LineKind::Context, "# == Schema Information"),
                (LineKind::Deletion, "#  name  :string"),
                (LineKind::Addition, "#  name  :string  not null"),
                (LineKind::Addition, ""),
                (LineKind::Context, "class User < ApplicationRecord"),
            ],
        )];

        let classification = Classification::new(&patches, &layout);
        assert!(classification.unrelated.is_empty());
    }

    #[test]
    fn comment_edits_outside_source_files_are_unrelated() {
        let layout = Layout::default();
        let patches = vec![edit(
            "config/settings.yml",
            vec![(LineKind::Addition, "# new comment")],
        )];

        let classification = Classification::new(&patches, &layout);
        assert_eq!(classification.unrelated.len(), 1);
    }
}
