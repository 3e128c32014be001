use tidemark_api::{LineKind, Patch, PatchLine, Severity};
use tidemark_check_api::version::marker_version;
use tidemark_check_api::{Anchor, Check, CheckContext, MessageSink};

/// Structure entries added by the changeset must belong to its migrations.
#[derive(Debug, Default)]
pub struct StructureEntriesCheck;

impl Check for StructureEntriesCheck {
    fn id(&self) -> &'static str {
        "structure-unknown-entry"
    }

    fn label(&self) -> &'static str {
        "Structure entry without migration"
    }

    fn run(&self, ctx: &CheckContext<'_>, sink: &mut MessageSink) {
        if ctx.structure().is_none() {
            return;
        }
        let without_migrations = ctx.migration_patches().is_empty();

        for patch in ctx.structure_patches() {
            // The first dump of a project legitimately lists every historical version.
            if patch.is_new_file() {
                continue;
            }

            let mut flagged = false;
            for (position, line) in patch.positioned_lines() {
                if line.kind != LineKind::Addition {
                    continue;
                }
                let Some(version) = marker_version(&line.content) else {
                    continue;
                };
                if ctx.has_migration_version(version) || is_relocated(patch, line, version) {
                    continue;
                }

                flagged = true;
                sink.add(
                    patch,
                    Anchor::Position(position),
                    Severity::Error,
                    format!(
                        "structure entry {version} present without a corresponding migration \
                         in this changeset"
                    ),
                );
            }

            if !flagged && without_migrations {
                sink.add(
                    patch,
                    Anchor::Position(0),
                    Severity::Error,
                    "structure file changed without any migration",
                );
            }
        }
    }
}

/// An existing entry re-added with a comma because a newer entry now follows it.
fn is_relocated(patch: &Patch, line: &PatchLine, version: &str) -> bool {
    line.content.ends_with(',')
        && patch
            .deleted_lines()
            .any(|deleted| deleted.content.contains(version))
}
