use tidemark_api::Severity;
use tidemark_check_api::{Anchor, Check, CheckContext, MessageSink};

/// Every added migration must be recorded in the structure dump.
#[derive(Debug, Default)]
pub struct StructurePresenceCheck;

impl Check for StructurePresenceCheck {
    fn id(&self) -> &'static str {
        "structure-presence"
    }

    fn label(&self) -> &'static str {
        "Migration missing from structure file"
    }

    fn run(&self, ctx: &CheckContext<'_>, sink: &mut MessageSink) {
        let Some(structure) = ctx.structure() else {
            return;
        };

        let mut found_missing = false;
        for entry in ctx.migration_versions() {
            if structure.records(entry.version) {
                continue;
            }
            found_missing = true;
            sink.add(
                entry.patch,
                Anchor::First,
                Severity::Error,
                format!(
                    "migration {} is missing from structure file {}",
                    entry.version, structure.path
                ),
            );
        }

        let migrations = ctx.migration_patches();
        if found_missing || migrations.is_empty() || !ctx.structure_patches().is_empty() {
            return;
        }

        let text = format!(
            "migration present but structure file not updated: no changes to {}",
            structure.path
        );
        sink.add_each(migrations.iter().copied(), Anchor::First, Severity::Warning, &text);
    }
}
