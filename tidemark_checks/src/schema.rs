//! Checks tying added migrations to the schema snapshot.

use tidemark_api::Severity;
use tidemark_check_api::{Anchor, Check, CheckContext, MessageSink};

/// An added migration must come with a regenerated schema snapshot.
#[derive(Debug, Default)]
pub struct SchemaUpdatedCheck;

impl Check for SchemaUpdatedCheck {
    fn id(&self) -> &'static str {
        "schema-not-updated"
    }

    fn label(&self) -> &'static str {
        "Schema snapshot not updated"
    }

    fn run(&self, ctx: &CheckContext<'_>, sink: &mut MessageSink) {
        let migrations = ctx.migration_patches();
        if migrations.is_empty() || !ctx.schema_patches().is_empty() {
            return;
        }
        let Some(schema) = ctx.schema() else {
            return;
        };

        let text = format!(
            "migration present but schema not updated: no changes to {}",
            schema.path
        );
        sink.add_each(migrations.iter().copied(), Anchor::First, Severity::Error, &text);
    }
}

/// No added migration may be newer than the version the schema snapshot declares.
///
/// Only evaluated when the snapshot is part of the changeset; otherwise
/// [`SchemaUpdatedCheck`] already reports it.
#[derive(Debug, Default)]
pub struct SchemaVersionCheck;

impl Check for SchemaVersionCheck {
    fn id(&self) -> &'static str {
        "schema-version-order"
    }

    fn label(&self) -> &'static str {
        "Migration newer than schema version"
    }

    fn run(&self, ctx: &CheckContext<'_>, sink: &mut MessageSink) {
        let Some(first) = ctx.migration_patches().first() else {
            return;
        };
        if ctx.schema_patches().is_empty() {
            return;
        }
        let Some(schema) = ctx.schema() else {
            return;
        };

        let Some(declared) = schema.version.as_deref() else {
            sink.add(
                first,
                Anchor::First,
                Severity::Warning,
                format!(
                    "cannot detect schema version in {}; version checks skipped",
                    schema.path
                ),
            );
            return;
        };

        for entry in ctx.migration_versions() {
            if entry.version > declared {
                sink.add(
                    entry.patch,
                    Anchor::First,
                    Severity::Warning,
                    format!(
                        "migration version {} is above schema version {declared}",
                        entry.version
                    ),
                );
            }
        }
    }
}
