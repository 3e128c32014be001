use tidemark_api::Severity;
use tidemark_check_api::{Anchor, Check, CheckContext, MessageSink, StructureMarker};
use tracing::debug;

use super::marker_patch;

/// Entries are separated by commas and the last one closes the statement.
#[derive(Debug, Default)]
pub struct StructureSyntaxCheck;

impl Check for StructureSyntaxCheck {
    fn id(&self) -> &'static str {
        "structure-syntax"
    }

    fn label(&self) -> &'static str {
        "Malformed structure entries"
    }

    fn run(&self, ctx: &CheckContext<'_>, sink: &mut MessageSink) {
        let Some(structure) = ctx.structure() else {
            return;
        };
        let Some((last, rest)) = structure.markers.split_last() else {
            return;
        };
        if last.is_semicolon_terminated() && rest.iter().all(StructureMarker::is_comma_terminated)
        {
            return;
        }

        let Some(patch) = marker_patch(ctx.structure_patches()) else {
            debug!(path = %structure.path, "malformed structure entries outside this changeset");
            return;
        };
        sink.add(
            patch,
            Anchor::First,
            Severity::Warning,
            "migration entries must be comma-separated and semicolon-terminated",
        );
    }
}
