use tidemark_api::Severity;
use tidemark_check_api::{Anchor, Check, CheckContext, MessageSink};

/// Migrations have to ship on their own, apart from comment-only annotation updates.
#[derive(Debug, Default)]
pub struct MixedChangesCheck;

impl Check for MixedChangesCheck {
    fn id(&self) -> &'static str {
        "mixed-changes"
    }

    fn label(&self) -> &'static str {
        "Migrations mixed with other changes"
    }

    fn run(&self, ctx: &CheckContext<'_>, sink: &mut MessageSink) {
        let migrations = ctx.migration_patches();
        let unrelated = ctx.unrelated_patches();
        if migrations.is_empty() || unrelated.is_empty() {
            return;
        }

        let paths: Vec<&str> = unrelated.iter().map(|patch| patch.path()).collect();
        let text = format!(
            "migrations must not be mixed with other changes (also changed: {})",
            paths.join(", ")
        );
        sink.add_each(migrations.iter().copied(), Anchor::First, Severity::Fatal, &text);
    }
}
