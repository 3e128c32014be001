use tidemark_api::{Patch, Severity};
use tidemark_check_api::{Anchor, Check, CheckContext, MessageSink};

/// Large generated-file diffs deserve a closer look.
#[derive(Debug, Default)]
pub struct LargeDiffCheck;

impl Check for LargeDiffCheck {
    fn id(&self) -> &'static str {
        "large-diff"
    }

    fn label(&self) -> &'static str {
        "Large schema or structure diff"
    }

    fn run(&self, ctx: &CheckContext<'_>, sink: &mut MessageSink) {
        let Some(threshold) = ctx.settings().large_diff_threshold() else {
            return;
        };

        report(
            sink,
            ctx.schema_patches(),
            threshold,
            "large schema diff, pay attention",
        );
        report(
            sink,
            ctx.structure_patches(),
            threshold,
            "large structure diff, pay attention",
        );
    }
}

fn report(sink: &mut MessageSink, patches: &[&Patch], threshold: u32, text: &str) {
    let Some(first) = patches.first() else {
        return;
    };
    let additions: u32 = patches.iter().map(|patch| patch.additions()).sum();
    let deletions: u32 = patches.iter().map(|patch| patch.deletions()).sum();

    if additions >= threshold || deletions >= threshold {
        sink.add(
            first,
            Anchor::First,
            Severity::Warning,
            format!("{text} ({additions} additions, {deletions} deletions)"),
        );
    }
}
