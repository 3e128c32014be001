use tidemark_api::Severity;
use tidemark_check_api::{Anchor, Check, CheckContext, MessageSink};

/// The structure dump ends with one newline or with exactly two blank lines.
#[derive(Debug, Default)]
pub struct StructureEndingCheck;

impl Check for StructureEndingCheck {
    fn id(&self) -> &'static str {
        "structure-file-ending"
    }

    fn label(&self) -> &'static str {
        "Structure file ending"
    }

    fn run(&self, ctx: &CheckContext<'_>, sink: &mut MessageSink) {
        let Some(patch) = ctx.structure_patches().last() else {
            return;
        };
        let Some(structure) = ctx.structure() else {
            return;
        };
        if has_valid_ending(&structure.contents) {
            return;
        }

        sink.add(
            patch,
            Anchor::Last,
            Severity::Warning,
            "structure file must end with a newline or two blank lines",
        );
    }
}

fn has_valid_ending(contents: &str) -> bool {
    let lines: Vec<&str> = contents.split_inclusive('\n').collect();
    let blank = |line: &&str| line.ends_with('\n') && line.trim().is_empty();

    match lines.as_slice() {
        [.., before, second_last, last] if blank(second_last) && blank(last) => !blank(before),
        [.., last] => last.ends_with('\n') && !last.trim().is_empty(),
        [] => false,
    }
}
