use tidemark_api::Severity;
use tidemark_check_api::{Anchor, Check, CheckContext, MessageSink};
use tracing::warn;

use super::marker_patch;

/// Structure entries must be sorted, in either direction.
///
/// The intended direction is the one with fewer inverted neighbours; ties
/// favour ascending order.
#[derive(Debug, Default)]
pub struct StructureOrderCheck;

impl Check for StructureOrderCheck {
    fn id(&self) -> &'static str {
        "structure-sort-order"
    }

    fn label(&self) -> &'static str {
        "Structure entries out of order"
    }

    fn run(&self, ctx: &CheckContext<'_>, sink: &mut MessageSink) {
        let Some(structure) = ctx.structure() else {
            return;
        };
        let versions: Vec<&str> = structure
            .markers
            .iter()
            .map(|marker| marker.version.as_str())
            .collect();

        let Some(offending) = offending_versions(&versions) else {
            return;
        };

        let patches = ctx.structure_patches();
        if patches.is_empty() {
            warn!(
                path = %structure.path,
                offending = %offending.join(", "),
                "structure entries are not sorted; disorder predates this changeset"
            );
            return;
        }

        let target = patches
            .iter()
            .find(|patch| {
                patch
                    .lines()
                    .any(|line| offending.iter().any(|v| line.content.contains(v)))
            })
            .copied()
            .or_else(|| marker_patch(patches));

        if let Some(patch) = target {
            sink.add(
                patch,
                Anchor::First,
                Severity::Warning,
                format!(
                    "migration versions must be sorted and correctly formatted (out of order: {})",
                    offending.join(", ")
                ),
            );
        }
    }
}

/// Versions taking part in an inversion, or `None` when the sequence is sorted.
fn offending_versions<'v>(versions: &[&'v str]) -> Option<Vec<&'v str>> {
    let ascending_breaks: Vec<&[&str]> = versions.windows(2).filter(|w| w[0] > w[1]).collect();
    let descending_breaks: Vec<&[&str]> = versions.windows(2).filter(|w| w[0] < w[1]).collect();
    if ascending_breaks.is_empty() || descending_breaks.is_empty() {
        return None;
    }

    let breaks = if descending_breaks.len() < ascending_breaks.len() {
        descending_breaks
    } else {
        ascending_breaks
    };

    let mut offending = Vec::new();
    for version in breaks.into_iter().flatten() {
        if !offending.contains(version) {
            offending.push(*version);
        }
    }
    Some(offending)
}
