//! Checks over the SQL structure dump and its `schema_migrations` entries.

mod ending;
mod entries;
mod order;
mod presence;
mod syntax;

pub use ending::StructureEndingCheck;
pub use entries::StructureEntriesCheck;
pub use order::StructureOrderCheck;
pub use presence::StructurePresenceCheck;
pub use syntax::StructureSyntaxCheck;

use tidemark_api::Patch;
use tidemark_check_api::version::marker_version;

/// First patch touching a marker line, else the first patch.
fn marker_patch<'a>(patches: &[&'a Patch]) -> Option<&'a Patch> {
    patches
        .iter()
        .find(|patch| {
            patch
                .lines()
                .any(|line| marker_version(&line.content).is_some())
        })
        .or_else(|| patches.first())
        .copied()
}
