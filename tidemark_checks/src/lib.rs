//! Consistency checks between migrations, the schema snapshot and the
//! structure dump of a changeset.

mod large_diff;
mod mixed_changes;
mod schema;
mod structure;
#[cfg(test)]
mod testing;

pub use large_diff::LargeDiffCheck;
pub use mixed_changes::MixedChangesCheck;
pub use schema::{SchemaUpdatedCheck, SchemaVersionCheck};
pub use structure::{
    StructureEndingCheck, StructureEntriesCheck, StructureOrderCheck, StructurePresenceCheck,
    StructureSyntaxCheck,
};

use tidemark_check_api::CheckRegistry;

/// Build a registry holding every check in its evaluation order.
#[must_use]
pub fn default_registry() -> CheckRegistry {
    let mut registry = CheckRegistry::new();
    registry.register(MixedChangesCheck);
    registry.register(SchemaUpdatedCheck);
    registry.register(SchemaVersionCheck);
    registry.register(StructurePresenceCheck);
    registry.register(StructureEntriesCheck);
    registry.register(StructureOrderCheck);
    registry.register(StructureSyntaxCheck);
    registry.register(StructureEndingCheck);
    registry.register(LargeDiffCheck);
    registry
}
