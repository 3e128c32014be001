//! Runs the registered checks over one changeset.

use tidemark_api::{Message, Patch};
use tidemark_check_api::{CheckContext, CheckRegistry, CheckSettings, MessageSink, Workspace};
use tracing::debug;

use crate::Config;

/// Entry point for a review run.
///
/// A run is a pure function of the patches, the workspace snapshot and the
/// settings; the engine keeps no state between runs.
#[derive(Debug)]
pub struct Engine {
    registry: CheckRegistry,
    settings: CheckSettings,
}

impl Engine {
    /// Engine with every built-in check and the given settings.
    #[must_use]
    pub fn new(settings: CheckSettings) -> Self {
        Self::with_registry(tidemark_checks::default_registry(), settings)
    }

    /// Engine evaluating a custom set of checks.
    #[must_use]
    pub fn with_registry(registry: CheckRegistry, settings: CheckSettings) -> Self {
        Self { registry, settings }
    }

    /// Engine configured from a loaded [`Config`], minus its disabled checks.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let mut registry = tidemark_checks::default_registry();
        for id in &config.disabled {
            if !registry.remove(id) {
                debug!(check = %id, "disabled check is not registered");
            }
        }
        Self::with_registry(registry, config.checks.clone())
    }

    /// Settings used for every run.
    #[must_use]
    pub const fn settings(&self) -> &CheckSettings {
        &self.settings
    }

    /// Checks evaluated by every run, in order.
    #[must_use]
    pub const fn registry(&self) -> &CheckRegistry {
        &self.registry
    }

    /// Evaluate every check and return their messages in check order.
    #[must_use]
    pub fn run(&self, patches: &[Patch], workspace: &dyn Workspace) -> Vec<Message> {
        let ctx = CheckContext::new(patches, workspace, &self.settings);
        let mut messages = Vec::new();

        for check in self.registry.iter() {
            let mut sink = MessageSink::new(check.id());
            check.run(&ctx, &mut sink);
            debug!(check = check.id(), messages = sink.len(), "check finished");
            messages.extend(sink.into_messages());
        }

        messages
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(CheckSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use tidemark_api::PatchHunk;
    use tidemark_check_api::InMemoryWorkspace;

    use super::*;

    #[test]
    fn disabled_checks_are_removed() {
        let config = Config {
            disabled: vec!["large-diff".into(), "not-a-check".into()],
            ..Config::default()
        };
        let engine = Engine::from_config(&config);
        assert_eq!(engine.registry().len(), 8);
        assert!(engine.registry().get("large-diff").is_none());
    }

    #[test]
    fn empty_changeset_is_quiet() {
        let engine = Engine::default();
        assert!(engine.run(&[], &InMemoryWorkspace::new()).is_empty());
    }

    #[test]
    fn messages_follow_check_order() {
        let patches = vec![
            Patch::added(
                "db/migrate/20220919220000_add_x.rb",
                vec![PatchHunk::additions(["class AddX", "end"])],
            ),
            Patch::added(
                "app/services/x.rb",
                vec![PatchHunk::additions(["class X", "end"])],
            ),
        ];
        let workspace = InMemoryWorkspace::new().with_file(
            "db/schema.rb",
            "ActiveRecord::Schema.define(version: 2022_01_01_000000) do\nend\n",
        );

        let checks: Vec<_> = Engine::default()
            .run(&patches, &workspace)
            .into_iter()
            .map(|message| message.check)
            .collect();
        assert_eq!(checks, ["mixed-changes", "schema-not-updated"]);
    }
}
