//! Check registry keeps track of the rules evaluated by a run.

use std::fmt;

use crate::{Check, CheckSummary};

/// Ordered registry of checks. Registration order is evaluation order.
#[derive(Default)]
pub struct CheckRegistry {
    checks: Vec<Box<dyn Check>>,
}

impl CheckRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a check keyed by its `Check::id`.
    ///
    /// A check with an id that is already registered replaces the earlier one
    /// in place.
    pub fn register<C>(&mut self, check: C)
    where
        C: Check + 'static,
    {
        let check: Box<dyn Check> = Box::new(check);
        match self.checks.iter_mut().find(|known| known.id() == check.id()) {
            Some(slot) => *slot = check,
            None => self.checks.push(check),
        }
    }

    /// Drop a check, returning whether it was registered.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.checks.len();
        self.checks.retain(|check| check.id() != id);
        self.checks.len() != before
    }

    /// Retrieve a check by identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&dyn Check> {
        self.checks
            .iter()
            .find(|check| check.id() == id)
            .map(|check| check.as_ref())
    }

    /// Iterate checks in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Check> + '_ {
        self.checks.iter().map(|check| check.as_ref())
    }

    /// Returns the registered check identifiers in evaluation order.
    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.checks.iter().map(|check| check.id())
    }

    /// Summaries for all registered checks.
    #[must_use]
    pub fn summaries(&self) -> Vec<CheckSummary> {
        self.checks
            .iter()
            .map(|check| CheckSummary {
                id: check.id().to_owned(),
                label: check.label().to_owned(),
            })
            .collect()
    }

    /// Number of registered checks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Whether no check is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

impl fmt::Debug for CheckRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<&str> = self.ids().collect();
        f.debug_struct("CheckRegistry").field("checks", &ids).finish()
    }
}
