//! Placeholder resolution.
//!
//! A `create_folder` action may declare a `placeholder_id`; later actions
//! in the same list can use it wherever an entity or parent id is expected.
//! Only placeholders declared earlier in the list are substituted, any
//! other id is passed through untouched.

use std::collections::HashMap;

use foldermagic_entity::action::Action;

/// State of one placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Declared; the create has not completed yet.
    Pending,
    /// The create succeeded and produced this id.
    Resolved(String),
    /// The create failed or was never attempted.
    Failed,
}

/// Placeholder ids seen so far and what they resolved to.
#[derive(Debug, Clone, Default)]
pub struct ResolutionTable {
    entries: HashMap<String, Resolution>,
}

impl ResolutionTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `action` is about to run, if it declares a placeholder.
    pub fn declare(&mut self, action: &Action) {
        if let Some(placeholder) = action.placeholder_id() {
            self.entries
                .insert(placeholder.to_string(), Resolution::Pending);
        }
    }

    /// Bind the placeholder of `action` to the id its create produced.
    pub fn resolve(&mut self, action: &Action, id: impl Into<String>) {
        if let Some(placeholder) = action.placeholder_id() {
            self.entries
                .insert(placeholder.to_string(), Resolution::Resolved(id.into()));
        }
    }

    /// Mark the placeholder of `action` as unusable.
    pub fn fail(&mut self, action: &Action) {
        if let Some(placeholder) = action.placeholder_id() {
            self.entries.insert(placeholder.to_string(), Resolution::Failed);
        }
    }

    /// Whether `id` is a declared placeholder whose create is still in flight.
    pub fn is_pending(&self, id: &str) -> bool {
        matches!(self.entries.get(id), Some(Resolution::Pending))
    }

    /// Rewrite the references of `action`.
    ///
    /// Returns the first reference that names a pending or failed
    /// placeholder as the error.
    pub fn apply(&self, action: &Action) -> Result<Action, String> {
        if let Some(unresolved) = action
            .references()
            .find(|id| matches!(self.entries.get(*id), Some(Resolution::Pending | Resolution::Failed)))
        {
            return Err(unresolved.to_string());
        }

        Ok(action.map_references(|id| match self.entries.get(id) {
            Some(Resolution::Resolved(real)) => real.clone(),
            _ => id.to_string(),
        }))
    }
}
