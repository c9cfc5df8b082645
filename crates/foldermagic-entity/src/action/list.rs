//! Ordered action lists.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use foldermagic_core::error::AppError;
use foldermagic_core::result::AppResult;

use super::model::Action;

/// An ordered collection of actions, applied strictly in list order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDiffList")]
pub struct DiffList {
    actions: Vec<Action>,
}

#[derive(Debug, Deserialize)]
struct RawDiffList {
    actions: Vec<Action>,
}

impl TryFrom<RawDiffList> for DiffList {
    type Error = AppError;

    fn try_from(raw: RawDiffList) -> Result<Self, Self::Error> {
        Self::new(raw.actions)
    }
}

impl DiffList {
    /// Build a diff list, rejecting placeholder ids declared twice.
    pub fn new(actions: Vec<Action>) -> AppResult<Self> {
        let mut seen = HashSet::new();
        for (index, action) in actions.iter().enumerate() {
            if let Some(placeholder) = action.placeholder_id() {
                if !seen.insert(placeholder) {
                    return Err(AppError::validation(format!(
                        "Placeholder id '{placeholder}' is declared more than once (action {index})"
                    )));
                }
            }
        }
        Ok(Self { actions })
    }

    /// An empty diff list.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether the list has no actions.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// The actions, in application order.
    pub fn as_slice(&self) -> &[Action] {
        &self.actions
    }

    /// Iterate the actions in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Action> {
        self.actions.iter()
    }
}

impl<'a> IntoIterator for &'a DiffList {
    type Item = &'a Action;
    type IntoIter = std::slice::Iter<'a, Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.iter()
    }
}
