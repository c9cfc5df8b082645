//! Structure record entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::action::DiffList;
use crate::tree::FolderNode;

/// Lifecycle state of a stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructureState {
    /// `current` is set; no pending proposal.
    Initialized,
    /// `current` is set and a proposal (`proposed` + `diff`) is pending.
    Updated,
}

/// The persisted per-user triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureRecord {
    /// Key of the owning user (their email address).
    pub user_key: String,
    /// Last captured/confirmed snapshot.
    pub current: Option<FolderNode>,
    /// Snapshot after applying `diff` to `current`.
    pub proposed: Option<FolderNode>,
    /// The diff list that produced `proposed`.
    pub diff: Option<DiffList>,
    /// When the record was last written.
    pub updated_at: DateTime<Utc>,
}

impl StructureRecord {
    /// A freshly initialized record.
    pub fn initialized(user_key: impl Into<String>, current: FolderNode) -> Self {
        Self {
            user_key: user_key.into(),
            current: Some(current),
            proposed: None,
            diff: None,
            updated_at: Utc::now(),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> StructureState {
        if self.proposed.is_some() {
            StructureState::Updated
        } else {
            StructureState::Initialized
        }
    }

    /// Whether a proposal is pending.
    pub fn has_proposal(&self) -> bool {
        self.state() == StructureState::Updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialized_state() {
        let record = StructureRecord::initialized("a@b.c", FolderNode::root("root", "r"));
        assert_eq!(record.state(), StructureState::Initialized);
        assert!(!record.has_proposal());
        assert!(record.diff.is_none());
    }
}
