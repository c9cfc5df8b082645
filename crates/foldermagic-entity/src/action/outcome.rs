//! Per-action outcomes and their aggregate.

use serde::{Deserialize, Serialize};

use foldermagic_core::traits::remote::RemoteError;
use foldermagic_core::types::ActionType;

use super::model::Action;

/// Result of a single action, correlated to it by `index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    /// Position of the action in the submitted list.
    pub index: usize,
    /// Echo of the action's type.
    pub action_type: ActionType,
    /// Echo of the action's entity (absent for creates).
    pub entity_id: Option<String>,
    /// Whether the action took effect.
    pub success: bool,
    /// Failure description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Transport status code of the failure, when one was received.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Identifier assigned to a newly created folder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_entity_id: Option<String>,
}

impl ActionOutcome {
    /// A successful outcome.
    pub fn succeeded(index: usize, action: &Action) -> Self {
        Self {
            index,
            action_type: action.action_type(),
            entity_id: action.entity_id().map(str::to_string),
            success: true,
            error_message: None,
            error_code: None,
            new_entity_id: None,
        }
    }

    /// A successful `create_folder` outcome carrying the assigned id.
    pub fn created(index: usize, action: &Action, new_entity_id: impl Into<String>) -> Self {
        Self {
            new_entity_id: Some(new_entity_id.into()),
            ..Self::succeeded(index, action)
        }
    }

    /// A failed outcome.
    pub fn failed(
        index: usize,
        action: &Action,
        message: impl Into<String>,
        code: Option<String>,
    ) -> Self {
        Self {
            index,
            action_type: action.action_type(),
            entity_id: action.entity_id().map(str::to_string),
            success: false,
            error_message: Some(message.into()),
            error_code: code,
            new_entity_id: None,
        }
    }

    /// A failed outcome built from a remote error.
    pub fn from_remote_error(index: usize, action: &Action, err: &RemoteError) -> Self {
        Self::failed(index, action, err.message.clone(), err.code())
    }
}

/// Aggregate result of applying a diff list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationResult {
    /// Number of actions.
    pub total: usize,
    /// Number of successful actions.
    pub succeeded: usize,
    /// Number of failed actions.
    pub failed: usize,
    /// Per-action outcomes in list order.
    pub outcomes: Vec<ActionOutcome>,
}

impl ApplicationResult {
    /// The result of applying an empty list.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether every action succeeded.
    pub fn is_complete_success(&self) -> bool {
        self.failed == 0
    }

    /// Outcomes of failed actions.
    pub fn failures(&self) -> impl Iterator<Item = &ActionOutcome> {
        self.outcomes.iter().filter(|o| !o.success)
    }
}
