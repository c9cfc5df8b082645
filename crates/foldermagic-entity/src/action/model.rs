//! Action entity model.

use serde::{Deserialize, Serialize};

use foldermagic_core::error::AppError;
use foldermagic_core::result::AppResult;
use foldermagic_core::types::ActionType;

/// A single declarative structural edit.
///
/// Fields are private: an `Action` can only be obtained through the
/// validating constructors or through deserialization, which runs the
/// same checks. Fields that are meaningless for the action type are
/// dropped on construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawAction")]
pub struct Action {
    action_type: ActionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    entity_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    target_parent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    new_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    placeholder_id: Option<String>,
}

/// Unvalidated wire form of an [`Action`].
///
/// Accepts the assistant-facing field names `file_id`, `parent_id`, and
/// `name` as aliases.
#[derive(Debug, Clone, Deserialize)]
struct RawAction {
    action_type: String,
    #[serde(default, alias = "file_id")]
    entity_id: Option<String>,
    #[serde(default, alias = "parent_id")]
    target_parent_id: Option<String>,
    #[serde(default, alias = "name")]
    new_name: Option<String>,
    #[serde(default)]
    placeholder_id: Option<String>,
}

impl TryFrom<RawAction> for Action {
    type Error = AppError;

    fn try_from(raw: RawAction) -> Result<Self, Self::Error> {
        let action_type: ActionType = raw.action_type.parse()?;
        let action = Self::new(action_type, raw.entity_id, raw.target_parent_id, raw.new_name)?;
        match raw.placeholder_id {
            Some(placeholder) if action_type == ActionType::CreateFolder => {
                action.with_placeholder(placeholder)
            }
            _ => Ok(action),
        }
    }
}

impl Action {
    /// Build an action, enforcing the field requirements of its type.
    pub fn new(
        action_type: ActionType,
        entity_id: Option<String>,
        target_parent_id: Option<String>,
        new_name: Option<String>,
    ) -> AppResult<Self> {
        let entity_id = required(action_type.requires_entity(), action_type, "entity_id", entity_id)?;
        let target_parent_id = required(
            action_type.requires_target_parent(),
            action_type,
            "target_parent_id",
            target_parent_id,
        )?;
        let new_name = required(action_type.requires_name(), action_type, "new_name", new_name)?;

        Ok(Self {
            action_type,
            entity_id,
            target_parent_id,
            new_name,
            placeholder_id: None,
        })
    }

    /// Move `entity_id` under `target_parent_id`.
    pub fn move_entity(
        entity_id: impl Into<String>,
        target_parent_id: impl Into<String>,
    ) -> AppResult<Self> {
        Self::new(
            ActionType::Move,
            Some(entity_id.into()),
            Some(target_parent_id.into()),
            None,
        )
    }

    /// Rename `entity_id` to `new_name`.
    pub fn rename(entity_id: impl Into<String>, new_name: impl Into<String>) -> AppResult<Self> {
        Self::new(
            ActionType::Rename,
            Some(entity_id.into()),
            None,
            Some(new_name.into()),
        )
    }

    /// Create a folder named `new_name` under `target_parent_id`.
    pub fn create_folder(
        target_parent_id: impl Into<String>,
        new_name: impl Into<String>,
    ) -> AppResult<Self> {
        Self::new(
            ActionType::CreateFolder,
            None,
            Some(target_parent_id.into()),
            Some(new_name.into()),
        )
    }

    /// Attach a placeholder id that later actions may reference.
    pub fn with_placeholder(mut self, placeholder_id: impl Into<String>) -> AppResult<Self> {
        if self.action_type != ActionType::CreateFolder {
            return Err(AppError::validation(format!(
                "Action '{}' cannot declare a placeholder_id; only create_folder can",
                self.action_type
            )));
        }
        let placeholder_id = placeholder_id.into();
        if placeholder_id.trim().is_empty() {
            return Err(AppError::validation(
                "Action 'create_folder' has a blank placeholder_id",
            ));
        }
        self.placeholder_id = Some(placeholder_id);
        Ok(self)
    }

    /// The kind of edit.
    pub fn action_type(&self) -> ActionType {
        self.action_type
    }

    /// The entity acted on (`move`, `rename`).
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// The destination folder (`move`, `create_folder`).
    pub fn target_parent_id(&self) -> Option<&str> {
        self.target_parent_id.as_deref()
    }

    /// The new name (`rename`, `create_folder`).
    pub fn new_name(&self) -> Option<&str> {
        self.new_name.as_deref()
    }

    /// Temporary id of the folder a `create_folder` action will produce.
    pub fn placeholder_id(&self) -> Option<&str> {
        self.placeholder_id.as_deref()
    }

    /// Identifiers of existing entities this action refers to.
    pub fn references(&self) -> impl Iterator<Item = &str> {
        self.entity_id().into_iter().chain(self.target_parent_id())
    }

    /// Copy of this action with every reference passed through `resolve`.
    pub fn map_references(&self, mut resolve: impl FnMut(&str) -> String) -> Self {
        Self {
            entity_id: self.entity_id.as_deref().map(&mut resolve),
            target_parent_id: self.target_parent_id.as_deref().map(&mut resolve),
            ..self.clone()
        }
    }
}

fn required(
    needed: bool,
    action_type: ActionType,
    field: &str,
    value: Option<String>,
) -> AppResult<Option<String>> {
    if !needed {
        return Ok(None);
    }
    match value {
        Some(v) if !v.trim().is_empty() => Ok(Some(v)),
        _ => Err(AppError::validation(format!(
            "Action '{action_type}' requires field '{field}'"
        ))),
    }
}
