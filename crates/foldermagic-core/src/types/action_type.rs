//! The closed set of structural edit kinds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Kind of structural edit an action requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Re-parent an existing file or folder.
    Move,
    /// Change the name of an existing file or folder.
    Rename,
    /// Create a new, empty folder.
    CreateFolder,
}

impl ActionType {
    /// All supported action types.
    pub const ALL: [ActionType; 3] = [Self::Move, Self::Rename, Self::CreateFolder];

    /// Return the wire name of the action type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Move => "move",
            Self::Rename => "rename",
            Self::CreateFolder => "create_folder",
        }
    }

    /// Whether actions of this type act on an existing entity.
    pub fn requires_entity(&self) -> bool {
        matches!(self, Self::Move | Self::Rename)
    }

    /// Whether actions of this type need a target parent folder.
    pub fn requires_target_parent(&self) -> bool {
        matches!(self, Self::Move | Self::CreateFolder)
    }

    /// Whether actions of this type carry a new name.
    pub fn requires_name(&self) -> bool {
        matches!(self, Self::Rename | Self::CreateFolder)
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "move" => Ok(Self::Move),
            "rename" => Ok(Self::Rename),
            "create_folder" => Ok(Self::CreateFolder),
            other => Err(AppError::validation(format!(
                "Unsupported action type: '{other}'. Supported: move, rename, create_folder"
            ))),
        }
    }
}
