//! Mapping of actions to remote request shapes.

use foldermagic_core::traits::remote::{RemoteError, RemoteRequest, RemoteStore, UpdatePatch};
use foldermagic_core::types::ActionType;
use foldermagic_entity::action::Action;

/// Build the remote request for an action whose references are resolved.
///
/// `move` needs the entity's current parents, so it costs one metadata
/// lookup; the other types are translated without remote calls.
pub async fn translate(
    action: &Action,
    remote: &dyn RemoteStore,
) -> Result<RemoteRequest, RemoteError> {
    match action.action_type() {
        ActionType::Move => {
            let entity_id = field(action, action.entity_id())?;
            let target = field(action, action.target_parent_id())?;
            let metadata = remote.get_metadata(entity_id).await?;
            Ok(RemoteRequest::Update {
                id: entity_id.to_string(),
                patch: UpdatePatch::reparent(target, metadata.parents),
            })
        }
        ActionType::Rename => {
            let entity_id = field(action, action.entity_id())?;
            let name = field(action, action.new_name())?;
            Ok(RemoteRequest::Update {
                id: entity_id.to_string(),
                patch: UpdatePatch::rename(name),
            })
        }
        ActionType::CreateFolder => Ok(RemoteRequest::CreateFolder {
            parent_id: field(action, action.target_parent_id())?.to_string(),
            name: field(action, action.new_name())?.to_string(),
        }),
    }
}

fn field<'a>(action: &Action, value: Option<&'a str>) -> Result<&'a str, RemoteError> {
    value.ok_or_else(|| {
        RemoteError::transport(format!(
            "Action '{}' is missing a required field",
            action.action_type()
        ))
    })
}
