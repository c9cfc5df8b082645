//! In-memory application of a diff list to a snapshot.

use tracing::debug;
use uuid::Uuid;

use foldermagic_core::types::ActionType;
use foldermagic_entity::action::{Action, ActionOutcome, ApplicationResult, DiffList};
use foldermagic_entity::tree::FolderNode;

use super::arena::TreeArena;
use crate::diff::aggregate::build_result;
use crate::diff::resolution::ResolutionTable;

/// A projected tree and what happened to each action.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    /// The tree after applying every applicable action.
    pub tree: FolderNode,
    /// One outcome per action; skipped actions are reported as failures.
    pub report: ApplicationResult,
}

/// Apply `diff` to a copy of `current`.
///
/// Actions run in list order and each sees the effects of the ones before
/// it. Actions that cannot apply to the snapshot leave the tree unchanged
/// and are reported as skipped, with one exception: a `move` whose target
/// folder does not exist leaves the entity detached, so it disappears
/// from the projection.
pub fn project(current: &FolderNode, diff: &DiffList) -> Projection {
    let mut arena = TreeArena::from_tree(current);
    let mut table = ResolutionTable::new();
    let mut outcomes = Vec::with_capacity(diff.len());

    for (index, action) in diff.iter().enumerate() {
        table.declare(action);
        let outcome = match table.apply(action) {
            Ok(resolved) => apply_one(&mut arena, &mut table, index, action, &resolved),
            Err(reference) => Err(format!("Unresolved placeholder reference: {reference}")),
        };
        let outcome = outcome.unwrap_or_else(|reason| {
            debug!(
                index,
                action_type = %action.action_type(),
                reason = %reason,
                "Action skipped in projection"
            );
            table.fail(action);
            ActionOutcome::failed(index, action, reason, None)
        });
        outcomes.push(outcome);
    }

    Projection {
        tree: arena.into_tree(),
        report: build_result(outcomes),
    }
}

/// Apply one resolved action. `original` is echoed into the outcome.
fn apply_one(
    arena: &mut TreeArena,
    table: &mut ResolutionTable,
    index: usize,
    original: &Action,
    action: &Action,
) -> Result<ActionOutcome, String> {
    match action.action_type() {
        ActionType::Rename => {
            let id = action.entity_id().unwrap_or_default();
            let name = action.new_name().unwrap_or_default();
            let parent = editable(arena, id)?;
            arena.rename(id, name);
            arena.refresh_description(id);
            if !arena.is_folder(id) {
                arena.refresh_description(&parent);
            }
            Ok(ActionOutcome::succeeded(index, original))
        }
        ActionType::Move => {
            let id = action.entity_id().unwrap_or_default();
            let target = action.target_parent_id().unwrap_or_default();
            editable(arena, id)?;
            if arena.is_folder(id) && arena.is_within(target, id) {
                return Err(format!(
                    "Cannot move folder {id} into itself or its descendant {target}"
                ));
            }

            let is_file = !arena.is_folder(id);
            let old_parent = arena.detach(id);
            if is_file {
                if let Some(old_parent) = &old_parent {
                    arena.refresh_description(old_parent);
                }
            }

            if !arena.attach(id, target) {
                let removed = arena.remove_subtree(id);
                debug!(entity_id = id, target, removed, "Move target missing; entity detached");
                return Err(format!(
                    "Target folder not found in snapshot: {target}; {id} was detached"
                ));
            }
            if is_file {
                arena.refresh_description(target);
            }
            Ok(ActionOutcome::succeeded(index, original))
        }
        ActionType::CreateFolder => {
            let parent = action.target_parent_id().unwrap_or_default();
            let name = action.new_name().unwrap_or_default();
            if !arena.is_folder(parent) {
                return Err(format!("Parent folder not found in snapshot: {parent}"));
            }

            let id = match action.placeholder_id() {
                Some(placeholder) if !arena.contains(placeholder) => placeholder.to_string(),
                _ => synthesize_id(arena),
            };
            arena.insert_folder(&id, name, parent);
            table.resolve(original, id.clone());
            Ok(ActionOutcome::created(index, original, id))
        }
    }
}

/// Check that `id` exists and is not the root. Returns its parent id.
fn editable(arena: &TreeArena, id: &str) -> Result<String, String> {
    let node = arena
        .get(id)
        .ok_or_else(|| format!("Entity not found in snapshot: {id}"))?;
    node.parent_id
        .clone()
        .ok_or_else(|| format!("Root folder cannot be renamed or moved: {id}"))
}

/// `folder_` followed by 8 hex digits, unique within the arena.
fn synthesize_id(arena: &TreeArena) -> String {
    loop {
        let hex = Uuid::new_v4().simple().to_string();
        let id = format!("folder_{}", &hex[..8]);
        if !arena.contains(&id) {
            return id;
        }
    }
}
