//! Breadth-first capture of a folder tree from a remote store.

use std::collections::VecDeque;
use std::sync::Arc;

use tracing::{debug, info};

use foldermagic_core::config::engine::EngineConfig;
use foldermagic_core::error::AppError;
use foldermagic_core::result::AppResult;
use foldermagic_core::traits::remote::{RemoteEntryKind, RemoteStore};
use foldermagic_entity::tree::FolderNode;

use crate::projection::TreeArena;

/// Builds [`FolderNode`] snapshots from a remote store.
#[derive(Debug, Clone)]
pub struct SnapshotService {
    remote: Arc<dyn RemoteStore>,
    default_depth: u32,
}

impl SnapshotService {
    /// Creates a new snapshot service.
    pub fn new(remote: Arc<dyn RemoteStore>, config: &EngineConfig) -> Self {
        Self {
            remote,
            default_depth: config.snapshot_max_depth,
        }
    }

    /// Capture the tree under `root_id`.
    ///
    /// Folders deeper than `max_depth` (the root is depth 0) are included
    /// without their contents. Any remote error aborts the capture.
    pub async fn capture(&self, root_id: &str, max_depth: Option<u32>) -> AppResult<FolderNode> {
        self.remote.ensure_ready().await?;
        let max_depth = max_depth.unwrap_or(self.default_depth);

        let root = self.remote.get_metadata(root_id).await?;
        if !root.is_folder() {
            return Err(AppError::validation(format!(
                "Snapshot root '{root_id}' is not a folder"
            )));
        }

        let mut arena = TreeArena::with_root(&root.id, &root.name);
        let mut queue = VecDeque::from([(root.id.clone(), 0u32)]);
        let mut listed = 0usize;

        while let Some((folder_id, depth)) = queue.pop_front() {
            if depth >= max_depth {
                continue;
            }
            let children = self.remote.list_children(&folder_id).await?;
            listed += 1;

            for child in children {
                let inserted = match child.kind {
                    RemoteEntryKind::Folder => {
                        arena.insert_folder(&child.id, &child.name, &folder_id)
                    }
                    RemoteEntryKind::File => arena.insert_file(&child.id, &child.name, &folder_id),
                };
                if !inserted {
                    debug!(
                        id = %child.id,
                        parent_id = %folder_id,
                        "Entry already captured under another parent"
                    );
                    continue;
                }
                if child.kind == RemoteEntryKind::Folder {
                    queue.push_back((child.id, depth + 1));
                }
            }
        }

        let mut tree = arena.into_tree();
        tree.refresh_all_descriptions();
        info!(
            root_id,
            max_depth,
            folders_listed = listed,
            nodes = tree.node_count(),
            "Snapshot captured"
        );
        Ok(tree)
    }
}
