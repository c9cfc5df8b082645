//! In-process remote store.
//!
//! Behaves like the remote hierarchical store closely enough for the engine:
//! entries have ids, names, a kind, and a parent set; grouped requests are
//! recorded so callers can inspect how work was chunked.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;
use uuid::Uuid;

use foldermagic_core::config::remote::MemoryRemoteConfig;
use foldermagic_core::error::{AppError, ErrorKind};
use foldermagic_core::result::AppResult;
use foldermagic_core::traits::remote::{
    BatchRequest, BatchResponse, RemoteEntryKind, RemoteError, RemoteMetadata, RemoteResponse,
    RemoteStore, UpdatePatch,
};
use foldermagic_core::types::ActionType;
use foldermagic_entity::tree::FolderNode;

/// Order in which a grouped request's sub-requests are executed and answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompletionOrder {
    /// Submission order.
    #[default]
    InOrder,
    /// Reverse submission order.
    Reversed,
}

/// In-memory remote store provider.
#[derive(Debug, Clone)]
pub struct MemoryRemoteStore {
    /// Entries by id.
    entries: Arc<RwLock<HashMap<String, RemoteMetadata>>>,
    /// Identifier of the root folder.
    root_id: String,
    /// Sizes of the grouped requests received, in arrival order.
    batch_log: Arc<Mutex<Vec<usize>>>,
    /// One-shot failure returned by the next grouped request.
    next_batch_failure: Arc<Mutex<Option<RemoteError>>>,
    /// Execution/answer order of grouped sub-requests.
    completion_order: CompletionOrder,
    /// Action types this store refuses.
    unsupported: HashSet<ActionType>,
    /// Whether the client counts as authenticated.
    ready: bool,
}

impl MemoryRemoteStore {
    /// Create a store containing only a root folder.
    pub fn new(root_id: impl Into<String>, root_name: impl Into<String>) -> Self {
        let root_id = root_id.into();
        let mut entries = HashMap::new();
        entries.insert(
            root_id.clone(),
            RemoteMetadata {
                id: root_id.clone(),
                name: root_name.into(),
                kind: RemoteEntryKind::Folder,
                parents: Vec::new(),
            },
        );

        Self {
            entries: Arc::new(RwLock::new(entries)),
            root_id,
            batch_log: Arc::new(Mutex::new(Vec::new())),
            next_batch_failure: Arc::new(Mutex::new(None)),
            completion_order: CompletionOrder::default(),
            unsupported: HashSet::new(),
            ready: true,
        }
    }

    /// Create a store from configuration, seeding it from `seed_path` if set.
    pub async fn from_config(config: &MemoryRemoteConfig) -> AppResult<Self> {
        match &config.seed_path {
            Some(path) => {
                let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
                    AppError::with_source(
                        ErrorKind::Configuration,
                        format!("Failed to read remote seed file: {path}"),
                        e,
                    )
                })?;
                let tree: FolderNode = serde_json::from_str(&raw)?;
                tree.validate()?;
                Ok(Self::from_tree(&tree).await)
            }
            None => Ok(Self::new(&config.root_id, &config.root_name)),
        }
    }

    /// Create a store whose contents mirror a folder tree.
    pub async fn from_tree(tree: &FolderNode) -> Self {
        let store = Self::new(&tree.id, &tree.name);
        {
            let mut entries = store.entries.write().await;
            for folder in tree.folders() {
                for child in &folder.children_folders {
                    entries.insert(
                        child.id.clone(),
                        RemoteMetadata {
                            id: child.id.clone(),
                            name: child.name.clone(),
                            kind: RemoteEntryKind::Folder,
                            parents: vec![folder.id.clone()],
                        },
                    );
                }
                for file in &folder.files {
                    entries.insert(
                        file.id.clone(),
                        RemoteMetadata {
                            id: file.id.clone(),
                            name: file.name.clone(),
                            kind: RemoteEntryKind::File,
                            parents: vec![folder.id.clone()],
                        },
                    );
                }
            }
        }
        store
    }

    /// A store whose client is not authenticated.
    pub fn disconnected(mut self) -> Self {
        self.ready = false;
        self
    }

    /// Set the execution/answer order of grouped requests.
    pub fn with_completion_order(mut self, order: CompletionOrder) -> Self {
        self.completion_order = order;
        self
    }

    /// Refuse actions of the given type.
    pub fn without_support_for(mut self, action_type: ActionType) -> Self {
        self.unsupported.insert(action_type);
        self
    }

    /// Identifier of the root folder.
    pub fn root_id(&self) -> &str {
        &self.root_id
    }

    /// Insert a folder directly.
    pub async fn insert_folder(&self, id: &str, name: &str, parent_id: &str) {
        self.insert(id, name, parent_id, RemoteEntryKind::Folder).await;
    }

    /// Insert a file directly.
    pub async fn insert_file(&self, id: &str, name: &str, parent_id: &str) {
        self.insert(id, name, parent_id, RemoteEntryKind::File).await;
    }

    async fn insert(&self, id: &str, name: &str, parent_id: &str, kind: RemoteEntryKind) {
        self.entries.write().await.insert(
            id.to_string(),
            RemoteMetadata {
                id: id.to_string(),
                name: name.to_string(),
                kind,
                parents: vec![parent_id.to_string()],
            },
        );
    }

    /// Make the next grouped request fail as a whole.
    pub async fn fail_next_batch(&self, err: RemoteError) {
        *self.next_batch_failure.lock().await = Some(err);
    }

    /// Sizes of the grouped requests received so far.
    pub async fn batch_sizes(&self) -> Vec<usize> {
        self.batch_log.lock().await.clone()
    }

    /// Whether `candidate` is `folder_id` or lies beneath it.
    fn is_within(entries: &HashMap<String, RemoteMetadata>, candidate: &str, folder_id: &str) -> bool {
        let mut stack = vec![candidate.to_string()];
        let mut visited = HashSet::new();
        while let Some(id) = stack.pop() {
            if id == folder_id {
                return true;
            }
            if !visited.insert(id.clone()) {
                continue;
            }
            if let Some(entry) = entries.get(&id) {
                stack.extend(entry.parents.iter().cloned());
            }
        }
        false
    }

    fn require_folder<'a>(
        entries: &'a HashMap<String, RemoteMetadata>,
        id: &str,
    ) -> Result<&'a RemoteMetadata, RemoteError> {
        match entries.get(id) {
            Some(entry) if entry.is_folder() => Ok(entry),
            _ => Err(RemoteError::not_found(format!("Folder not found: {id}"))),
        }
    }
}

#[async_trait]
impl RemoteStore for MemoryRemoteStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn ensure_ready(&self) -> AppResult<()> {
        if self.ready {
            Ok(())
        } else {
            Err(AppError::external_service(
                "In-memory remote store is not connected",
            ))
        }
    }

    fn supports(&self, action_type: ActionType) -> bool {
        !self.unsupported.contains(&action_type)
    }

    async fn get_metadata(&self, id: &str) -> Result<RemoteMetadata, RemoteError> {
        self.entries
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| RemoteError::not_found(format!("File not found: {id}")))
    }

    async fn list_children(&self, parent_id: &str) -> Result<Vec<RemoteMetadata>, RemoteError> {
        let entries = self.entries.read().await;
        Self::require_folder(&entries, parent_id)?;

        let mut children: Vec<RemoteMetadata> = entries
            .values()
            .filter(|e| e.parents.iter().any(|p| p == parent_id))
            .cloned()
            .collect();
        children.sort_by(|a, b| {
            b.is_folder()
                .cmp(&a.is_folder())
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(children)
    }

    async fn create(&self, parent_id: &str, name: &str) -> Result<String, RemoteError> {
        if name.trim().is_empty() {
            return Err(RemoteError::from_status(400, "Folder name cannot be empty"));
        }

        let mut entries = self.entries.write().await;
        Self::require_folder(&entries, parent_id)?;

        let id = Uuid::new_v4().simple().to_string();
        entries.insert(
            id.clone(),
            RemoteMetadata {
                id: id.clone(),
                name: name.to_string(),
                kind: RemoteEntryKind::Folder,
                parents: vec![parent_id.to_string()],
            },
        );
        debug!(folder_id = %id, parent_id, name, "Created folder");
        Ok(id)
    }

    async fn update(&self, id: &str, patch: &UpdatePatch) -> Result<RemoteResponse, RemoteError> {
        let mut entries = self.entries.write().await;
        let entry = entries
            .get(id)
            .ok_or_else(|| RemoteError::not_found(format!("File not found: {id}")))?;

        if id == self.root_id {
            return Err(RemoteError::permission_denied(
                "The root folder cannot be modified",
            ));
        }

        if let Some(new_parent) = &patch.add_parent {
            Self::require_folder(&entries, new_parent)?;
            if entry.is_folder() && Self::is_within(&entries, new_parent, id) {
                return Err(RemoteError::from_status(
                    400,
                    format!("Cannot move folder {id} into its own subtree"),
                ));
            }
        }

        if let Some(name) = &patch.name {
            if name.trim().is_empty() {
                return Err(RemoteError::from_status(400, "Name cannot be empty"));
            }
        }

        let entry = entries
            .get_mut(id)
            .ok_or_else(|| RemoteError::not_found(format!("File not found: {id}")))?;
        if let Some(name) = &patch.name {
            entry.name = name.clone();
        }
        entry.parents.retain(|p| !patch.remove_parents.contains(p));
        if let Some(new_parent) = &patch.add_parent {
            if !entry.parents.contains(new_parent) {
                entry.parents.push(new_parent.clone());
            }
        }

        Ok(RemoteResponse { id: id.to_string() })
    }

    async fn execute_batch(
        &self,
        mut requests: Vec<BatchRequest>,
    ) -> Result<Vec<BatchResponse>, RemoteError> {
        self.batch_log.lock().await.push(requests.len());

        if let Some(err) = self.next_batch_failure.lock().await.take() {
            return Err(err);
        }

        if self.completion_order == CompletionOrder::Reversed {
            requests.reverse();
        }

        let mut responses = Vec::with_capacity(requests.len());
        for BatchRequest { tag, request } in requests {
            let result = self.execute(&request).await;
            responses.push(BatchResponse { tag, result });
        }
        Ok(responses)
    }
}
