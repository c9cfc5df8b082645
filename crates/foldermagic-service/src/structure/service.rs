//! Per-user structure lifecycle: initialize, update, read, delete.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::info;

use foldermagic_core::error::AppError;
use foldermagic_core::result::AppResult;
use foldermagic_database::StructureStore;
use foldermagic_entity::action::{ApplicationResult, DiffList};
use foldermagic_entity::structure::StructureRecord;
use foldermagic_entity::tree::FolderNode;

use crate::projection::project;

/// Result of [`StructureService::update`].
#[derive(Debug, Clone, PartialEq)]
pub struct StructureUpdate {
    /// The record as persisted.
    pub record: StructureRecord,
    /// How each action of the diff projected onto `current`.
    pub report: ApplicationResult,
}

/// Drives the per-user record through its states.
///
/// Every read-modify-write on a user key runs under that key's lock, so
/// concurrent calls for the same user are serialized while different
/// users proceed independently.
#[derive(Debug, Clone)]
pub struct StructureService {
    store: Arc<dyn StructureStore>,
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl StructureService {
    /// Creates a new structure service.
    pub fn new(store: Arc<dyn StructureStore>) -> Self {
        Self {
            store,
            locks: Arc::new(DashMap::new()),
        }
    }

    fn lock_for(&self, user_key: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(user_key.to_string())
            .or_default()
            .value()
            .clone()
    }

    /// Drop the lock entry for `user_key` once no caller holds or awaits it.
    ///
    /// `lock_for` clones under the map's shard lock, so a count of one
    /// inside `remove_if` cannot race with a new caller.
    fn release_lock(&self, user_key: &str, lock: Arc<Mutex<()>>) {
        drop(lock);
        self.locks
            .remove_if(user_key, |_, held| Arc::strong_count(held) == 1);
    }

    /// Store `current` as the confirmed snapshot and drop any pending proposal.
    pub async fn initialize(
        &self,
        user_key: &str,
        current: FolderNode,
    ) -> AppResult<StructureRecord> {
        validate_key(user_key)?;
        current.validate()?;

        let lock = self.lock_for(user_key);
        let record = {
            let _guard = lock.lock().await;
            self.store.upsert_current(user_key, &current).await
        };
        self.release_lock(user_key, lock);

        let record = record?;
        info!(user_key, nodes = current.node_count(), "Structure initialized");
        Ok(record)
    }

    /// Project `diff` onto the stored `current` and persist the proposal.
    ///
    /// Fails with a precondition error, writing nothing, when the user has
    /// no initialized structure.
    pub async fn update(&self, user_key: &str, diff: DiffList) -> AppResult<StructureUpdate> {
        validate_key(user_key)?;

        let lock = self.lock_for(user_key);
        let update = {
            let _guard = lock.lock().await;
            self.project_and_store(user_key, &diff).await
        };
        self.release_lock(user_key, lock);

        let update = update?;
        info!(
            user_key,
            actions = diff.len(),
            applied = update.report.succeeded,
            skipped = update.report.failed,
            "Structure proposal stored"
        );
        Ok(update)
    }

    async fn project_and_store(
        &self,
        user_key: &str,
        diff: &DiffList,
    ) -> AppResult<StructureUpdate> {
        let current = self
            .store
            .find(user_key)
            .await?
            .and_then(|r| r.current)
            .ok_or_else(|| {
                AppError::precondition(format!(
                    "Structure for user '{user_key}' is not initialized"
                ))
            })?;

        let projection = project(&current, diff);
        let record = self
            .store
            .set_proposed(user_key, &projection.tree, diff)
            .await?;
        Ok(StructureUpdate {
            record,
            report: projection.report,
        })
    }

    /// The stored record, or `None` when the user has none.
    pub async fn read(&self, user_key: &str) -> AppResult<Option<StructureRecord>> {
        validate_key(user_key)?;
        self.store.find(user_key).await
    }

    /// Remove the user's record. Returns whether one existed.
    pub async fn delete(&self, user_key: &str) -> AppResult<bool> {
        validate_key(user_key)?;

        let lock = self.lock_for(user_key);
        let removed = {
            let _guard = lock.lock().await;
            self.store.delete(user_key).await
        };
        self.release_lock(user_key, lock);

        let removed = removed?;
        info!(user_key, removed, "Structure deleted");
        Ok(removed)
    }
}

fn validate_key(user_key: &str) -> AppResult<()> {
    if user_key.trim().is_empty() {
        return Err(AppError::validation("User key cannot be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use foldermagic_core::error::ErrorKind;
    use foldermagic_database::repositories::InMemoryStructureRepository;
    use foldermagic_entity::action::Action;
    use foldermagic_entity::structure::StructureState;
    use foldermagic_entity::tree::FileNode;

    use super::*;

    fn service() -> StructureService {
        StructureService::new(Arc::new(InMemoryStructureRepository::new()))
    }

    fn tree() -> FolderNode {
        FolderNode::root("root", "My Drive")
            .with_file(FileNode::new("f1", "a.txt", "root"))
            .with_folder(FolderNode::new("g", "Docs", Some("root".into())))
    }

    #[tokio::test]
    async fn test_update_before_initialize() {
        let service = service();
        let diff = DiffList::new(vec![Action::rename("f1", "b.txt").unwrap()]).unwrap();
        let err = service.update("a@b.c", diff).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Precondition);
        assert!(service.read("a@b.c").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_initialize_update_read() {
        let service = service();
        service.initialize("a@b.c", tree()).await.unwrap();

        let diff = DiffList::new(vec![Action::move_entity("f1", "g").unwrap()]).unwrap();
        let update = service.update("a@b.c", diff.clone()).await.unwrap();
        assert!(update.report.is_complete_success());

        let record = service.read("a@b.c").await.unwrap().unwrap();
        assert_eq!(record.state(), StructureState::Updated);
        assert_eq!(record.current, Some(tree()));
        assert_eq!(record.diff, Some(diff));
        let proposed = record.proposed.unwrap();
        assert_eq!(proposed.find_folder("g").unwrap().files[0].id, "f1");
    }

    #[tokio::test]
    async fn test_initialize_is_idempotent() {
        let service = service();
        let first = service.initialize("a@b.c", tree()).await.unwrap();
        service
            .update(
                "a@b.c",
                DiffList::new(vec![Action::rename("f1", "b.txt").unwrap()]).unwrap(),
            )
            .await
            .unwrap();
        let second = service.initialize("a@b.c", tree()).await.unwrap();

        assert_eq!(second.current, first.current);
        assert_eq!(second.state(), StructureState::Initialized);
        assert!(second.proposed.is_none() && second.diff.is_none());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let service = service();
        service.initialize("a@b.c", tree()).await.unwrap();
        assert!(service.delete("a@b.c").await.unwrap());
        assert!(!service.delete("a@b.c").await.unwrap());
        assert_eq!(service.locks.len(), 0);
    }

    #[tokio::test]
    async fn test_initialize_rejects_invalid_tree() {
        let service = service();
        let bad = tree().with_file(FileNode::new("g", "dup.txt", "root"));
        let err = service.initialize("a@b.c", bad).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_concurrent_updates_for_one_user() {
        let service = service();
        service.initialize("a@b.c", tree()).await.unwrap();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let service = service.clone();
                tokio::spawn(async move {
                    let diff =
                        DiffList::new(vec![Action::rename("f1", format!("v{i}.txt")).unwrap()])
                            .unwrap();
                    service.update("a@b.c", diff).await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(service.locks.len(), 0);

        let record = service.read("a@b.c").await.unwrap().unwrap();
        let proposed_name = record.proposed.unwrap().find_file("f1").unwrap().name.clone();
        let diff_name = record.diff.unwrap().as_slice()[0].new_name().unwrap().to_string();
        assert_eq!(proposed_name, diff_name);
    }
}
