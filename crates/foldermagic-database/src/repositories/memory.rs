//! In-memory structure record store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use foldermagic_core::error::AppError;
use foldermagic_core::result::AppResult;
use foldermagic_entity::action::DiffList;
use foldermagic_entity::structure::StructureRecord;
use foldermagic_entity::tree::FolderNode;

use super::StructureStore;

/// Structure records held in a concurrent map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStructureRepository {
    records: Arc<DashMap<String, StructureRecord>>,
}

impl InMemoryStructureRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl StructureStore for InMemoryStructureRepository {
    fn backend(&self) -> &str {
        "memory"
    }

    async fn find(&self, user_key: &str) -> AppResult<Option<StructureRecord>> {
        Ok(self.records.get(user_key).map(|r| r.value().clone()))
    }

    async fn upsert_current(
        &self,
        user_key: &str,
        current: &FolderNode,
    ) -> AppResult<StructureRecord> {
        let record = StructureRecord::initialized(user_key, current.clone());
        self.records.insert(user_key.to_string(), record.clone());
        Ok(record)
    }

    async fn set_proposed(
        &self,
        user_key: &str,
        proposed: &FolderNode,
        diff: &DiffList,
    ) -> AppResult<StructureRecord> {
        let mut entry = self.records.get_mut(user_key).ok_or_else(|| {
            AppError::not_found(format!("No structure record for user '{user_key}'"))
        })?;
        let record = entry.value_mut();
        record.proposed = Some(proposed.clone());
        record.diff = Some(diff.clone());
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn delete(&self, user_key: &str) -> AppResult<bool> {
        Ok(self.records.remove(user_key).is_some())
    }
}
