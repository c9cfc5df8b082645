//! Structure record stores.

pub mod memory;
pub mod structure;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use foldermagic_core::config::database::DatabaseConfig;
use foldermagic_core::error::AppError;
use foldermagic_core::result::AppResult;
use foldermagic_entity::action::DiffList;
use foldermagic_entity::structure::StructureRecord;
use foldermagic_entity::tree::FolderNode;

use crate::connection::DatabasePool;
use crate::migration::run_migrations;

pub use memory::InMemoryStructureRepository;
pub use structure::PgStructureRepository;

/// Persistence of one [`StructureRecord`] per user key.
///
/// Stores only persist; the lifecycle rules live in the service layer.
#[async_trait]
pub trait StructureStore: Send + Sync + fmt::Debug + 'static {
    /// Backend name (e.g. `"memory"`, `"postgres"`).
    fn backend(&self) -> &str;

    /// Load the record for `user_key`.
    async fn find(&self, user_key: &str) -> AppResult<Option<StructureRecord>>;

    /// Create or replace the record with `current` and no pending proposal.
    async fn upsert_current(&self, user_key: &str, current: &FolderNode)
    -> AppResult<StructureRecord>;

    /// Store `proposed` and `diff` together on an existing record.
    ///
    /// Fails with `NotFound` when there is no record for `user_key`.
    async fn set_proposed(
        &self,
        user_key: &str,
        proposed: &FolderNode,
        diff: &DiffList,
    ) -> AppResult<StructureRecord>;

    /// Remove the record. Returns whether a record existed.
    async fn delete(&self, user_key: &str) -> AppResult<bool>;
}

/// Build the structure store selected by `config.provider`.
pub async fn connect_store(config: &DatabaseConfig) -> AppResult<Arc<dyn StructureStore>> {
    match config.provider.as_str() {
        "memory" => {
            info!("Initializing in-memory structure store");
            Ok(Arc::new(InMemoryStructureRepository::new()))
        }
        "postgres" => {
            let pool = DatabasePool::connect(config).await?;
            if config.run_migrations {
                run_migrations(pool.pool()).await?;
            }
            info!("Initializing PostgreSQL structure store");
            Ok(Arc::new(PgStructureRepository::new(pool.into_pool())))
        }
        other => Err(AppError::configuration(format!(
            "Unknown database provider: '{other}'. Supported: memory, postgres"
        ))),
    }
}
