//! Remote manager that dispatches to the configured provider.

use std::sync::Arc;

use tracing::info;

use foldermagic_core::config::remote::RemoteConfig;
use foldermagic_core::error::AppError;
use foldermagic_core::result::AppResult;
use foldermagic_core::traits::remote::RemoteStore;

/// Remote manager that wraps the configured remote store.
///
/// The provider is selected at construction time based on configuration.
#[derive(Debug, Clone)]
pub struct RemoteManager {
    inner: Arc<dyn RemoteStore>,
}

impl RemoteManager {
    /// Create a new remote manager from configuration.
    pub async fn connect(config: &RemoteConfig) -> AppResult<Self> {
        let inner: Arc<dyn RemoteStore> = match config.provider.as_str() {
            #[cfg(feature = "memory")]
            "memory" => {
                info!(
                    root_id = %config.memory.root_id,
                    seeded = config.memory.seed_path.is_some(),
                    "Initializing in-memory remote store"
                );
                let store = crate::providers::memory::MemoryRemoteStore::from_config(
                    &config.memory,
                )
                .await?;
                Arc::new(store)
            }
            #[cfg(feature = "drive")]
            "drive" => {
                info!(base_url = %config.drive.base_url, "Initializing Drive remote store");
                let store = crate::providers::drive::DriveRemoteStore::new(&config.drive)?;
                Arc::new(store)
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown remote provider: '{other}'. Supported: memory, drive"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Shared handle to the inner provider.
    pub fn store(&self) -> Arc<dyn RemoteStore> {
        Arc::clone(&self.inner)
    }
}
