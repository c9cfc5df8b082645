//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section; every section has defaults so an empty file is valid.

pub mod database;
pub mod engine;
pub mod logging;
pub mod remote;

use serde::{Deserialize, Serialize};

use self::database::DatabaseConfig;
use self::engine::EngineConfig;
use self::logging::LoggingConfig;
use self::remote::RemoteConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Diff-list engine settings.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Remote store settings.
    #[serde(default)]
    pub remote: RemoteConfig,
    /// Structure store settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration.
    ///
    /// Merges the file at `path`, an environment-specific overlay
    /// `config/<env>.toml`, and environment variables prefixed with
    /// `FOLDERMAGIC__` (e.g. `FOLDERMAGIC__ENGINE__BATCH_SIZE=50`).
    pub fn load(path: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("FOLDERMAGIC")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_files_yield_defaults() {
        let config = AppConfig::load("does/not/exist", "nowhere").unwrap();
        assert_eq!(config.engine.batch_size, 100);
        assert_eq!(config.remote.provider, "memory");
        assert_eq!(config.database.provider, "memory");
        assert_eq!(config.logging.level, "info");
    }
}
