//! Remote store configuration.

use serde::{Deserialize, Serialize};

/// Top-level remote store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Provider type: `"memory"` or `"drive"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Drive REST API settings.
    #[serde(default)]
    pub drive: DriveConfig,
    /// In-process store settings.
    #[serde(default)]
    pub memory: MemoryRemoteConfig,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            drive: DriveConfig::default(),
            memory: MemoryRemoteConfig::default(),
        }
    }
}

/// Drive REST API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveConfig {
    /// Base URL of the files API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// OAuth bearer token supplied by the session layer.
    #[serde(default)]
    pub access_token: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Sub-requests of one group executed concurrently.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            access_token: String::new(),
            timeout_seconds: default_timeout(),
            max_concurrency: default_max_concurrency(),
        }
    }
}

/// In-process remote store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryRemoteConfig {
    /// Identifier of the root folder.
    #[serde(default = "default_root_id")]
    pub root_id: String,
    /// Display name of the root folder.
    #[serde(default = "default_root_name")]
    pub root_name: String,
    /// Optional JSON folder tree used to seed the store on startup.
    #[serde(default)]
    pub seed_path: Option<String>,
}

impl Default for MemoryRemoteConfig {
    fn default() -> Self {
        Self {
            root_id: default_root_id(),
            root_name: default_root_name(),
            seed_path: None,
        }
    }
}

fn default_provider() -> String {
    "memory".to_string()
}

fn default_base_url() -> String {
    "https://www.googleapis.com/drive/v3".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_max_concurrency() -> usize {
    10
}

fn default_root_id() -> String {
    "root".to_string()
}

fn default_root_name() -> String {
    "My Drive".to_string()
}
