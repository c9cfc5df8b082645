//! Diff-list engine configuration.

use serde::{Deserialize, Serialize};

use crate::traits::remote::MAX_BATCH_SIZE;

/// Tuning for the batch dispatcher and snapshot capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum number of actions per grouped remote request.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Folder depth captured by a snapshot before contents are omitted.
    #[serde(default = "default_snapshot_depth")]
    pub snapshot_max_depth: u32,
}

impl EngineConfig {
    /// Batch size clamped to the remote store's group-request ceiling.
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.clamp(1, MAX_BATCH_SIZE)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            snapshot_max_depth: default_snapshot_depth(),
        }
    }
}

fn default_batch_size() -> usize {
    MAX_BATCH_SIZE
}

fn default_snapshot_depth() -> u32 {
    8
}
