//! CLI command definitions and dispatch.

pub mod apply;
pub mod preview;
pub mod snapshot;
pub mod structure;

use std::path::Path;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;

use foldermagic_core::config::AppConfig;
use foldermagic_core::error::{AppError, ErrorKind};
use foldermagic_core::traits::remote::RemoteStore;
use foldermagic_remote::RemoteManager;

use crate::output::OutputFormat;

/// FolderMagic: batched structural edits for remote folder trees
#[derive(Debug, Parser)]
#[command(name = "foldermagic", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Project a diff list onto a snapshot without touching the remote store
    Preview(preview::PreviewArgs),
    /// Apply a diff list to the configured remote store
    Apply(apply::ApplyArgs),
    /// Capture a folder tree from the configured remote store
    Snapshot(snapshot::SnapshotArgs),
    /// Manage per-user structure records
    Structure(structure::StructureArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Preview(args) => preview::execute(args, self.format).await,
            Commands::Apply(args) => apply::execute(args, config, self.format).await,
            Commands::Snapshot(args) => snapshot::execute(args, config, self.format).await,
            Commands::Structure(args) => structure::execute(args, config, self.format).await,
        }
    }
}

/// Helper: read and deserialize a JSON file
pub async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Io,
            format!("Failed to read {}", path.display()),
            e,
        )
    })?;
    serde_json::from_str(&raw).map_err(|e| {
        AppError::with_source(
            ErrorKind::Serialization,
            format!("Invalid JSON in {}: {e}", path.display()),
            e,
        )
    })
}

/// Helper: connect to the configured remote store
pub async fn connect_remote(config: &AppConfig) -> Result<Arc<dyn RemoteStore>, AppError> {
    let manager = RemoteManager::connect(&config.remote).await?;
    Ok(manager.store())
}
