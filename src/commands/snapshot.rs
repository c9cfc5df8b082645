//! Capture a folder tree from the configured remote store.

use std::path::PathBuf;

use clap::Args;

use foldermagic_core::config::AppConfig;
use foldermagic_core::error::{AppError, ErrorKind};
use foldermagic_service::SnapshotService;

use crate::output::{self, OutputFormat};

/// Arguments for the snapshot command
#[derive(Debug, Args)]
pub struct SnapshotArgs {
    /// Identifier of the folder to start from
    #[arg(long, default_value = "root")]
    pub root: String,
    /// Maximum folder depth to list (root is depth 0)
    #[arg(long)]
    pub depth: Option<u32>,
    /// Write the snapshot JSON to this file instead of printing it
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute the snapshot command
pub async fn execute(
    args: &SnapshotArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let remote = super::connect_remote(config).await?;
    let service = SnapshotService::new(remote, &config.engine);
    let tree = service.capture(&args.root, args.depth).await?;

    match &args.output {
        Some(path) => {
            let json = serde_json::to_string_pretty(&tree).map_err(|e| {
                AppError::with_source(ErrorKind::Serialization, "Failed to encode snapshot", e)
            })?;
            tokio::fs::write(path, json).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Io,
                    format!("Failed to write {}", path.display()),
                    e,
                )
            })?;
            if format == OutputFormat::Table {
                output::print_success(&format!(
                    "Snapshot of {} nodes written to {}",
                    tree.node_count(),
                    path.display()
                ));
            }
        }
        None => output::print_tree(&tree, format),
    }
    Ok(())
}
