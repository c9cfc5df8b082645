//! Apply a diff list to the configured remote store.

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use foldermagic_core::config::AppConfig;
use foldermagic_core::error::AppError;
use foldermagic_entity::action::DiffList;
use foldermagic_service::BatchDispatcher;

use crate::output::{self, OutputFormat};

/// Arguments for the apply command
#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Diff list JSON file
    #[arg(long)]
    pub diff: PathBuf,
    /// Override the configured batch size
    #[arg(long)]
    pub batch_size: Option<usize>,
}

/// Execute the apply command
pub async fn execute(
    args: &ApplyArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let diff: DiffList = super::read_json(&args.diff).await?;
    let remote = super::connect_remote(config).await?;

    let mut dispatcher = BatchDispatcher::from_config(remote, &config.engine);
    if let Some(size) = args.batch_size {
        dispatcher = dispatcher.with_batch_size(size);
    }
    info!(
        actions = diff.len(),
        batch_size = dispatcher.batch_size(),
        "Applying diff list"
    );

    let result = dispatcher.apply(&diff).await?;
    output::print_result(&result, format);

    if format == OutputFormat::Table {
        if result.is_complete_success() {
            output::print_success("All actions applied");
        } else {
            output::print_warning(&format!("{} action(s) failed", result.failed));
        }
    }
    Ok(())
}
