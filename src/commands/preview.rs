//! Offline projection of a diff list onto a snapshot.

use std::path::PathBuf;

use clap::Args;
use serde_json::json;

use foldermagic_core::error::AppError;
use foldermagic_entity::action::DiffList;
use foldermagic_entity::tree::FolderNode;
use foldermagic_service::project;

use crate::output::{self, OutputFormat};

/// Arguments for the preview command
#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Snapshot JSON file (a folder tree)
    #[arg(long)]
    pub current: PathBuf,
    /// Diff list JSON file
    #[arg(long)]
    pub diff: PathBuf,
}

/// Execute the preview command
pub async fn execute(args: &PreviewArgs, format: OutputFormat) -> Result<(), AppError> {
    let current: FolderNode = super::read_json(&args.current).await?;
    current.validate()?;
    let diff: DiffList = super::read_json(&args.diff).await?;

    let projection = project(&current, &diff);

    match format {
        OutputFormat::Json => output::print_json(&json!({
            "tree": projection.tree,
            "report": projection.report,
        })),
        OutputFormat::Table => {
            output::print_tree(&projection.tree, format);
            println!();
            output::print_result(&projection.report, format);
            if projection.report.failed > 0 {
                output::print_warning(&format!(
                    "{} action(s) could not be projected",
                    projection.report.failed
                ));
            }
        }
    }
    Ok(())
}
