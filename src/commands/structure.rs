//! Per-user structure record commands.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use tracing::warn;

use foldermagic_core::config::AppConfig;
use foldermagic_core::error::AppError;
use foldermagic_database::connect_store;
use foldermagic_entity::action::DiffList;
use foldermagic_entity::structure::StructureRecord;
use foldermagic_entity::tree::FolderNode;
use foldermagic_service::{SnapshotService, StructureService};

use crate::output::{self, OutputFormat};

const MEMORY_STORE_HINT: &str = "Structure store is in-memory: records are discarded when this \
     command exits. Set database.provider = \"postgres\" to keep them between runs.";

/// Arguments for structure commands
#[derive(Debug, Args)]
pub struct StructureArgs {
    /// Structure subcommand
    #[command(subcommand)]
    pub command: StructureCommand,
}

/// Structure subcommands
#[derive(Debug, Subcommand)]
pub enum StructureCommand {
    /// Store a confirmed snapshot for a user
    Init {
        /// User key (email)
        #[arg(short, long)]
        user: String,
        /// Snapshot JSON file
        #[arg(long, conflicts_with = "from_remote")]
        current: Option<PathBuf>,
        /// Capture the snapshot from the remote store, starting at this folder
        #[arg(long)]
        from_remote: Option<String>,
    },
    /// Project a diff list onto the user's snapshot and store the proposal
    Update {
        /// User key (email)
        #[arg(short, long)]
        user: String,
        /// Diff list JSON file
        #[arg(long)]
        diff: PathBuf,
    },
    /// Show the stored record
    Show {
        /// User key (email)
        #[arg(short, long)]
        user: String,
    },
    /// Delete the stored record
    Delete {
        /// User key (email)
        #[arg(short, long)]
        user: String,
    },
}

/// Execute structure commands
pub async fn execute(
    args: &StructureArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let store = connect_store(&config.database).await?;
    if store.backend() == "memory" {
        warn!("{MEMORY_STORE_HINT}");
        if format == OutputFormat::Table {
            output::print_warning(MEMORY_STORE_HINT);
        }
    }
    let service = StructureService::new(store);

    match &args.command {
        StructureCommand::Init {
            user,
            current,
            from_remote,
        } => {
            let tree = match (current, from_remote) {
                (Some(path), _) => super::read_json::<FolderNode>(path).await?,
                (None, Some(root)) => {
                    let remote = super::connect_remote(config).await?;
                    SnapshotService::new(remote, &config.engine)
                        .capture(root, None)
                        .await?
                }
                (None, None) => {
                    return Err(AppError::validation(
                        "Either --current or --from-remote is required",
                    ));
                }
            };
            let record = service.initialize(user, tree).await?;
            print_record(&record, format);
        }
        StructureCommand::Update { user, diff } => {
            let diff: DiffList = super::read_json(diff).await?;
            let update = service.update(user, diff).await?;
            match format {
                OutputFormat::Json => output::print_json(&serde_json::json!({
                    "record": update.record,
                    "report": update.report,
                })),
                OutputFormat::Table => {
                    print_record(&update.record, format);
                    println!();
                    output::print_result(&update.report, format);
                }
            }
        }
        StructureCommand::Show { user } => match service.read(user).await? {
            Some(record) => print_record(&record, format),
            None => {
                return Err(AppError::not_found(format!(
                    "No structure stored for user '{user}'"
                )));
            }
        },
        StructureCommand::Delete { user } => {
            let removed = service.delete(user).await?;
            match format {
                OutputFormat::Json => {
                    output::print_json(&serde_json::json!({ "user_key": user, "removed": removed }))
                }
                OutputFormat::Table if removed => {
                    output::print_success(&format!("Structure for '{user}' deleted"))
                }
                OutputFormat::Table => {
                    output::print_warning(&format!("No structure stored for '{user}'"))
                }
            }
        }
    }
    Ok(())
}

fn print_record(record: &StructureRecord, format: OutputFormat) {
    if format == OutputFormat::Json {
        output::print_json(record);
        return;
    }

    output::print_kv("User", &record.user_key);
    output::print_kv("State", &format!("{:?}", record.state()).to_lowercase());
    output::print_kv("Updated", &record.updated_at.to_rfc3339());
    if let Some(diff) = &record.diff {
        output::print_kv("Pending actions", &diff.len().to_string());
    }
    if let Some(current) = &record.current {
        println!("\nCurrent:");
        output::print_tree(current, format);
    }
    if let Some(proposed) = &record.proposed {
        println!("\nProposed:");
        output::print_tree(proposed, format);
    }
}
