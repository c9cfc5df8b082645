//! Table and JSON output formatting for CLI commands.

use serde::Serialize;
use tabled::{Table, Tabled};

use foldermagic_entity::action::ApplicationResult;
use foldermagic_entity::tree::FolderNode;

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// One row of an outcome table
#[derive(Debug, Serialize, Tabled)]
struct OutcomeRow {
    /// Position in the diff list
    index: usize,
    /// Action type
    action: String,
    /// Entity or created folder
    entity: String,
    /// ok / failed
    status: String,
    /// Error message and code
    detail: String,
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize>(value: &T) {
    let json = serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string());
    println!("{}", json);
}

/// Print an application result in the selected format
pub fn print_result(result: &ApplicationResult, format: OutputFormat) {
    if format == OutputFormat::Json {
        print_json(result);
        return;
    }

    if result.outcomes.is_empty() {
        println!("No actions.");
    } else {
        let rows: Vec<OutcomeRow> = result
            .outcomes
            .iter()
            .map(|o| OutcomeRow {
                index: o.index,
                action: o.action_type.to_string(),
                entity: o
                    .new_entity_id
                    .as_deref()
                    .or(o.entity_id.as_deref())
                    .unwrap_or("-")
                    .to_string(),
                status: if o.success { "ok" } else { "failed" }.to_string(),
                detail: match (&o.error_message, &o.error_code) {
                    (Some(msg), Some(code)) => format!("{msg} ({code})"),
                    (Some(msg), None) => msg.clone(),
                    _ => String::new(),
                },
            })
            .collect();
        println!("{}", Table::new(rows));
    }

    print_kv("Total", &result.total.to_string());
    print_kv("Succeeded", &result.succeeded.to_string());
    print_kv("Failed", &result.failed.to_string());
}

/// Print a folder tree in the selected format
pub fn print_tree(tree: &FolderNode, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(tree),
        OutputFormat::Table => print!("{}", render_tree(tree)),
    }
}

/// Indented text rendering of a tree: each folder, then its files, then its subfolders.
pub fn render_tree(tree: &FolderNode) -> String {
    let mut out = String::new();
    let mut stack = vec![(tree, 0usize)];
    while let Some((folder, depth)) = stack.pop() {
        let indent = "  ".repeat(depth);
        out.push_str(&format!("{indent}{}/  [{}]\n", folder.name, folder.id));
        for file in &folder.files {
            out.push_str(&format!("{indent}  {}  [{}]\n", file.name, file.id));
        }
        stack.extend(folder.children_folders.iter().rev().map(|c| (c, depth + 1)));
    }
    out
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {}", msg);
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("⚠ {}", msg);
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {}", msg);
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<24} {}", format!("{}:", key), value);
}
