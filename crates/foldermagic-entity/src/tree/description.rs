//! Human-readable descriptions derived from node names.
//!
//! File descriptions depend only on the file name. Folder descriptions
//! summarize the folder name and its immediate files; subfolder contents
//! are never included.

use std::path::Path;

/// Map a file name to its type label (`"report.pdf"` → `"PDF document"`).
pub fn file_type_label(file_name: &str) -> String {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    if extension.is_empty() {
        return "Unknown type".to_string();
    }

    let label = match extension.as_str() {
        "pdf" => "PDF document",
        "doc" | "docx" => "Word document",
        "xls" | "xlsx" => "Excel spreadsheet",
        "csv" => "CSV file",
        "ppt" | "pptx" => "PowerPoint deck",
        "txt" => "Text file",
        "md" => "Markdown file",
        "json" => "JSON file",
        other => return format!("{} file", other.to_uppercase()),
    };
    label.to_string()
}

/// Describe a file from its name.
pub fn describe_file(file_name: &str) -> String {
    format!(
        "File name: {}; File type: {}.",
        base_name(file_name),
        file_type_label(file_name)
    )
}

/// Describe a folder from its name and the names of its immediate files.
pub fn describe_folder<'a>(
    folder_name: &str,
    file_names: impl IntoIterator<Item = &'a str>,
) -> String {
    let files: Vec<String> = file_names
        .into_iter()
        .map(|name| format!("{} ({})", base_name(name), file_type_label(name)))
        .collect();

    let formatted = if files.is_empty() {
        "None".to_string()
    } else {
        files.join(", ")
    };

    format!(
        "Folder name: {}; Files: {}.",
        base_name(folder_name),
        formatted
    )
}

fn base_name(name: &str) -> &str {
    Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(name)
}
