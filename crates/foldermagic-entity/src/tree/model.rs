//! Folder and file nodes of a structure snapshot.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use foldermagic_core::error::AppError;
use foldermagic_core::result::AppResult;

use super::description::{describe_file, describe_folder};

/// A file leaf in a structure snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    /// Remote identifier.
    pub id: String,
    /// File name.
    pub name: String,
    /// Identifier of the containing folder.
    pub parent_id: Option<String>,
    /// Description derived from the name.
    #[serde(default)]
    pub description: Option<String>,
}

impl FileNode {
    /// Create a file node with its derived description.
    pub fn new(id: impl Into<String>, name: impl Into<String>, parent_id: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            description: Some(describe_file(&name)),
            name,
            parent_id: Some(parent_id.into()),
        }
    }

    /// Recompute the description from the current name.
    pub fn refresh_description(&mut self) {
        self.description = Some(describe_file(&self.name));
    }
}

/// A folder with its immediate children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderNode {
    /// Remote identifier.
    pub id: String,
    /// Folder name.
    pub name: String,
    /// Identifier of the containing folder (`None` only for a root).
    pub parent_id: Option<String>,
    /// Description derived from the name and the immediate files.
    #[serde(default)]
    pub description: Option<String>,
    /// Child folders.
    #[serde(default)]
    pub children_folders: Vec<FolderNode>,
    /// Child files.
    #[serde(default)]
    pub files: Vec<FileNode>,
}

impl FolderNode {
    /// Create an empty folder with its derived description.
    pub fn new(id: impl Into<String>, name: impl Into<String>, parent_id: Option<String>) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            description: Some(describe_folder(&name, std::iter::empty())),
            name,
            parent_id,
            children_folders: Vec::new(),
            files: Vec::new(),
        }
    }

    /// Create an empty root folder.
    pub fn root(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, None)
    }

    /// Builder-style helper: append a child folder.
    pub fn with_folder(mut self, folder: FolderNode) -> Self {
        self.children_folders.push(folder);
        self.refresh_description();
        self
    }

    /// Builder-style helper: append a child file.
    pub fn with_file(mut self, file: FileNode) -> Self {
        self.files.push(file);
        self.refresh_description();
        self
    }

    /// Recompute this folder's description from its name and immediate files.
    pub fn refresh_description(&mut self) {
        self.description = Some(describe_folder(
            &self.name,
            self.files.iter().map(|f| f.name.as_str()),
        ));
    }

    /// Recompute the descriptions of every node in the tree.
    pub fn refresh_all_descriptions(&mut self) {
        let mut stack: Vec<&mut FolderNode> = vec![self];
        while let Some(folder) = stack.pop() {
            for file in &mut folder.files {
                file.refresh_description();
            }
            folder.refresh_description();
            stack.extend(folder.children_folders.iter_mut());
        }
    }

    /// Find a folder (including this one) by id.
    pub fn find_folder(&self, id: &str) -> Option<&FolderNode> {
        self.folders().find(|f| f.id == id)
    }

    /// Find a file anywhere in the tree by id.
    pub fn find_file(&self, id: &str) -> Option<&FileNode> {
        self.folders()
            .flat_map(|f| f.files.iter())
            .find(|file| file.id == id)
    }

    /// Whether any node in the tree has this id.
    pub fn contains(&self, id: &str) -> bool {
        self.find_folder(id).is_some() || self.find_file(id).is_some()
    }

    /// Total number of folders and files, including this folder.
    pub fn node_count(&self) -> usize {
        self.folders().map(|f| 1 + f.files.len()).sum()
    }

    /// Depth-first iterator over this folder and all descendant folders.
    pub fn folders(&self) -> impl Iterator<Item = &FolderNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let folder = stack.pop()?;
            stack.extend(folder.children_folders.iter().rev());
            Some(folder)
        })
    }

    /// Check the snapshot invariants: ids are non-blank and unique, and
    /// every child's `parent_id` names the folder that contains it.
    pub fn validate(&self) -> AppResult<()> {
        let mut seen = HashSet::new();
        for folder in self.folders() {
            check_id(&folder.id, &mut seen)?;
            let children = folder
                .children_folders
                .iter()
                .map(|c| (c.id.as_str(), c.parent_id.as_deref()))
                .chain(
                    folder
                        .files
                        .iter()
                        .map(|f| (f.id.as_str(), f.parent_id.as_deref())),
                );
            for (child_id, parent_id) in children {
                if parent_id != Some(folder.id.as_str()) {
                    return Err(AppError::validation(format!(
                        "Node '{child_id}' is listed under folder '{}' but has parent_id {:?}",
                        folder.id, parent_id
                    )));
                }
            }
            for file in &folder.files {
                check_id(&file.id, &mut seen)?;
            }
        }
        Ok(())
    }
}

fn check_id<'a>(id: &'a str, seen: &mut HashSet<&'a str>) -> AppResult<()> {
    if id.trim().is_empty() {
        return Err(AppError::validation("Tree contains a node with a blank id"));
    }
    if !seen.insert(id) {
        return Err(AppError::validation(format!(
            "Tree contains duplicate id '{id}'"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FolderNode {
        FolderNode::root("root", "My Drive")
            .with_file(FileNode::new("f1", "a.txt", "root"))
            .with_folder(
                FolderNode::new("g", "Docs", Some("root".into()))
                    .with_file(FileNode::new("f2", "spec.pdf", "g")),
            )
    }

    #[test]
    fn test_find_nodes() {
        let tree = sample();
        assert_eq!(tree.find_folder("g").map(|f| f.name.as_str()), Some("Docs"));
        assert_eq!(tree.find_file("f2").map(|f| f.name.as_str()), Some("spec.pdf"));
        assert!(tree.contains("root"));
        assert!(!tree.contains("nope"));
        assert_eq!(tree.node_count(), 4);
    }

    #[test]
    fn test_builder_keeps_description_current() {
        let tree = sample();
        assert_eq!(
            tree.description.as_deref(),
            Some("Folder name: My Drive; Files: a.txt (Text file).")
        );
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let tree = sample().with_file(FileNode::new("g", "dup.txt", "root"));
        assert!(tree.validate().is_err());
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_wrong_parent() {
        let tree = FolderNode::root("root", "r").with_file(FileNode::new("f", "x.txt", "elsewhere"));
        let err = tree.validate().unwrap_err();
        assert!(err.message.contains("elsewhere"));
    }

    #[test]
    fn test_deserialize_without_children() {
        let tree: FolderNode =
            serde_json::from_str(r#"{"id":"root","name":"r","parent_id":null}"#).unwrap();
        assert!(tree.children_folders.is_empty());
        assert!(tree.files.is_empty());
    }
}
