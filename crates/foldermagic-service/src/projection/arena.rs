//! Flat, id-indexed storage of a folder tree.
//!
//! Edges are kept as id lists on both sides (`parent_id` on the child,
//! ordered child lists on the folder), so detaching and re-attaching a
//! subtree never moves owned data around. All walks use explicit stacks.

use std::collections::HashMap;

use foldermagic_entity::tree::description::{describe_file, describe_folder};
use foldermagic_entity::tree::{FileNode, FolderNode};

/// Kind of an arena node, with the child lists of folders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// A folder and its ordered children.
    Folder {
        /// Child folder ids.
        folders: Vec<String>,
        /// Child file ids.
        files: Vec<String>,
    },
    /// A file.
    File,
}

/// One node of the arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArenaNode {
    pub id: String,
    pub name: String,
    pub parent_id: Option<String>,
    pub description: Option<String>,
    pub kind: NodeKind,
}

impl ArenaNode {
    /// Whether the node is a folder.
    pub fn is_folder(&self) -> bool {
        matches!(self.kind, NodeKind::Folder { .. })
    }
}

/// A folder tree flattened into a map.
#[derive(Debug, Clone)]
pub struct TreeArena {
    root: String,
    nodes: HashMap<String, ArenaNode>,
}

impl TreeArena {
    /// An arena holding only a root folder.
    pub fn with_root(id: impl Into<String>, name: impl Into<String>) -> Self {
        let id = id.into();
        let name = name.into();
        let root = ArenaNode {
            id: id.clone(),
            description: Some(describe_folder(&name, std::iter::empty())),
            name,
            parent_id: None,
            kind: NodeKind::Folder {
                folders: Vec::new(),
                files: Vec::new(),
            },
        };
        let mut nodes = HashMap::new();
        nodes.insert(id.clone(), root);
        Self { root: id, nodes }
    }

    /// Flatten a tree. Descriptions are copied as they are.
    pub fn from_tree(tree: &FolderNode) -> Self {
        let mut nodes = HashMap::with_capacity(tree.node_count());
        let mut stack = vec![tree];

        while let Some(folder) = stack.pop() {
            for file in &folder.files {
                nodes.insert(
                    file.id.clone(),
                    ArenaNode {
                        id: file.id.clone(),
                        name: file.name.clone(),
                        parent_id: Some(folder.id.clone()),
                        description: file.description.clone(),
                        kind: NodeKind::File,
                    },
                );
            }
            nodes.insert(
                folder.id.clone(),
                ArenaNode {
                    id: folder.id.clone(),
                    name: folder.name.clone(),
                    parent_id: folder.parent_id.clone(),
                    description: folder.description.clone(),
                    kind: NodeKind::Folder {
                        folders: folder.children_folders.iter().map(|c| c.id.clone()).collect(),
                        files: folder.files.iter().map(|f| f.id.clone()).collect(),
                    },
                },
            );
            stack.extend(folder.children_folders.iter());
        }

        Self {
            root: tree.id.clone(),
            nodes,
        }
    }

    /// Identifier of the root folder.
    pub fn root_id(&self) -> &str {
        &self.root
    }

    /// Look up a node.
    pub fn get(&self, id: &str) -> Option<&ArenaNode> {
        self.nodes.get(id)
    }

    /// Whether a node with this id is in the tree.
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Whether `id` names a folder.
    pub fn is_folder(&self, id: &str) -> bool {
        self.get(id).is_some_and(ArenaNode::is_folder)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena is empty. Never true while it has a root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `candidate` is `ancestor` or lies beneath it.
    pub fn is_within(&self, candidate: &str, ancestor: &str) -> bool {
        let mut cursor = Some(candidate);
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            cursor = self.get(id).and_then(|n| n.parent_id.as_deref());
        }
        false
    }

    /// Set the name of a node. Returns `false` if it does not exist.
    pub fn rename(&mut self, id: &str, name: &str) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.name = name.to_string();
                true
            }
            None => false,
        }
    }

    /// Unlink a node from its parent's child list and clear its `parent_id`.
    ///
    /// Returns the previous parent id.
    pub fn detach(&mut self, id: &str) -> Option<String> {
        let parent_id = self.nodes.get_mut(id)?.parent_id.take()?;
        if let Some(NodeKind::Folder { folders, files }) =
            self.nodes.get_mut(&parent_id).map(|p| &mut p.kind)
        {
            folders.retain(|c| c != id);
            files.retain(|c| c != id);
        }
        Some(parent_id)
    }

    /// Append a detached node to `parent_id`'s matching child list.
    ///
    /// Returns `false` (and changes nothing) if either node is missing or
    /// the parent is not a folder.
    pub fn attach(&mut self, id: &str, parent_id: &str) -> bool {
        let Some(is_folder) = self.get(id).map(ArenaNode::is_folder) else {
            return false;
        };
        let Some(NodeKind::Folder { folders, files }) =
            self.nodes.get_mut(parent_id).map(|p| &mut p.kind)
        else {
            return false;
        };
        if is_folder {
            folders.push(id.to_string());
        } else {
            files.push(id.to_string());
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.parent_id = Some(parent_id.to_string());
        }
        true
    }

    /// Drop a detached node and everything beneath it.
    pub fn remove_subtree(&mut self, id: &str) -> usize {
        let mut removed = 0;
        let mut stack = vec![id.to_string()];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                removed += 1;
                if let NodeKind::Folder { folders, files } = node.kind {
                    stack.extend(folders);
                    stack.extend(files);
                }
            }
        }
        removed
    }

    /// Add an empty folder under `parent_id`.
    pub fn insert_folder(&mut self, id: &str, name: &str, parent_id: &str) -> bool {
        let kind = NodeKind::Folder {
            folders: Vec::new(),
            files: Vec::new(),
        };
        self.insert(id, name, kind, parent_id)
    }

    /// Add a file under `parent_id`.
    pub fn insert_file(&mut self, id: &str, name: &str, parent_id: &str) -> bool {
        self.insert(id, name, NodeKind::File, parent_id)
    }

    fn insert(&mut self, id: &str, name: &str, kind: NodeKind, parent_id: &str) -> bool {
        if self.contains(id) || !self.is_folder(parent_id) {
            return false;
        }
        self.nodes.insert(
            id.to_string(),
            ArenaNode {
                id: id.to_string(),
                name: name.to_string(),
                parent_id: None,
                description: None,
                kind,
            },
        );
        self.attach(id, parent_id);
        self.refresh_description(id);
        true
    }

    /// Recompute a node's description from its name (and, for folders,
    /// the names of its immediate files).
    pub fn refresh_description(&mut self, id: &str) {
        let description = match self.get(id) {
            Some(ArenaNode {
                name,
                kind: NodeKind::Folder { files, .. },
                ..
            }) => describe_folder(
                name,
                files
                    .iter()
                    .filter_map(|f| self.get(f))
                    .map(|f| f.name.as_str()),
            ),
            Some(ArenaNode { name, .. }) => describe_file(name),
            None => return,
        };
        if let Some(node) = self.nodes.get_mut(id) {
            node.description = Some(description);
        }
    }

    /// Rebuild the nested tree.
    pub fn into_tree(mut self) -> FolderNode {
        // Post-order: every folder is assembled after all of its children.
        let mut order = Vec::new();
        let mut stack = vec![self.root.clone()];
        while let Some(id) = stack.pop() {
            if let Some(NodeKind::Folder { folders, .. }) = self.get(&id).map(|n| &n.kind) {
                stack.extend(folders.iter().cloned());
            }
            order.push(id);
        }

        let mut built: HashMap<String, FolderNode> = HashMap::new();
        for id in order.into_iter().rev() {
            let Some(node) = self.nodes.remove(&id) else {
                continue;
            };
            let NodeKind::Folder { folders, files } = node.kind else {
                continue;
            };
            let files = files
                .iter()
                .filter_map(|f| self.nodes.remove(f))
                .map(|f| FileNode {
                    id: f.id,
                    name: f.name,
                    parent_id: f.parent_id,
                    description: f.description,
                })
                .collect();
            let children_folders = folders.iter().filter_map(|c| built.remove(c)).collect();
            built.insert(
                id,
                FolderNode {
                    id: node.id,
                    name: node.name,
                    parent_id: node.parent_id,
                    description: node.description,
                    children_folders,
                    files,
                },
            );
        }

        built
            .remove(&self.root)
            .unwrap_or_else(|| FolderNode::root(self.root.clone(), String::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FolderNode {
        FolderNode::root("root", "My Drive")
            .with_file(FileNode::new("f1", "a.txt", "root"))
            .with_folder(
                FolderNode::new("g", "Docs", Some("root".into()))
                    .with_folder(FolderNode::new("h", "Old", Some("g".into())))
                    .with_file(FileNode::new("f2", "spec.pdf", "g")),
            )
    }

    #[test]
    fn test_round_trip_preserves_tree() {
        let tree = sample();
        let arena = TreeArena::from_tree(&tree);
        assert_eq!(arena.len(), 5);
        assert_eq!(arena.into_tree(), tree);
    }

    #[test]
    fn test_is_within() {
        let arena = TreeArena::from_tree(&sample());
        assert!(arena.is_within("h", "g"));
        assert!(arena.is_within("g", "g"));
        assert!(!arena.is_within("g", "h"));
    }

    #[test]
    fn test_detach_and_attach() {
        let mut arena = TreeArena::from_tree(&sample());
        assert_eq!(arena.detach("f1").as_deref(), Some("root"));
        assert!(arena.attach("f1", "h"));
        let tree = arena.into_tree();
        assert!(tree.files.is_empty());
        let h = tree.find_folder("h").unwrap();
        assert_eq!(h.files[0].id, "f1");
        assert_eq!(h.files[0].parent_id.as_deref(), Some("h"));
    }

    #[test]
    fn test_remove_subtree() {
        let mut arena = TreeArena::from_tree(&sample());
        arena.detach("g");
        assert_eq!(arena.remove_subtree("g"), 3);
        assert!(!arena.contains("f2"));
        assert_eq!(arena.into_tree().node_count(), 2);
    }

    #[test]
    fn test_insert_rejects_file_parent_and_duplicates() {
        let mut arena = TreeArena::with_root("root", "My Drive");
        assert!(arena.insert_file("f1", "a.txt", "root"));
        assert!(!arena.insert_folder("x", "X", "f1"));
        assert!(!arena.insert_file("f1", "again.txt", "root"));
        assert_eq!(
            arena.get("f1").and_then(|n| n.description.as_deref()),
            Some("File name: a.txt; File type: Text file.")
        );
    }
}
