//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use foldermagic_core::config::engine::EngineConfig;
use foldermagic_core::traits::remote::RemoteStore;
use foldermagic_database::repositories::InMemoryStructureRepository;
use foldermagic_entity::action::{Action, DiffList};
use foldermagic_entity::tree::{FileNode, FolderNode};
use foldermagic_remote::providers::memory::MemoryRemoteStore;
use foldermagic_service::{AssistantTools, BatchDispatcher, SnapshotService, StructureService};

/// Test application context wired entirely in memory
pub struct TestApp {
    /// The remote store behind every service
    pub remote: Arc<MemoryRemoteStore>,
    /// Structure records
    pub store: Arc<InMemoryStructureRepository>,
    /// Remote diff application
    pub dispatcher: BatchDispatcher,
    /// Remote snapshot capture
    pub snapshots: SnapshotService,
    /// Per-user structure lifecycle
    pub structures: Arc<StructureService>,
    /// Assistant tool payloads
    pub tools: AssistantTools,
}

impl TestApp {
    /// Create a test application whose remote mirrors [`sample_tree`]
    pub async fn new() -> Self {
        Self::with_tree(&sample_tree()).await
    }

    /// Create a test application whose remote mirrors `tree`
    pub async fn with_tree(tree: &FolderNode) -> Self {
        let remote = Arc::new(MemoryRemoteStore::from_tree(tree).await);
        let dyn_remote: Arc<dyn RemoteStore> = remote.clone();
        let engine = EngineConfig::default();

        let store = Arc::new(InMemoryStructureRepository::new());
        let structures = Arc::new(StructureService::new(store.clone()));

        Self {
            dispatcher: BatchDispatcher::from_config(dyn_remote.clone(), &engine),
            snapshots: SnapshotService::new(dyn_remote, &engine),
            tools: AssistantTools::new(structures.clone()),
            remote,
            store,
            structures,
        }
    }

    /// Capture the whole remote tree
    pub async fn snapshot(&self) -> FolderNode {
        self.snapshots
            .capture(self.remote.root_id(), None)
            .await
            .expect("Failed to capture snapshot")
    }
}

/// A small drive:
///
/// ```text
/// My Drive/ [root]
///   budget.xlsx [f1]
///   notes.txt [f2]
///   Work/ [w]
///     report.docx [f3]
///     Archive/ [a]
///       old.pdf [f4]
///   Photos/ [p]
///     beach.jpg [f5]
/// ```
pub fn sample_tree() -> FolderNode {
    let mut tree = FolderNode::root("root", "My Drive")
        .with_file(FileNode::new("f1", "budget.xlsx", "root"))
        .with_file(FileNode::new("f2", "notes.txt", "root"))
        .with_folder(
            FolderNode::new("w", "Work", Some("root".into()))
                .with_file(FileNode::new("f3", "report.docx", "w"))
                .with_folder(
                    FolderNode::new("a", "Archive", Some("w".into()))
                        .with_file(FileNode::new("f4", "old.pdf", "a")),
                ),
        )
        .with_folder(
            FolderNode::new("p", "Photos", Some("root".into()))
                .with_file(FileNode::new("f5", "beach.jpg", "p")),
        );
    tree.refresh_all_descriptions();
    tree
}

/// A diff that files `budget.xlsx` into a new `Finance` folder, renames
/// `notes.txt` and moves `Archive` to the top level.
pub fn reorganize_diff() -> DiffList {
    DiffList::new(vec![
        Action::create_folder("root", "Finance")
            .and_then(|a| a.with_placeholder("tmp_finance"))
            .expect("valid action"),
        Action::move_entity("f1", "tmp_finance").expect("valid action"),
        Action::rename("f2", "meeting-notes.txt").expect("valid action"),
        Action::move_entity("a", "root").expect("valid action"),
    ])
    .expect("valid diff")
}

/// Names of the immediate subfolders, sorted
pub fn folder_names(folder: &FolderNode) -> Vec<String> {
    let mut names: Vec<String> = folder
        .children_folders
        .iter()
        .map(|f| f.name.clone())
        .collect();
    names.sort();
    names
}

/// Names of the immediate files, sorted
pub fn file_names(folder: &FolderNode) -> Vec<String> {
    let mut names: Vec<String> = folder.files.iter().map(|f| f.name.clone()).collect();
    names.sort();
    names
}
