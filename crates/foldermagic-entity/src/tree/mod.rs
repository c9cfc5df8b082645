//! Folder tree snapshots.

pub mod description;
pub mod model;

pub use model::{FileNode, FolderNode};
