//! Capturing folder trees from a remote store.

pub mod service;

pub use service::SnapshotService;
