//! # foldermagic-remote
//!
//! Remote store providers for FolderMagic:
//!
//! - **memory**: an in-process hierarchical store, used for development,
//!   previews against seeded data, and tests
//! - **drive**: a Drive v3 REST client built on [reqwest](https://crates.io/crates/reqwest)
//!
//! The provider is selected at runtime based on configuration.

pub mod manager;
pub mod providers;

pub use manager::RemoteManager;
