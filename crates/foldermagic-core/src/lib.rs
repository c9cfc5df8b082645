//! # foldermagic-core
//!
//! Core crate for FolderMagic. Contains the unified error system,
//! configuration schemas, the closed set of action types, and the traits
//! through which the engine reaches the remote hierarchical store.
//!
//! This crate has **no** internal dependencies on other FolderMagic crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
