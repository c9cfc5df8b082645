//! # foldermagic-database
//!
//! Persistence of per-user structure records. Two stores implement
//! [`StructureStore`]: a PostgreSQL repository keeping the trees and the
//! diff list in JSONB columns, and an in-memory store for development and
//! tests. [`connect_store`] picks one from configuration.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use repositories::{StructureStore, connect_store};
