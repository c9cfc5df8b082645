//! # foldermagic-service
//!
//! The diff-list application engine and the services built on it:
//!
//! - [`diff`]: batched, order-preserving execution of a diff list against
//!   a remote store, with per-action outcomes
//! - [`projection`]: the same diff list applied to an in-memory snapshot
//! - [`structure`]: the per-user current/proposed/diff lifecycle
//! - [`snapshot`]: capturing a folder tree from a remote store
//! - [`tools`]: JSON payloads exposed to the assistant
//!
//! Services take their collaborators as `Arc` references at construction.

pub mod diff;
pub mod projection;
pub mod snapshot;
pub mod structure;
pub mod tools;

pub use diff::BatchDispatcher;
pub use projection::{Projection, project};
pub use snapshot::SnapshotService;
pub use structure::{StructureService, StructureUpdate};
pub use tools::AssistantTools;
