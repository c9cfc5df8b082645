//! Per-user structure lifecycle.

pub mod service;

pub use service::{StructureService, StructureUpdate};
