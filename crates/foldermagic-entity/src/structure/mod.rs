//! Per-user structure records.

pub mod model;

pub use model::{StructureRecord, StructureState};
