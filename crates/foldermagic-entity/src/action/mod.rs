//! Structural edit actions and their outcomes.

pub mod list;
pub mod model;
pub mod outcome;

pub use foldermagic_core::types::ActionType;
pub use list::DiffList;
pub use model::Action;
pub use outcome::{ActionOutcome, ApplicationResult};
