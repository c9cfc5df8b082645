//! Preview of a diff list against an in-memory snapshot.

pub mod arena;
pub mod projector;

pub use arena::TreeArena;
pub use projector::{Projection, project};
