//! Remote application of diff lists.

pub mod aggregate;
pub mod dispatcher;
pub mod resolution;
pub mod translator;

pub use aggregate::build_result;
pub use dispatcher::BatchDispatcher;
pub use resolution::{Resolution, ResolutionTable};
