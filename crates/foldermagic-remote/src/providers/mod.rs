//! Remote store provider implementations.

#[cfg(feature = "drive")]
pub mod drive;
#[cfg(feature = "memory")]
pub mod memory;
