//! Convenience result type alias for FolderMagic.

use crate::error::AppError;

/// A specialized `Result` type for FolderMagic operations.
pub type AppResult<T> = Result<T, AppError>;
