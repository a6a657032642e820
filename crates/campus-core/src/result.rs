//! Convenience result type alias for Campus.

use crate::error::AppError;

/// A specialized `Result` type for infrastructure-level Campus operations.
pub type AppResult<T> = Result<T, AppError>;
