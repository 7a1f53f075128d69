//! Convenience result type alias for GPD.

use crate::error::AppError;

/// A specialized `Result` type for GPD operations.
pub type AppResult<T> = Result<T, AppError>;
