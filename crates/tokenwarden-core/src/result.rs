//! Convenience result type alias for Tokenwarden.

use crate::error::AppError;

/// A specialized `Result` type for Tokenwarden operations.
pub type AppResult<T> = Result<T, AppError>;
