//! # Store Errors

use thiserror::Error;

/// Result type for data-store calls
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures reported by a data-store implementation
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Store could not be reached
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Store rejected or failed the query
    #[error("Store error: {0}")]
    Backend(String),

    /// Unexpected internal failure
    #[error("Internal store error: {0}")]
    Internal(String),
}
