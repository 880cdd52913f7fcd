//! # Registry Errors

use thiserror::Error;

/// Result type for registry construction
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors raised while building or loading the table registry
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    /// Configuration file could not be read
    #[error("Failed to read table config {path}: {message}")]
    Io { path: String, message: String },

    /// Configuration is not valid JSON for the expected shape
    #[error("Malformed table config {path}: {message}")]
    Parse { path: String, message: String },

    /// Configuration parsed but violates a registry rule
    #[error("Invalid table config: {0}")]
    Invalid(String),
}
