//! # Authorization Errors
//!
//! Error types raised by the table/column authorization gate.

use thiserror::Error;

/// Result type for authorization checks
pub type AuthResult<T> = Result<T, AuthError>;

/// Table and column access errors.
///
/// Checks run in a fixed order, so a column error is never reported for a
/// table the caller is not allowed to see.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Table is absent from the registry
    #[error("Unknown table: {table}")]
    UnknownTable { table: String },

    /// Table exists but the caller's allowlist excludes it
    #[error("Table not allowed: {table}")]
    TableNotAllowed { table: String },

    /// Column is not among the table's searchable fields
    #[error("Column '{column}' is not searchable on table {table}")]
    ColumnNotSearchable { table: String, column: String },
}

impl AuthError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::UnknownTable { .. } => "UNKNOWN_TABLE",
            AuthError::TableNotAllowed { .. } => "TABLE_NOT_ALLOWED",
            AuthError::ColumnNotSearchable { .. } => "COLUMN_NOT_SEARCHABLE",
        }
    }

    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::UnknownTable { .. } => 400,
            AuthError::ColumnNotSearchable { .. } => 400,
            AuthError::TableNotAllowed { .. } => 403,
        }
    }

    /// The table the failing check was run against
    pub fn table(&self) -> &str {
        match self {
            AuthError::UnknownTable { table }
            | AuthError::TableNotAllowed { table }
            | AuthError::ColumnNotSearchable { table, .. } => table,
        }
    }
}
