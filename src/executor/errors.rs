//! # Search Errors
//!
//! The single closed error channel returned by query execution. Errors from
//! the authorization gate, the compiler and the store are funneled into one
//! of these kinds; nothing escapes raw.

use thiserror::Error;

use crate::auth::AuthError;
use crate::compiler::CompileError;

/// Result type for executor operations
pub type ExecResult<T> = Result<T, SearchError>;

/// Query execution errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    // ==================
    // Policy Errors
    // ==================
    /// Table absent from the registry
    #[error("Unknown table: {table}")]
    UnknownTable { table: String },

    /// Table excluded by the caller's allowlist
    #[error("Table not allowed: {table}")]
    TableNotAllowed { table: String },

    /// Column not in the table's searchable set
    #[error("Column '{column}' is not searchable on table {table}")]
    ColumnNotSearchable { table: String, column: String },

    // ==================
    // Compile Errors
    // ==================
    /// Operator used without the bound column it requires
    #[error("Operator '{operator}' requires a bound column")]
    MissingColumn { operator: &'static str },

    /// Expression variant the compiler does not handle
    #[error("Unsupported expression: {0}")]
    UnsupportedExpression(String),

    // ==================
    // Execution Errors
    // ==================
    /// The data store failed
    #[error("Query against {table} failed: {message}")]
    QueryExecutionError { table: String, message: String },

    /// A nested clause returned more identifiers than allowed
    #[error("Subquery on {table} exceeded {limit} identifiers")]
    SubqueryLimitExceeded { table: String, limit: usize },

    /// Execution did not finish within the configured timeout
    #[error("Query exceeded deadline of {timeout_ms}ms")]
    DeadlineExceeded { timeout_ms: u64 },

    /// Anything else
    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

impl SearchError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            SearchError::UnknownTable { .. } => "UNKNOWN_TABLE",
            SearchError::TableNotAllowed { .. } => "TABLE_NOT_ALLOWED",
            SearchError::ColumnNotSearchable { .. } => "COLUMN_NOT_SEARCHABLE",
            SearchError::MissingColumn { .. } => "MISSING_COLUMN",
            SearchError::UnsupportedExpression(_) => "UNSUPPORTED_EXPRESSION",
            SearchError::QueryExecutionError { .. } => "QUERY_EXECUTION_ERROR",
            SearchError::SubqueryLimitExceeded { .. } => "SUBQUERY_LIMIT_EXCEEDED",
            SearchError::DeadlineExceeded { .. } => "DEADLINE_EXCEEDED",
            SearchError::UnexpectedError(_) => "UNEXPECTED_ERROR",
        }
    }

    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request
            SearchError::UnknownTable { .. } => 400,
            SearchError::ColumnNotSearchable { .. } => 400,
            SearchError::MissingColumn { .. } => 400,
            SearchError::UnsupportedExpression(_) => 400,
            SearchError::SubqueryLimitExceeded { .. } => 400,

            // 403 Forbidden
            SearchError::TableNotAllowed { .. } => 403,

            // 5xx
            SearchError::QueryExecutionError { .. } => 502,
            SearchError::DeadlineExceeded { .. } => 504,
            SearchError::UnexpectedError(_) => 500,
        }
    }

    /// Returns whether the caller's request caused this error
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

impl From<AuthError> for SearchError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::UnknownTable { table } => SearchError::UnknownTable { table },
            AuthError::TableNotAllowed { table } => SearchError::TableNotAllowed { table },
            AuthError::ColumnNotSearchable { table, column } => {
                SearchError::ColumnNotSearchable { table, column }
            }
        }
    }
}

impl From<CompileError> for SearchError {
    fn from(err: CompileError) -> Self {
        match err {
            CompileError::MissingColumn { operator } => SearchError::MissingColumn { operator },
            CompileError::UnsupportedExpression(tag) => SearchError::UnsupportedExpression(tag),
            CompileError::Subquery(inner) => *inner,
            other @ CompileError::InvalidPattern { .. } => {
                SearchError::UnexpectedError(other.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_errors_keep_their_kind() {
        let err: SearchError = AuthError::ColumnNotSearchable {
            table: "profiles".into(),
            column: "display_name".into(),
        }
        .into();
        assert_eq!(err.code(), "COLUMN_NOT_SEARCHABLE");
        assert!(err.is_client_error());
    }

    #[test]
    fn test_subquery_error_is_flattened() {
        let inner = SearchError::QueryExecutionError {
            table: "packs".into(),
            message: "timeout".into(),
        };
        let err: SearchError = CompileError::Subquery(Box::new(inner.clone())).into();
        assert_eq!(err, inner);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            SearchError::TableNotAllowed {
                table: "x".into()
            }
            .status_code(),
            403
        );
        assert_eq!(SearchError::DeadlineExceeded { timeout_ms: 5 }.status_code(), 504);
        assert!(!SearchError::UnexpectedError("boom".into()).is_client_error());
    }

    #[test]
    fn test_error_display() {
        let err = SearchError::QueryExecutionError {
            table: "profiles".into(),
            message: "connection refused".into(),
        };
        let display = err.to_string();
        assert!(display.contains("profiles"));
        assert!(display.contains("connection refused"));
    }
}
