//! # Compiler Errors

use thiserror::Error;

use crate::executor::SearchError;

/// Result type for condition compilation
pub type CompileResult<T> = Result<T, CompileError>;

/// Errors raised while lowering an expression tree
#[derive(Debug, Clone, Error)]
pub enum CompileError {
    /// Operator needs a bound column but the clause has none
    #[error("Operator '{operator}' requires a bound column")]
    MissingColumn { operator: &'static str },

    /// Expression variant the compiler does not handle
    #[error("Unsupported expression: {0}")]
    UnsupportedExpression(String),

    /// Wildcard pattern could not be compiled
    #[error("Invalid pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Nested where-clause failed while resolving its identifiers
    #[error("{0}")]
    Subquery(Box<SearchError>),
}
