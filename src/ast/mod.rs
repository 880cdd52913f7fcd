//! Search query AST
//!
//! Tagged data structures produced by the query parser (or built directly)
//! and consumed read-only by the executor. No behavior lives here beyond
//! constructors and inspection helpers.

mod expr;
mod literal;
mod query;

pub use expr::{CaseMode, Expression};
pub use literal::Literal;
pub use query::{Query, QueryNode, SortDirection, SortExpr, SortField, WhereClause};
