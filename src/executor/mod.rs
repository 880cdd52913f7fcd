//! Query execution subsystem
//!
//! # Execution Flow
//!
//! 1. Split top-level OR into independent where-clauses
//! 2. Authorize each clause's table and column
//! 3. Compile the condition, resolving nested clauses first
//! 4. Query the store, newest first
//! 5. Concatenate branch results and apply the optional sort
//!
//! # Errors
//!
//! Every failure surfaces as a [`SearchError`]; the first failing clause
//! fails the whole call.

mod config;
mod errors;
mod executor;
mod result;
mod sorter;

pub use config::EngineConfig;
pub use errors::{ExecResult, SearchError};
pub use executor::QueryExecutor;
pub use result::SearchResult;
pub use sorter::ResultSorter;
