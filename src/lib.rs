//! querygate - A policy-checked search query engine
//!
//! Takes a search query AST, checks every table and column it touches
//! against a static registry and an optional caller allowlist, compiles the
//! conditions into store-agnostic predicates and runs them against a
//! pluggable [`store::DataStore`].

pub mod ast;
pub mod auth;
pub mod compiler;
pub mod executor;
pub mod named;
pub mod observability;
pub mod registry;
pub mod store;

pub use ast::{Expression, Query, WhereClause};
pub use auth::Allowlist;
pub use executor::{EngineConfig, QueryExecutor, SearchError, SearchResult};
pub use registry::{TableDescriptor, TableRegistry};
pub use store::{DataStore, MemoryStore};
