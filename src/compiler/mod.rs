//! Condition compiler
//!
//! Lowers where-clause condition trees into store-agnostic predicates.
//!
//! # Lowering rules
//!
//! - `And`/`Or`/`Not` map to conjunction, disjunction and negation
//! - Unbound `Equals`, `Wildcard`, `Fuzzy` and `Exact` fan out across every
//!   searchable field of the table
//! - Range operators and `Exists` require a bound column
//! - `Case` switches case sensitivity for the predicates compiled after it
//! - Nested where-clauses resolve to a concrete identifier set first

mod compiler;
mod errors;
mod pattern;
mod predicate;

pub use compiler::{ConditionCompiler, SubqueryResolver};
pub use errors::{CompileError, CompileResult};
pub use pattern::{contains, fuzzy_matches, levenshtein_within, GlobPattern};
pub use predicate::{Predicate, RangeBound};
