//! # Data Store Trait
//!
//! The narrow capability the executor needs from a relational store. Kept
//! behind a trait so the engine never depends on a concrete client.

use futures_util::future::BoxFuture;
use serde_json::{Map, Value};

use super::errors::StoreResult;
use crate::ast::SortDirection;
use crate::compiler::Predicate;

/// A returned row: field name to value
pub type Row = Map<String, Value>;

/// Store-level ordering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub direction: SortDirection,
}

impl OrderBy {
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }
}

/// Query capability of the underlying data store
pub trait DataStore: Send + Sync {
    /// Returns the rows of `table` matching `predicate`, projected to
    /// `select` and ordered by `order_by`.
    fn find_matching<'a>(
        &'a self,
        table: &'a str,
        predicate: &'a Predicate,
        select: &'a [String],
        order_by: &'a OrderBy,
    ) -> BoxFuture<'a, StoreResult<Vec<Row>>>;
}
