//! In-process data store
//!
//! Keeps rows per table in memory and evaluates compiled predicates
//! directly. Suitable for tests and small embedded deployments.

use std::collections::HashMap;
use std::sync::RwLock;

use futures_util::future::BoxFuture;
use serde_json::Value;

use super::backend::{DataStore, OrderBy, Row};
use super::errors::{StoreError, StoreResult};
use super::filter::{compare_for_sort, PredicateFilter};
use crate::ast::SortDirection;
use crate::compiler::Predicate;

/// In-memory table store
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Vec<Row>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row. The value must be a JSON object.
    pub fn insert(&self, table: &str, row: Value) -> StoreResult<()> {
        let Value::Object(row) = row else {
            return Err(StoreError::Backend(format!(
                "rows for table '{}' must be JSON objects",
                table
            )));
        };

        let mut tables = self
            .tables
            .write()
            .map_err(|_| StoreError::Internal("Lock poisoned".to_string()))?;
        tables.entry(table.to_lowercase()).or_default().push(row);
        Ok(())
    }

    /// Number of rows stored for a table
    pub fn row_count(&self, table: &str) -> usize {
        self.tables
            .read()
            .map(|tables| tables.get(&table.to_lowercase()).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    fn scan(
        &self,
        table: &str,
        predicate: &Predicate,
        select: &[String],
        order_by: &OrderBy,
    ) -> StoreResult<Vec<Row>> {
        let tables = self
            .tables
            .read()
            .map_err(|_| StoreError::Internal("Lock poisoned".to_string()))?;

        let mut matched: Vec<&Row> = tables
            .get(&table.to_lowercase())
            .map(|rows| {
                rows.iter()
                    .filter(|row| PredicateFilter::matches(row, predicate))
                    .collect()
            })
            .unwrap_or_default();

        // Stable, so insertion order breaks ties
        matched.sort_by(|a, b| {
            let ordering = compare_for_sort(a.get(&order_by.field), b.get(&order_by.field));
            match order_by.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });

        Ok(matched
            .into_iter()
            .map(|row| {
                select
                    .iter()
                    .filter_map(|field| row.get(field).map(|v| (field.clone(), v.clone())))
                    .collect()
            })
            .collect())
    }
}

impl DataStore for MemoryStore {
    fn find_matching<'a>(
        &'a self,
        table: &'a str,
        predicate: &'a Predicate,
        select: &'a [String],
        order_by: &'a OrderBy,
    ) -> BoxFuture<'a, StoreResult<Vec<Row>>> {
        let result = self.scan(table, predicate, select, order_by);
        Box::pin(async move { result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .insert("profiles", json!({"id": "a", "username": "fox", "created_at": "2024-01-01"}))
            .unwrap();
        store
            .insert("profiles", json!({"id": "b", "username": "wolf", "created_at": "2024-03-01"}))
            .unwrap();
        store
            .insert("profiles", json!({"id": "c", "username": "foxglove", "created_at": "2024-02-01"}))
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_filters_orders_and_projects() {
        let store = seeded();
        let pred = Predicate::contains("username", "fox", false);
        let select = vec!["id".to_string()];

        let rows = store
            .find_matching("profiles", &pred, &select, &OrderBy::desc("created_at"))
            .await
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("id"), Some(&json!("c")));
        assert_eq!(rows[1].get("id"), Some(&json!("a")));
        assert!(rows.iter().all(|r| r.len() == 1));
    }

    #[tokio::test]
    async fn test_unknown_table_is_empty() {
        let store = seeded();
        let rows = store
            .find_matching("packs", &Predicate::Always, &[], &OrderBy::asc("id"))
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_insert_requires_object() {
        let store = MemoryStore::new();
        assert!(store.insert("profiles", json!([1, 2])).is_err());
        assert_eq!(store.row_count("profiles"), 0);

        store.insert("Profiles", json!({"id": 1})).unwrap();
        assert_eq!(store.row_count("profiles"), 1);
    }
}
