//! In-memory named query registry
//!
//! Holds caller-named queries for the lifetime of the process. Last write
//! wins; entries never expire.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::ast::Query;

#[derive(Debug, Default)]
pub struct NamedQueryRegistry {
    queries: RwLock<HashMap<String, Query>>,
}

impl NamedQueryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a query under `name`, returning the query it replaced
    pub fn store(&self, name: impl Into<String>, query: Query) -> Option<Query> {
        self.write().insert(name.into(), query)
    }

    /// Returns a copy of the query stored under `name`
    pub fn get(&self, name: &str) -> Option<Query> {
        self.read().get(name).cloned()
    }

    pub fn remove(&self, name: &str) -> Option<Query> {
        self.write().remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().keys().cloned().collect();
        names.sort();
        names
    }

    // Every write is a single map call, so a poisoned map is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Query>> {
        self.queries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Query>> {
        self.queries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expression, SortExpr, SortField, WhereClause};

    fn query(term: &str) -> Query {
        Query::clause(WhereClause::new("profiles", Expression::equals(term)))
    }

    #[test]
    fn test_store_and_get() {
        let registry = NamedQueryRegistry::new();
        let q = query("fox").with_sort(SortExpr::asc(SortField::Id));

        assert!(registry.store("q1", q.clone()).is_none());
        assert_eq!(registry.get("q1"), Some(q));
        assert_eq!(registry.get("nonexistent"), None);
    }

    #[test]
    fn test_last_write_wins() {
        let registry = NamedQueryRegistry::new();
        registry.store("q", query("first"));
        let replaced = registry.store("q", query("second"));

        assert_eq!(replaced, Some(query("first")));
        assert_eq!(registry.get("q"), Some(query("second")));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_and_names() {
        let registry = NamedQueryRegistry::new();
        registry.store("zeta", query("z"));
        registry.store("alpha", query("a"));
        assert_eq!(registry.names(), vec!["alpha".to_string(), "zeta".to_string()]);

        assert!(registry.remove("zeta").is_some());
        assert!(!registry.contains("zeta"));
        assert!(registry.remove("zeta").is_none());

        registry.remove("alpha");
        assert!(registry.is_empty());
    }
}
