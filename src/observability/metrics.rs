//! Search metrics
//!
//! - Counters only, monotonic
//! - Reset only on process start
//! - Lock-free; `Relaxed` ordering is enough for counters

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters for query execution
#[derive(Debug, Default)]
pub struct SearchMetrics {
    /// Successful `execute` calls
    queries_executed: AtomicU64,
    /// Failed `execute` calls, whatever the cause
    queries_rejected: AtomicU64,
    /// Where-clauses that reached the store, subqueries included
    clauses_evaluated: AtomicU64,
    /// Nested clauses substituted into a parent predicate
    subqueries_resolved: AtomicU64,
    /// Results handed back to callers
    rows_returned: AtomicU64,
    /// Store calls that failed
    store_failures: AtomicU64,
}

impl SearchMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_queries_executed(&self) {
        self.queries_executed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_queries_rejected(&self) {
        self.queries_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_clauses_evaluated(&self) {
        self.clauses_evaluated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_subqueries_resolved(&self) {
        self.subqueries_resolved.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_rows_returned(&self, rows: u64) {
        self.rows_returned.fetch_add(rows, Ordering::Relaxed);
    }

    pub fn increment_store_failures(&self) {
        self.store_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            queries_executed: self.queries_executed.load(Ordering::Relaxed),
            queries_rejected: self.queries_rejected.load(Ordering::Relaxed),
            clauses_evaluated: self.clauses_evaluated.load(Ordering::Relaxed),
            subqueries_resolved: self.subqueries_resolved.load(Ordering::Relaxed),
            rows_returned: self.rows_returned.load(Ordering::Relaxed),
            store_failures: self.store_failures.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MetricsSnapshot {
    pub queries_executed: u64,
    pub queries_rejected: u64,
    pub clauses_evaluated: u64,
    pub subqueries_resolved: u64,
    pub rows_returned: u64,
    pub store_failures: u64,
}

impl MetricsSnapshot {
    /// Renders the snapshot as a JSON object
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "queries_executed": self.queries_executed,
            "queries_rejected": self.queries_rejected,
            "clauses_evaluated": self.clauses_evaluated,
            "subqueries_resolved": self.subqueries_resolved,
            "rows_returned": self.rows_returned,
            "store_failures": self.store_failures,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_new_metrics_are_zero() {
        assert_eq!(SearchMetrics::new().snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_increment_counters() {
        let metrics = SearchMetrics::new();
        metrics.increment_queries_executed();
        metrics.increment_queries_rejected();
        metrics.increment_clauses_evaluated();
        metrics.increment_clauses_evaluated();
        metrics.increment_subqueries_resolved();
        metrics.add_rows_returned(7);
        metrics.increment_store_failures();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.queries_executed, 1);
        assert_eq!(snapshot.queries_rejected, 1);
        assert_eq!(snapshot.clauses_evaluated, 2);
        assert_eq!(snapshot.subqueries_resolved, 1);
        assert_eq!(snapshot.rows_returned, 7);
        assert_eq!(snapshot.store_failures, 1);
        assert_eq!(snapshot.to_json()["rows_returned"], 7);
    }

    #[test]
    fn test_concurrent_increments() {
        let metrics = Arc::new(SearchMetrics::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let metrics = Arc::clone(&metrics);
                thread::spawn(move || {
                    for _ in 0..250 {
                        metrics.increment_clauses_evaluated();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(metrics.snapshot().clauses_evaluated, 1000);
    }
}
