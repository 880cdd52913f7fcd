//! Engine configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ast::CaseMode;

/// Tunables for [`QueryExecutor`](super::QueryExecutor)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Deadline for a whole `execute` call; `None` disables it
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: Option<u64>,

    /// Maximum identifiers a nested clause may substitute into its parent
    #[serde(default = "default_max_subquery_ids")]
    pub max_subquery_ids: usize,

    /// Evaluate both sides of a top-level OR concurrently
    #[serde(default = "default_parallel_branches")]
    pub parallel_branches: bool,

    /// Case mode each clause condition starts in
    #[serde(default)]
    pub default_case: CaseMode,
}

fn default_query_timeout_ms() -> Option<u64> {
    Some(30_000)
}

fn default_max_subquery_ids() -> usize {
    10_000
}

fn default_parallel_branches() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            query_timeout_ms: default_query_timeout_ms(),
            max_subquery_ids: default_max_subquery_ids(),
            parallel_branches: default_parallel_branches(),
            default_case: CaseMode::default(),
        }
    }
}

impl EngineConfig {
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.query_timeout_ms = Some(timeout_ms);
        self
    }

    pub fn without_timeout(mut self) -> Self {
        self.query_timeout_ms = None;
        self
    }

    pub fn with_max_subquery_ids(mut self, limit: usize) -> Self {
        self.max_subquery_ids = limit;
        self
    }

    pub fn with_parallel_branches(mut self, parallel: bool) -> Self {
        self.parallel_branches = parallel;
        self
    }

    pub fn with_default_case(mut self, mode: CaseMode) -> Self {
        self.default_case = mode;
        self
    }

    /// Returns the query deadline as a duration
    pub fn query_timeout(&self) -> Option<Duration> {
        self.query_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.query_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.max_subquery_ids, 10_000);
        assert!(config.parallel_branches);
        assert_eq!(config.default_case, CaseMode::Insensitive);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"max_subquery_ids": 50, "default_case": "sensitive"}"#)
                .unwrap();
        assert_eq!(config.max_subquery_ids, 50);
        assert_eq!(config.default_case, CaseMode::Sensitive);
        assert_eq!(config.query_timeout_ms, Some(30_000));
    }

    #[test]
    fn test_null_timeout_disables_deadline() {
        let config: EngineConfig = serde_json::from_str(r#"{"query_timeout_ms": null}"#).unwrap();
        assert_eq!(config.query_timeout(), None);
    }
}
