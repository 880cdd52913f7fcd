//! Query executor
//!
//! Drives a query through authorization, compilation and the store.
//!
//! Execution flow per where-clause (strict order):
//! 1. Authorize the table/column pair against the registry and allowlist
//! 2. Compile the condition, resolving nested clauses to identifier sets
//! 3. Ask the store for matching identifiers, newest first
//! 4. Map rows to [`SearchResult`]s
//!
//! A top-level OR evaluates both sides and concatenates left then right,
//! without deduplication. The optional sort runs once over the merged
//! sequence.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use serde_json::Value;
use tracing::{debug, warn, Instrument};
use uuid::Uuid;

use crate::ast::{Query, QueryNode, WhereClause};
use crate::auth::{Allowlist, AuthorizationGate};
use crate::compiler::{ConditionCompiler, SubqueryResolver};
use crate::named::NamedQueryRegistry;
use crate::observability::SearchMetrics;
use crate::registry::TableRegistry;
use crate::store::{DataStore, OrderBy};

use super::config::EngineConfig;
use super::errors::{ExecResult, SearchError};
use super::result::SearchResult;
use super::sorter::ResultSorter;

/// Executes queries against a [`DataStore`]
pub struct QueryExecutor {
    registry: Arc<TableRegistry>,
    store: Arc<dyn DataStore>,
    config: EngineConfig,
    named: NamedQueryRegistry,
    metrics: Arc<SearchMetrics>,
}

impl QueryExecutor {
    /// Creates an executor with the default configuration
    pub fn new(registry: Arc<TableRegistry>, store: Arc<dyn DataStore>) -> Self {
        Self {
            registry,
            store,
            config: EngineConfig::default(),
            named: NamedQueryRegistry::new(),
            metrics: Arc::new(SearchMetrics::new()),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Shares an existing metrics registry
    pub fn with_metrics(mut self, metrics: Arc<SearchMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn registry(&self) -> &TableRegistry {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn named_queries(&self) -> &NamedQueryRegistry {
        &self.named
    }

    pub fn metrics(&self) -> &SearchMetrics {
        &self.metrics
    }

    /// Executes a query.
    ///
    /// The whole call runs under the configured deadline; expiry drops any
    /// in-flight store calls and returns [`SearchError::DeadlineExceeded`].
    pub async fn execute(
        &self,
        query: &Query,
        allowlist: Option<&Allowlist>,
    ) -> ExecResult<Vec<SearchResult>> {
        let span = tracing::info_span!(
            "execute",
            request_id = %Uuid::new_v4(),
            clauses = query.root.clause_count(),
        );

        async move {
            let outcome = match self.config.query_timeout() {
                Some(limit) => match tokio::time::timeout(limit, self.run(query, allowlist)).await
                {
                    Ok(outcome) => outcome,
                    Err(_) => Err(SearchError::DeadlineExceeded {
                        timeout_ms: limit.as_millis() as u64,
                    }),
                },
                None => self.run(query, allowlist).await,
            };

            match &outcome {
                Ok(results) => {
                    self.metrics.increment_queries_executed();
                    self.metrics.add_rows_returned(results.len() as u64);
                    debug!(results = results.len(), "query completed");
                }
                Err(err) => {
                    self.metrics.increment_queries_rejected();
                    warn!(code = err.code(), error = %err, "query failed");
                }
            }

            outcome
        }
        .instrument(span)
        .await
    }

    /// Stores `query` under `name`, then executes it
    pub async fn execute_named(
        &self,
        name: &str,
        query: Query,
        allowlist: Option<&Allowlist>,
    ) -> ExecResult<Vec<SearchResult>> {
        self.named.store(name, query.clone());
        self.execute(&query, allowlist).await
    }

    /// Executes a previously stored query. Returns `None` if `name` is not
    /// registered.
    pub async fn run_named(
        &self,
        name: &str,
        allowlist: Option<&Allowlist>,
    ) -> ExecResult<Option<Vec<SearchResult>>> {
        match self.named.get(name) {
            Some(query) => self.execute(&query, allowlist).await.map(Some),
            None => Ok(None),
        }
    }

    async fn run(
        &self,
        query: &Query,
        allowlist: Option<&Allowlist>,
    ) -> ExecResult<Vec<SearchResult>> {
        let mut results = self.execute_node(&query.root, allowlist).await?;
        if let Some(sort) = &query.sort {
            ResultSorter::sort(&mut results, sort);
        }
        Ok(results)
    }

    fn execute_node<'a>(
        &'a self,
        node: &'a QueryNode,
        allowlist: Option<&'a Allowlist>,
    ) -> BoxFuture<'a, ExecResult<Vec<SearchResult>>> {
        Box::pin(async move {
            match node {
                QueryNode::Clause(clause) => self.evaluate_clause(clause, allowlist).await,
                QueryNode::Or { left, right } => {
                    let (mut merged, right) = if self.config.parallel_branches {
                        tokio::try_join!(
                            self.execute_node(left, allowlist),
                            self.execute_node(right, allowlist)
                        )?
                    } else {
                        let left = self.execute_node(left, allowlist).await?;
                        (left, self.execute_node(right, allowlist).await?)
                    };
                    merged.extend(right);
                    Ok(merged)
                }
            }
        })
    }

    /// Evaluates a single where-clause, unsorted, newest first.
    pub fn evaluate_clause<'a>(
        &'a self,
        clause: &'a WhereClause,
        allowlist: Option<&'a Allowlist>,
    ) -> BoxFuture<'a, ExecResult<Vec<SearchResult>>> {
        Box::pin(async move {
            let table = clause.table.to_lowercase();
            let ids = self.matching_ids(clause, allowlist).await?;

            Ok(ids
                .iter()
                .filter_map(id_text)
                .map(|id| SearchResult::new(id, table.as_str()))
                .collect())
        })
    }

    /// Identifiers of the rows matching a clause, as the store returned
    /// them. Every value is a string or a number.
    fn matching_ids<'a>(
        &'a self,
        clause: &'a WhereClause,
        allowlist: Option<&'a Allowlist>,
    ) -> BoxFuture<'a, ExecResult<Vec<Value>>> {
        Box::pin(async move {
            let table = clause.table.to_lowercase();
            let column = clause.column.as_deref();

            let descriptor =
                AuthorizationGate::new(&self.registry).authorize(&table, column, allowlist)?;

            let resolver = ClauseResolver {
                executor: self,
                allowlist,
            };
            let predicate = ConditionCompiler::new(descriptor, column, &resolver)
                .with_case_mode(self.config.default_case)
                .compile(&clause.condition)
                .await?;

            let select = vec![descriptor.id_field.clone()];
            let order_by = OrderBy::desc(descriptor.created_field.as_str());

            let rows = match self
                .store
                .find_matching(&table, &predicate, &select, &order_by)
                .await
            {
                Ok(rows) => rows,
                Err(err) => {
                    self.metrics.increment_store_failures();
                    warn!(table = %table, error = %err, "store call failed");
                    return Err(SearchError::QueryExecutionError {
                        table,
                        message: err.to_string(),
                    });
                }
            };

            self.metrics.increment_clauses_evaluated();
            debug!(table = %table, predicate = %predicate, rows = rows.len(), "clause evaluated");

            rows.into_iter()
                .map(|mut row| match row.remove(&descriptor.id_field) {
                    Some(id @ (Value::String(_) | Value::Number(_))) => Ok(id),
                    _ => Err(SearchError::QueryExecutionError {
                        table: table.clone(),
                        message: format!(
                            "row has no usable '{}' identifier",
                            descriptor.id_field
                        ),
                    }),
                })
                .collect::<ExecResult<Vec<_>>>()
        })
    }
}

/// Resolves nested clauses through the executor that is compiling them.
/// Identifiers keep their stored type so numeric id columns still match.
struct ClauseResolver<'e> {
    executor: &'e QueryExecutor,
    allowlist: Option<&'e Allowlist>,
}

impl SubqueryResolver for ClauseResolver<'_> {
    fn resolve<'a>(&'a self, clause: &'a WhereClause) -> BoxFuture<'a, ExecResult<Vec<Value>>> {
        Box::pin(async move {
            let ids = self.executor.matching_ids(clause, self.allowlist).await?;

            let limit = self.executor.config.max_subquery_ids;
            if ids.len() > limit {
                return Err(SearchError::SubqueryLimitExceeded {
                    table: clause.table.to_lowercase(),
                    limit,
                });
            }

            self.executor.metrics.increment_subqueries_resolved();
            Ok(ids)
        })
    }
}

/// Renders a string or numeric identifier
fn id_text(id: &Value) -> Option<String> {
    match id {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}
