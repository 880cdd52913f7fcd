//! Result types for query execution

use serde::Serialize;

/// One matching record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    /// Record identifier
    pub id: String,
    /// Table the record came from
    pub table: String,
    /// Relevance score, when the store provides one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl SearchResult {
    /// Creates an unscored result
    pub fn new(id: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            table: table.into(),
            score: None,
        }
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }
}
