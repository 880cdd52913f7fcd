//! Where-clauses, sort expressions and top-level queries

use serde::{Deserialize, Serialize};

use super::expr::Expression;

/// A table-scoped filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhereClause {
    /// Logical table name
    pub table: String,
    /// Optional single-column scope
    #[serde(default)]
    pub column: Option<String>,
    /// Condition tree, owned exclusively by this clause
    pub condition: Expression,
}

impl WhereClause {
    /// Creates an unscoped clause (full-text over searchable fields)
    pub fn new(table: impl Into<String>, condition: Expression) -> Self {
        Self {
            table: table.into(),
            column: None,
            condition,
        }
    }

    /// Scopes the clause to a single column
    pub fn on_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }
}

/// Field a result sequence can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Id,
    Table,
    Score,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Table => "table",
            SortField::Score => "score",
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

/// Sort specification applied after all clauses are evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortExpr {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortExpr {
    pub fn asc(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Ascending,
        }
    }

    pub fn desc(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Descending,
        }
    }
}

/// Root of a query tree.
///
/// A root-level `Or` joins independently evaluated where-clauses and is
/// distinct from an `Or` inside a single clause's condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueryNode {
    Clause(WhereClause),
    Or {
        left: Box<QueryNode>,
        right: Box<QueryNode>,
    },
}

impl QueryNode {
    /// Number of where-clauses reachable from this node
    pub fn clause_count(&self) -> usize {
        match self {
            QueryNode::Clause(_) => 1,
            QueryNode::Or { left, right } => left.clause_count() + right.clause_count(),
        }
    }
}

impl From<WhereClause> for QueryNode {
    fn from(clause: WhereClause) -> Self {
        QueryNode::Clause(clause)
    }
}

/// A complete search request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub root: QueryNode,
    #[serde(default)]
    pub sort: Option<SortExpr>,
}

impl Query {
    /// Creates a query over a single where-clause
    pub fn clause(clause: WhereClause) -> Self {
        Self {
            root: QueryNode::Clause(clause),
            sort: None,
        }
    }

    /// Joins two queries with a root-level `Or`.
    ///
    /// Branch sort specifications are discarded; set one on the result.
    pub fn or(left: Query, right: Query) -> Self {
        Self {
            root: QueryNode::Or {
                left: Box::new(left.root),
                right: Box::new(right.root),
            },
            sort: None,
        }
    }

    /// Sets the sort specification
    pub fn with_sort(mut self, sort: SortExpr) -> Self {
        self.sort = Some(sort);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_builder() {
        let query = Query::or(
            Query::clause(WhereClause::new("packs", Expression::equals("fox"))),
            Query::clause(
                WhereClause::new("profiles", Expression::equals("fox")).on_column("username"),
            ),
        )
        .with_sort(SortExpr::desc(SortField::Table));

        assert_eq!(query.root.clause_count(), 2);
        assert_eq!(query.sort, Some(SortExpr::desc(SortField::Table)));
        match &query.root {
            QueryNode::Or { right, .. } => match right.as_ref() {
                QueryNode::Clause(clause) => assert_eq!(clause.column.as_deref(), Some("username")),
                other => panic!("unexpected node: {:?}", other),
            },
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn test_query_json_shape() {
        let json = r#"{
            "root": {
                "type": "clause",
                "table": "profiles",
                "condition": {"type": "equals", "value": "fox"}
            },
            "sort": {"field": "id", "direction": "descending"}
        }"#;
        let query: Query = serde_json::from_str(json).unwrap();
        assert_eq!(
            query,
            Query::clause(WhereClause::new("profiles", Expression::equals("fox")))
                .with_sort(SortExpr::desc(SortField::Id))
        );
    }
}
