//! Expression tree for where-clause conditions
//!
//! Expressions are pure data. Validation (column binding, table policy)
//! happens in the compiler and the authorization gate.

use serde::{Deserialize, Serialize};

use super::literal::Literal;
use super::query::WhereClause;

/// Case sensitivity applied to text matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseMode {
    Sensitive,
    #[default]
    Insensitive,
}

impl CaseMode {
    pub fn is_sensitive(&self) -> bool {
        matches!(self, CaseMode::Sensitive)
    }
}

/// A condition expression node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expression {
    /// Both operands must hold
    And {
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// Either operand must hold
    Or {
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// Negation of the inner expression
    Not { inner: Box<Expression> },
    /// Column equality, or full-text match across searchable fields when unbound
    Equals { value: Literal },
    GreaterThan { value: Literal },
    LessThan { value: Literal },
    GreaterOrEqual { value: Literal },
    LessOrEqual { value: Literal },
    /// Inclusive range `[start, end]`
    Between { start: Literal, end: Literal },
    /// Column value is not null
    Exists,
    /// Glob pattern: `*` matches any run, `?` exactly one character
    Wildcard { pattern: String },
    /// Approximate match within `distance` edits
    Fuzzy { term: String, distance: f64 },
    /// Strict equality
    Exact { term: String },
    /// Switches case sensitivity for the predicates that follow
    Case { mode: CaseMode },
    /// Column value is among the identifiers returned by a nested clause
    SubWhereClause { clause: Box<WhereClause> },
    /// Any tag this version does not recognise
    #[serde(other)]
    Unknown,
}

impl Expression {
    pub fn and(left: Expression, right: Expression) -> Self {
        Expression::And {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn or(left: Expression, right: Expression) -> Self {
        Expression::Or {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn not(inner: Expression) -> Self {
        Expression::Not {
            inner: Box::new(inner),
        }
    }

    pub fn equals(value: impl Into<Literal>) -> Self {
        Expression::Equals {
            value: value.into(),
        }
    }

    pub fn greater_than(value: impl Into<Literal>) -> Self {
        Expression::GreaterThan {
            value: value.into(),
        }
    }

    pub fn less_than(value: impl Into<Literal>) -> Self {
        Expression::LessThan {
            value: value.into(),
        }
    }

    pub fn greater_or_equal(value: impl Into<Literal>) -> Self {
        Expression::GreaterOrEqual {
            value: value.into(),
        }
    }

    pub fn less_or_equal(value: impl Into<Literal>) -> Self {
        Expression::LessOrEqual {
            value: value.into(),
        }
    }

    pub fn between(start: impl Into<Literal>, end: impl Into<Literal>) -> Self {
        Expression::Between {
            start: start.into(),
            end: end.into(),
        }
    }

    pub fn wildcard(pattern: impl Into<String>) -> Self {
        Expression::Wildcard {
            pattern: pattern.into(),
        }
    }

    pub fn fuzzy(term: impl Into<String>, distance: f64) -> Self {
        Expression::Fuzzy {
            term: term.into(),
            distance,
        }
    }

    pub fn exact(term: impl Into<String>) -> Self {
        Expression::Exact { term: term.into() }
    }

    pub fn case(mode: CaseMode) -> Self {
        Expression::Case { mode }
    }

    pub fn sub_where(clause: WhereClause) -> Self {
        Expression::SubWhereClause {
            clause: Box::new(clause),
        }
    }

    /// Returns the variant tag, matching the serialized `type` field
    pub fn tag(&self) -> &'static str {
        match self {
            Expression::And { .. } => "and",
            Expression::Or { .. } => "or",
            Expression::Not { .. } => "not",
            Expression::Equals { .. } => "equals",
            Expression::GreaterThan { .. } => "greater_than",
            Expression::LessThan { .. } => "less_than",
            Expression::GreaterOrEqual { .. } => "greater_or_equal",
            Expression::LessOrEqual { .. } => "less_or_equal",
            Expression::Between { .. } => "between",
            Expression::Exists => "exists",
            Expression::Wildcard { .. } => "wildcard",
            Expression::Fuzzy { .. } => "fuzzy",
            Expression::Exact { .. } => "exact",
            Expression::Case { .. } => "case",
            Expression::SubWhereClause { .. } => "sub_where_clause",
            Expression::Unknown => "unknown",
        }
    }

    /// Returns true if the operator needs a bound column to compile
    pub fn requires_column(&self) -> bool {
        matches!(
            self,
            Expression::GreaterThan { .. }
                | Expression::LessThan { .. }
                | Expression::GreaterOrEqual { .. }
                | Expression::LessOrEqual { .. }
                | Expression::Between { .. }
                | Expression::Exists
        )
    }
}
