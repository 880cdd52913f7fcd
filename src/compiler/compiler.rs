//! Condition compiler
//!
//! Recursively lowers an expression tree into a [`Predicate`], given the
//! resolved table descriptor and the clause's optional bound column.
//!
//! Compilation is pure except for nested where-clauses, whose identifier
//! sets are resolved eagerly through a [`SubqueryResolver`] before the
//! enclosing membership predicate is built.

use futures_util::future::BoxFuture;
use serde_json::Value;

use super::errors::{CompileError, CompileResult};
use super::pattern::GlobPattern;
use super::predicate::{Predicate, RangeBound};
use crate::ast::{CaseMode, Expression, Literal, WhereClause};
use crate::executor::ExecResult;
use crate::registry::{SearchableField, TableDescriptor};

/// Evaluates a nested where-clause to its matching identifiers
pub trait SubqueryResolver: Send + Sync {
    fn resolve<'a>(&'a self, clause: &'a WhereClause) -> BoxFuture<'a, ExecResult<Vec<Value>>>;
}

/// Result of lowering one node: its predicate (if it contributes one) and
/// the case mode in effect for whatever is compiled next.
struct Lowered {
    predicate: Option<Predicate>,
    case: CaseMode,
}

impl Lowered {
    fn of(predicate: Predicate, case: CaseMode) -> Self {
        Self {
            predicate: Some(predicate),
            case,
        }
    }
}

/// Compiles the condition of a single where-clause
pub struct ConditionCompiler<'a> {
    table: &'a TableDescriptor,
    column: Option<&'a str>,
    resolver: &'a dyn SubqueryResolver,
    default_case: CaseMode,
}

impl<'a> ConditionCompiler<'a> {
    pub fn new(
        table: &'a TableDescriptor,
        column: Option<&'a str>,
        resolver: &'a dyn SubqueryResolver,
    ) -> Self {
        Self {
            table,
            column,
            resolver,
            default_case: CaseMode::default(),
        }
    }

    /// Sets the case mode in effect before any `Case` node is seen
    pub fn with_case_mode(mut self, mode: CaseMode) -> Self {
        self.default_case = mode;
        self
    }

    /// Compiles an expression. A condition that contributes no predicate
    /// (only `Case` nodes) compiles to [`Predicate::Always`].
    pub async fn compile(&self, expr: &Expression) -> CompileResult<Predicate> {
        let lowered = self.lower(expr, self.default_case).await?;
        Ok(lowered.predicate.unwrap_or(Predicate::Always))
    }

    fn lower<'b>(
        &'b self,
        expr: &'b Expression,
        case: CaseMode,
    ) -> BoxFuture<'b, CompileResult<Lowered>> {
        Box::pin(async move {
            match expr {
                Expression::And { left, right } => {
                    let l = self.lower(left, case).await?;
                    let r = self.lower(right, l.case).await?;
                    Ok(Lowered {
                        predicate: combine(l.predicate, r.predicate, Predicate::and),
                        case: r.case,
                    })
                }
                Expression::Or { left, right } => {
                    let l = self.lower(left, case).await?;
                    let r = self.lower(right, l.case).await?;
                    Ok(Lowered {
                        predicate: combine(l.predicate, r.predicate, Predicate::or),
                        case: r.case,
                    })
                }
                Expression::Not { inner } => {
                    let i = self.lower(inner, case).await?;
                    Ok(Lowered {
                        predicate: i.predicate.map(Predicate::negate),
                        case: i.case,
                    })
                }
                Expression::Case { mode } => Ok(Lowered {
                    predicate: None,
                    case: *mode,
                }),
                Expression::SubWhereClause { clause } => {
                    let ids = self
                        .resolver
                        .resolve(clause)
                        .await
                        .map_err(|e| CompileError::Subquery(Box::new(e)))?;
                    let field = self.column.unwrap_or(&self.table.id_field);
                    Ok(Lowered::of(Predicate::in_set(field, ids), case))
                }
                leaf => self.lower_leaf(leaf, case).map(|p| Lowered::of(p, case)),
            }
        })
    }

    fn lower_leaf(&self, expr: &Expression, case: CaseMode) -> CompileResult<Predicate> {
        let sensitive = case.is_sensitive();

        match expr {
            Expression::Equals { value } => Ok(match self.column {
                Some(col) => Predicate::eq(col, value.to_value()),
                None => self.fan_out(|field| {
                    if field.is_enumerated() {
                        Predicate::eq(&field.name, value.to_value())
                    } else {
                        Predicate::contains(&field.name, literal_text(value), sensitive)
                    }
                }),
            }),
            Expression::GreaterThan { value } => {
                let col = self.require_column(expr)?;
                Ok(Predicate::range(
                    col,
                    Some(RangeBound::exclusive(value.to_value())),
                    None,
                ))
            }
            Expression::LessThan { value } => {
                let col = self.require_column(expr)?;
                Ok(Predicate::range(
                    col,
                    None,
                    Some(RangeBound::exclusive(value.to_value())),
                ))
            }
            Expression::GreaterOrEqual { value } => {
                let col = self.require_column(expr)?;
                Ok(Predicate::range(
                    col,
                    Some(RangeBound::inclusive(value.to_value())),
                    None,
                ))
            }
            Expression::LessOrEqual { value } => {
                let col = self.require_column(expr)?;
                Ok(Predicate::range(
                    col,
                    None,
                    Some(RangeBound::inclusive(value.to_value())),
                ))
            }
            Expression::Between { start, end } => {
                let col = self.require_column(expr)?;
                Ok(Predicate::range(
                    col,
                    Some(RangeBound::inclusive(start.to_value())),
                    Some(RangeBound::inclusive(end.to_value())),
                ))
            }
            Expression::Exists => {
                let col = self.require_column(expr)?;
                Ok(Predicate::not_null(col))
            }
            Expression::Wildcard { pattern } => {
                let glob = GlobPattern::new(pattern.as_str(), sensitive).map_err(|e| {
                    CompileError::InvalidPattern {
                        pattern: pattern.clone(),
                        message: e.to_string(),
                    }
                })?;
                Ok(match self.column {
                    Some(col) => Predicate::Glob {
                        field: col.to_string(),
                        pattern: glob,
                    },
                    None => self.fan_out(|field| Predicate::Glob {
                        field: field.name.clone(),
                        pattern: glob.clone(),
                    }),
                })
            }
            Expression::Fuzzy { term, distance } => {
                let max_distance = edit_budget(*distance);
                let fuzzy = |field: &str| Predicate::Fuzzy {
                    field: field.to_string(),
                    term: term.clone(),
                    max_distance,
                    case_sensitive: sensitive,
                };
                Ok(match self.column {
                    Some(col) => fuzzy(col),
                    None => self.fan_out(|field| {
                        if field.is_enumerated() {
                            Predicate::eq(&field.name, Value::String(term.clone()))
                        } else {
                            fuzzy(&field.name)
                        }
                    }),
                })
            }
            Expression::Exact { term } => Ok(match self.column {
                Some(col) => Predicate::eq(col, Value::String(term.clone())),
                None => self.fan_out(|field| Predicate::eq(&field.name, Value::String(term.clone()))),
            }),
            // Combinators, `Case` and nested clauses never reach here; `lower` handles them
            Expression::Unknown
            | Expression::And { .. }
            | Expression::Or { .. }
            | Expression::Not { .. }
            | Expression::Case { .. }
            | Expression::SubWhereClause { .. } => {
                Err(CompileError::UnsupportedExpression(expr.tag().to_string()))
            }
        }
    }

    fn require_column(&self, expr: &Expression) -> CompileResult<&'a str> {
        self.column.ok_or(CompileError::MissingColumn {
            operator: expr.tag(),
        })
    }

    /// Disjunction of `per_field` over every searchable field, in registry order
    fn fan_out(&self, per_field: impl Fn(&SearchableField) -> Predicate) -> Predicate {
        Predicate::Any(self.table.searchable_fields().iter().map(per_field).collect())
    }
}

fn combine(
    left: Option<Predicate>,
    right: Option<Predicate>,
    join: fn(Predicate, Predicate) -> Predicate,
) -> Option<Predicate> {
    match (left, right) {
        (Some(l), Some(r)) => Some(join(l, r)),
        (Some(p), None) | (None, Some(p)) => Some(p),
        (None, None) => None,
    }
}

/// Text used for containment matching of an arbitrary literal
fn literal_text(value: &Literal) -> String {
    match value {
        Literal::String(s) => s.clone(),
        other => other.to_value().to_string(),
    }
}

/// Floors and clamps a fuzzy distance; negative and NaN become zero
fn edit_budget(distance: f64) -> u8 {
    if distance.is_nan() || distance <= 0.0 {
        0
    } else {
        distance.floor().min(u8::MAX as f64) as u8
    }
}
