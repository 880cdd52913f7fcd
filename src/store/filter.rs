//! Predicate evaluation against rows
//!
//! Used by stores that filter in process. Missing fields and null values
//! never satisfy a comparison; mixed-type comparisons are false.

use std::borrow::Cow;
use std::cmp::Ordering;

use serde_json::Value;

use super::backend::Row;
use crate::compiler::{contains, fuzzy_matches, Predicate, RangeBound};

/// Evaluates compiled predicates against rows
pub struct PredicateFilter;

impl PredicateFilter {
    /// Checks if a row satisfies the predicate
    pub fn matches(row: &Row, predicate: &Predicate) -> bool {
        match predicate {
            Predicate::Always => true,
            Predicate::All(parts) => parts.iter().all(|p| Self::matches(row, p)),
            Predicate::Any(parts) => parts.iter().any(|p| Self::matches(row, p)),
            Predicate::Not(inner) => !Self::matches(row, inner),
            Predicate::Eq { field, value } => {
                Self::present(row, field).is_some_and(|v| values_equal(v, value))
            }
            Predicate::Contains {
                field,
                needle,
                case_sensitive,
            } => Self::text(row, field).is_some_and(|t| contains(&t, needle, *case_sensitive)),
            Predicate::Range { field, lower, upper } => Self::present(row, field)
                .is_some_and(|v| Self::within(v, lower.as_ref(), upper.as_ref())),
            Predicate::NotNull { field } => Self::present(row, field).is_some(),
            Predicate::Glob { field, pattern } => {
                Self::text(row, field).is_some_and(|t| pattern.is_match(&t))
            }
            Predicate::Fuzzy {
                field,
                term,
                max_distance,
                case_sensitive,
            } => Self::text(row, field).is_some_and(|t| {
                fuzzy_matches(&t, term, usize::from(*max_distance), *case_sensitive)
            }),
            Predicate::In { field, values } => Self::present(row, field)
                .is_some_and(|v| values.iter().any(|candidate| values_equal(v, candidate))),
        }
    }

    /// Field value, unless missing or null
    fn present<'a>(row: &'a Row, field: &str) -> Option<&'a Value> {
        row.get(field).filter(|v| !v.is_null())
    }

    /// Textual form of a scalar field, for text operators
    fn text<'a>(row: &'a Row, field: &str) -> Option<Cow<'a, str>> {
        match Self::present(row, field)? {
            Value::String(s) => Some(Cow::Borrowed(s)),
            Value::Number(n) => Some(Cow::Owned(n.to_string())),
            Value::Bool(b) => Some(Cow::Owned(b.to_string())),
            _ => None,
        }
    }

    fn within(value: &Value, lower: Option<&RangeBound>, upper: Option<&RangeBound>) -> bool {
        let lower_ok = lower.map_or(true, |b| match compare_scalars(value, &b.value) {
            Some(Ordering::Greater) => true,
            Some(Ordering::Equal) => b.inclusive,
            _ => false,
        });
        let upper_ok = upper.map_or(true, |b| match compare_scalars(value, &b.value) {
            Some(Ordering::Less) => true,
            Some(Ordering::Equal) => b.inclusive,
            _ => false,
        });
        lower_ok && upper_ok
    }
}

/// Equality with numeric comparison across integer and float representations
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(_), Value::Number(_)) => compare_scalars(a, b) == Some(Ordering::Equal),
        _ => a == b,
    }
}

/// Orders two scalars of the same type; `None` for mixed or non-scalar types
pub fn compare_scalars(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if let (Some(xi), Some(yi)) = (x.as_i64(), y.as_i64()) {
                return Some(xi.cmp(&yi));
            }
            x.as_f64()?.partial_cmp(&y.as_f64()?)
        }
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Total ordering over optional JSON values for sorting.
///
/// Missing < null < bool < number < string < array < object; arrays and
/// objects compare equal among themselves.
pub fn compare_for_sort(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(v: Option<&Value>) -> u8 {
        match v {
            None => 0,
            Some(Value::Null) => 1,
            Some(Value::Bool(_)) => 2,
            Some(Value::Number(_)) => 3,
            Some(Value::String(_)) => 4,
            Some(Value::Array(_)) => 5,
            Some(Value::Object(_)) => 6,
        }
    }

    match (a, b) {
        (Some(x), Some(y)) => compare_scalars(x, y).unwrap_or_else(|| rank(a).cmp(&rank(b))),
        _ => rank(a).cmp(&rank(b)),
    }
}
