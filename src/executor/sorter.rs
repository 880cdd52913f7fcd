//! Result sorting for query execution
//!
//! Sorts are stable: results with equal keys keep the order the store
//! returned them in.

use std::cmp::Ordering;

use super::result::SearchResult;
use crate::ast::{SortDirection, SortExpr, SortField};

/// Sorts search results
pub struct ResultSorter;

impl ResultSorter {
    /// Sorts results according to the sort expression.
    ///
    /// Scoreless results always trail scored ones, ordered by id ascending,
    /// whichever direction was requested.
    pub fn sort(results: &mut [SearchResult], sort: &SortExpr) {
        match sort.field {
            SortField::Id => {
                results.sort_by(|a, b| Self::directed(a.id.cmp(&b.id), sort.direction))
            }
            SortField::Table => {
                results.sort_by(|a, b| Self::directed(a.table.cmp(&b.table), sort.direction))
            }
            SortField::Score => results.sort_by(|a, b| Self::compare_scores(a, b, sort.direction)),
        }
    }

    fn directed(ordering: Ordering, direction: SortDirection) -> Ordering {
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }

    fn compare_scores(a: &SearchResult, b: &SearchResult, direction: SortDirection) -> Ordering {
        match (a.score, b.score) {
            (Some(x), Some(y)) => Self::directed(x.total_cmp(&y), direction),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.id.cmp(&b.id),
        }
    }
}
