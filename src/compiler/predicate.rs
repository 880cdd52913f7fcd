//! Compiled predicate tree
//!
//! The store-agnostic form a where-clause condition lowers into. Stores
//! translate it into their own query language or evaluate it directly.

use std::fmt;

use serde_json::Value;

use super::pattern::GlobPattern;

/// One end of a range predicate
#[derive(Debug, Clone, PartialEq)]
pub struct RangeBound {
    pub value: Value,
    pub inclusive: bool,
}

impl RangeBound {
    pub fn inclusive(value: Value) -> Self {
        Self {
            value,
            inclusive: true,
        }
    }

    pub fn exclusive(value: Value) -> Self {
        Self {
            value,
            inclusive: false,
        }
    }
}

/// A compiled condition
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Matches every row
    Always,
    /// Conjunction
    All(Vec<Predicate>),
    /// Disjunction
    Any(Vec<Predicate>),
    /// Negation
    Not(Box<Predicate>),
    /// Strict equality
    Eq { field: String, value: Value },
    /// Substring containment on a text column
    Contains {
        field: String,
        needle: String,
        case_sensitive: bool,
    },
    /// Range with optional lower and upper bounds
    Range {
        field: String,
        lower: Option<RangeBound>,
        upper: Option<RangeBound>,
    },
    /// Column value is present and not null
    NotNull { field: String },
    /// Anchored glob match on a text column
    Glob { field: String, pattern: GlobPattern },
    /// Bounded edit-distance match on a text column
    Fuzzy {
        field: String,
        term: String,
        max_distance: u8,
        case_sensitive: bool,
    },
    /// Column value is one of an explicit set
    In { field: String, values: Vec<Value> },
}

impl Predicate {
    pub fn and(left: Predicate, right: Predicate) -> Self {
        Predicate::All(vec![left, right])
    }

    pub fn or(left: Predicate, right: Predicate) -> Self {
        Predicate::Any(vec![left, right])
    }

    pub fn negate(inner: Predicate) -> Self {
        Predicate::Not(Box::new(inner))
    }

    pub fn eq(field: impl Into<String>, value: Value) -> Self {
        Predicate::Eq {
            field: field.into(),
            value,
        }
    }

    pub fn contains(field: impl Into<String>, needle: impl Into<String>, case_sensitive: bool) -> Self {
        Predicate::Contains {
            field: field.into(),
            needle: needle.into(),
            case_sensitive,
        }
    }

    pub fn range(
        field: impl Into<String>,
        lower: Option<RangeBound>,
        upper: Option<RangeBound>,
    ) -> Self {
        Predicate::Range {
            field: field.into(),
            lower,
            upper,
        }
    }

    pub fn not_null(field: impl Into<String>) -> Self {
        Predicate::NotNull {
            field: field.into(),
        }
    }

    pub fn in_set(field: impl Into<String>, values: Vec<Value>) -> Self {
        Predicate::In {
            field: field.into(),
            values,
        }
    }

    /// Fields referenced anywhere in the tree, in first-seen order
    pub fn fields(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_fields(&mut out);
        out
    }

    fn collect_fields<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Predicate::Always => {}
            Predicate::All(parts) | Predicate::Any(parts) => {
                for p in parts {
                    p.collect_fields(out);
                }
            }
            Predicate::Not(inner) => inner.collect_fields(out),
            Predicate::Eq { field, .. }
            | Predicate::Contains { field, .. }
            | Predicate::Range { field, .. }
            | Predicate::NotNull { field }
            | Predicate::Glob { field, .. }
            | Predicate::Fuzzy { field, .. }
            | Predicate::In { field, .. } => {
                if !out.contains(&field.as_str()) {
                    out.push(field);
                }
            }
        }
    }
}

fn write_joined(
    f: &mut fmt::Formatter<'_>,
    parts: &[Predicate],
    sep: &str,
    empty: &str,
) -> fmt::Result {
    if parts.is_empty() {
        return write!(f, "{}", empty);
    }
    write!(f, "(")?;
    for (i, p) in parts.iter().enumerate() {
        if i > 0 {
            write!(f, " {} ", sep)?;
        }
        write!(f, "{}", p)?;
    }
    write!(f, ")")
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Always => write!(f, "TRUE"),
            Predicate::All(parts) => write_joined(f, parts, "AND", "TRUE"),
            Predicate::Any(parts) => write_joined(f, parts, "OR", "FALSE"),
            Predicate::Not(inner) => write!(f, "NOT {}", inner),
            Predicate::Eq { field, value } => write!(f, "{} = {}", field, value),
            Predicate::Contains {
                field,
                needle,
                case_sensitive,
            } => {
                let op = if *case_sensitive { "CONTAINS" } else { "ICONTAINS" };
                write!(f, "{} {} {:?}", field, op, needle)
            }
            Predicate::Range { field, lower, upper } => {
                let lower = lower
                    .as_ref()
                    .map(|b| format!("{} {} {}", field, if b.inclusive { ">=" } else { ">" }, b.value));
                let upper = upper
                    .as_ref()
                    .map(|b| format!("{} {} {}", field, if b.inclusive { "<=" } else { "<" }, b.value));
                match (lower, upper) {
                    (Some(l), Some(u)) => write!(f, "({} AND {})", l, u),
                    (Some(b), None) | (None, Some(b)) => write!(f, "{}", b),
                    (None, None) => write!(f, "{} IS NOT NULL", field),
                }
            }
            Predicate::NotNull { field } => write!(f, "{} IS NOT NULL", field),
            Predicate::Glob { field, pattern } => {
                let op = if pattern.is_case_sensitive() { "GLOB" } else { "IGLOB" };
                write!(f, "{} {} {}", field, op, pattern)
            }
            Predicate::Fuzzy {
                field,
                term,
                max_distance,
                case_sensitive,
            } => {
                let op = if *case_sensitive { "FUZZY" } else { "IFUZZY" };
                write!(f, "{} {}~{} {:?}", field, op, max_distance, term)
            }
            Predicate::In { field, values } => {
                write!(f, "{} IN [", field)?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
        }
    }
}
