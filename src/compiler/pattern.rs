//! Text matching primitives shared by compiled predicates
//!
//! - Glob patterns: `*` matches any run of characters (including none), `?`
//!   exactly one character. Everything else is literal and the pattern is
//!   anchored at both ends.
//! - Bounded edit distance for fuzzy terms.

use std::fmt;

use regex::{Regex, RegexBuilder};

/// A compiled glob pattern
#[derive(Debug, Clone)]
pub struct GlobPattern {
    source: String,
    case_sensitive: bool,
    regex: Regex,
}

impl GlobPattern {
    /// Compiles a glob into an anchored regular expression
    pub fn new(source: impl Into<String>, case_sensitive: bool) -> Result<Self, regex::Error> {
        let source = source.into();
        let regex = RegexBuilder::new(&Self::translate(&source))
            .case_insensitive(!case_sensitive)
            .dot_matches_new_line(true)
            .build()?;

        Ok(Self {
            source,
            case_sensitive,
            regex,
        })
    }

    fn translate(glob: &str) -> String {
        let mut out = String::with_capacity(glob.len() + 8);
        out.push('^');
        let mut buf = [0u8; 4];
        for c in glob.chars() {
            match c {
                '*' => out.push_str(".*"),
                '?' => out.push('.'),
                c => out.push_str(&regex::escape(c.encode_utf8(&mut buf))),
            }
        }
        out.push('$');
        out
    }

    /// Original glob text
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Equivalent anchored regular expression, for stores that accept regexes
    pub fn as_regex(&self) -> &Regex {
        &self.regex
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

impl PartialEq for GlobPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.case_sensitive == other.case_sensitive
    }
}

impl fmt::Display for GlobPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.source)
    }
}

/// Returns true if `a` can be turned into `b` with at most `max_edits`
/// single-character insertions, deletions or substitutions.
pub fn levenshtein_within(a: &str, b: &str, max_edits: usize) -> bool {
    if a == b {
        return true;
    }
    let a_len = a.chars().count();
    let b_len = b.chars().count();
    if a_len.abs_diff(b_len) > max_edits {
        return false;
    }
    if max_edits == 0 {
        return false;
    }

    let b_chars: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr = vec![0usize; b_chars.len() + 1];

    for (i, a_char) in a.chars().enumerate() {
        curr[0] = i + 1;
        let mut row_min = curr[0];
        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != *b_char);
            let insert = curr[j] + 1;
            let delete = prev[j + 1] + 1;
            let replace = prev[j] + cost;
            let value = insert.min(delete).min(replace);
            curr[j + 1] = value;
            row_min = row_min.min(value);
        }
        // Every later row is at least this row's minimum
        if row_min > max_edits {
            return false;
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_chars.len()] <= max_edits
}

/// Fuzzy text match: the whole value, or any whitespace-separated word in
/// it, lies within `max_edits` of `term`.
pub fn fuzzy_matches(value: &str, term: &str, max_edits: usize, case_sensitive: bool) -> bool {
    let (value, term) = if case_sensitive {
        (value.to_string(), term.to_string())
    } else {
        (value.to_lowercase(), term.to_lowercase())
    };

    levenshtein_within(&value, &term, max_edits)
        || value
            .split_whitespace()
            .any(|word| levenshtein_within(word, &term, max_edits))
}

/// Containment test honoring case sensitivity
pub fn contains(value: &str, needle: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        value.contains(needle)
    } else {
        value.to_lowercase().contains(&needle.to_lowercase())
    }
}
