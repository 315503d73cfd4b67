//! Suffix filters: case-insensitive ends-with matching on filenames.
//!
//! Patterns are normalized to exactly one leading dot, so `suffix("bmp")`
//! and `suffix(".bmp")` match the same set of filenames. Multi-dot suffixes
//! such as `.tar.gz` work, glob wildcards are permitted inside the
//! pattern, and a single-level `{a,b}` comma group expands to the OR of
//! its alternatives.

use chrono::{DateTime, Local};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use crate::entry::Entry;
use crate::error::QueryError;
use crate::predicate::{Expr, Predicate};

struct SuffixFilter {
    set: GlobSet,
}

impl Predicate for SuffixFilter {
    fn evaluate(&self, entry: &Entry, _reference: DateTime<Local>) -> bool {
        !entry.name().is_empty() && self.set.is_match(entry.name())
    }
}

/// Match filenames ending with `pattern` (dot-normalized, case-insensitive).
///
/// # Errors
///
/// Fails at construction when the pattern is empty or does not compile.
pub fn suffix(pattern: &str) -> Result<Expr, QueryError> {
    let mut builder = GlobSetBuilder::new();
    for alternative in expand_braces(pattern.trim()) {
        let alternative = alternative.trim();
        if alternative.is_empty() || alternative == "." {
            return Err(QueryError::InvalidPredicate(format!(
                "suffix pattern {pattern:?} contains an empty alternative"
            )));
        }
        let normalized = if alternative.starts_with('.') {
            alternative.to_string()
        } else {
            format!(".{alternative}")
        };
        let glob = GlobBuilder::new(&format!("*{normalized}"))
            .case_insensitive(true)
            .build()
            .map_err(|source| QueryError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
        builder.add(glob);
    }
    let set = builder
        .build()
        .map_err(|source| QueryError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
    Ok(Expr::leaf(SuffixFilter { set }))
}

/// Expand one level of `{a,b,c}` alternatives. No nesting.
fn expand_braces(pattern: &str) -> Vec<String> {
    let Some(open) = pattern.find('{') else {
        return vec![pattern.to_string()];
    };
    let Some(close) = pattern[open..].find('}').map(|rel| open + rel) else {
        return vec![pattern.to_string()];
    };

    let head = &pattern[..open];
    let tail = &pattern[close + 1..];
    pattern[open + 1..close]
        .split(',')
        .map(|alt| format!("{head}{}{tail}", alt.trim()))
        .collect()
}
