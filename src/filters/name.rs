//! Filename and stem filters backed by case-insensitive shell globs.

use std::path::Path;

use chrono::{DateTime, Local};
use globset::{GlobBuilder, GlobMatcher};

use crate::entry::Entry;
use crate::error::QueryError;
use crate::predicate::{Expr, Predicate};

#[derive(Clone, Copy)]
enum Target {
    Name,
    Stem,
}

struct NameFilter {
    matcher: GlobMatcher,
    target: Target,
}

impl Predicate for NameFilter {
    fn evaluate(&self, entry: &Entry, _reference: DateTime<Local>) -> bool {
        match self.target {
            Target::Name => self.matcher.is_match(Path::new(entry.name())),
            Target::Stem => match Path::new(entry.name()).file_stem() {
                Some(stem) => self.matcher.is_match(Path::new(stem)),
                None => false,
            },
        }
    }
}

fn compile(pattern: &str, target: Target) -> Result<Expr, QueryError> {
    let matcher = GlobBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| QueryError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?
        .compile_matcher();
    Ok(Expr::leaf(NameFilter { matcher, target }))
}

/// Match the full filename against a shell-style glob (`*`, `?`, character
/// classes), case-insensitively.
///
/// # Errors
///
/// Fails at construction when the glob does not compile.
pub fn name(pattern: &str) -> Result<Expr, QueryError> {
    compile(pattern, Target::Name)
}

/// Match the filename stem (name without the final extension) against a
/// shell-style glob, case-insensitively.
pub fn stem(pattern: &str) -> Result<Expr, QueryError> {
    compile(pattern, Target::Stem)
}
