//! Entry-kind filter.

use chrono::{DateTime, Local};

use crate::entry::{Entry, EntryKind};
use crate::predicate::{Expr, Predicate};

struct KindFilter(EntryKind);

impl Predicate for KindFilter {
    fn evaluate(&self, entry: &Entry, _reference: DateTime<Local>) -> bool {
        entry.kind() == self.0
    }
}

/// Match entries of exactly the given kind.
///
/// Uses the walker's cheap kind classification when available; falls back
/// to the entry's snapshot for paths checked outside a traversal. Entries
/// that cannot be statted at all classify as [`EntryKind::Other`].
pub fn kind(kind: EntryKind) -> Expr {
    Expr::leaf(KindFilter(kind))
}
