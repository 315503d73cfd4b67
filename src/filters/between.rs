//! Range filter: inclusive lower bound, exclusive upper bound.

use chrono::{DateTime, Local};

use crate::entry::Entry;
use crate::predicate::{Expr, Predicate};

struct BetweenFilter<T> {
    extract: Box<dyn Fn(&Entry, DateTime<Local>) -> Option<T> + Send + Sync>,
    lower: T,
    upper: T,
}

impl<T> Predicate for BetweenFilter<T>
where
    T: PartialOrd + Send + Sync,
{
    fn evaluate(&self, entry: &Entry, reference: DateTime<Local>) -> bool {
        match (self.extract)(entry, reference) {
            Some(value) => self.lower <= value && value < self.upper,
            None => false,
        }
    }
}

/// Match entries whose extracted value `v` satisfies `lower <= v < upper`.
///
/// Works for any extractor producing an ordered value; canned extractors
/// for size and the three timestamps live in [`extract`]. An extractor
/// returning `None` (missing metadata) is a non-match.
///
/// # Example
///
/// ```rust
/// use pathq::filters::{between, extract};
///
/// // 1 KiB up to, but not including, 1 MiB
/// let medium = between(extract::size, 1024u64, 1024 * 1024);
/// # let _ = medium;
/// ```
pub fn between<T, F>(extract: F, lower: T, upper: T) -> Expr
where
    T: PartialOrd + Send + Sync + 'static,
    F: Fn(&Entry, DateTime<Local>) -> Option<T> + Send + Sync + 'static,
{
    Expr::leaf(BetweenFilter {
        extract: Box::new(extract),
        lower,
        upper,
    })
}

/// Canned extractors for [`between`].
pub mod extract {
    use std::time::SystemTime;

    use chrono::{DateTime, Local};

    use crate::entry::Entry;

    /// Entry size in bytes.
    pub fn size(entry: &Entry, _reference: DateTime<Local>) -> Option<u64> {
        entry.snapshot().map(|s| s.len())
    }

    /// Modification timestamp.
    pub fn modified(entry: &Entry, _reference: DateTime<Local>) -> Option<SystemTime> {
        entry.snapshot().map(|s| s.modified())
    }

    /// Creation timestamp, where the platform reports one.
    pub fn created(entry: &Entry, _reference: DateTime<Local>) -> Option<SystemTime> {
        entry.snapshot().and_then(|s| s.created())
    }

    /// Access timestamp, where the platform reports one.
    pub fn accessed(entry: &Entry, _reference: DateTime<Local>) -> Option<SystemTime> {
        entry.snapshot().and_then(|s| s.accessed())
    }
}
