//! Filename-embedded date filters.
//!
//! Archive-style names often carry a sortable date prefix:
//! `2023-05-10_07_backup.zip`, `2023-05_report.txt`, `2023-notes.md`.
//! These filters read the entry's age from that prefix instead of from
//! filesystem timestamps. A name without a parseable prefix is a
//! non-match, never an error.

use std::sync::OnceLock;

use chrono::offset::LocalResult;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use regex::Regex;

use super::age::{inclusive_op, AgeUnit};
use super::CompareOp;
use crate::entry::Entry;
use crate::error::QueryError;
use crate::predicate::{Expr, Predicate};

/// Date components extracted from a filename prefix. Missing components
/// are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateNameParts {
    pub year: i32,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub hour: Option<u32>,
}

fn prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // YYYY[-MM[-DD[_HH]]] followed by '_' or '-' separating the date from
    // the rest of the name.
    RE.get_or_init(|| {
        Regex::new(r"^(\d{4})(?:-(\d{2}))?(?:-(\d{2}))?(?:_(\d{2}))?[_-]")
            .expect("valid date-prefix regex")
    })
}

/// Extract `YYYY[-MM[-DD[_HH]]]` components from the front of a filename.
pub fn extract_date_parts(name: &str) -> Option<DateNameParts> {
    let caps = prefix_re().captures(name)?;
    let part = |idx: usize| -> Option<u32> { caps.get(idx).and_then(|m| m.as_str().parse().ok()) };
    Some(DateNameParts {
        year: caps.get(1)?.as_str().parse().ok()?,
        month: part(2),
        day: part(3),
        hour: part(4),
    })
}

// ---------------------------------------------------------------------------
// Filename age filter
// ---------------------------------------------------------------------------

struct NameAgeFilter {
    op: CompareOp,
    unit: AgeUnit,
    value: f64,
}

impl Predicate for NameAgeFilter {
    fn evaluate(&self, entry: &Entry, reference: DateTime<Local>) -> bool {
        let Some(parts) = extract_date_parts(entry.name()) else {
            return false;
        };
        // Missing components default to the earliest instant they cover.
        let Some(date) =
            NaiveDate::from_ymd_opt(parts.year, parts.month.unwrap_or(1), parts.day.unwrap_or(1))
        else {
            return false;
        };
        let Some(naive) = date.and_hms_opt(parts.hour.unwrap_or(0), 0, 0) else {
            return false;
        };
        let Some(stamped) = to_local(naive) else {
            return false;
        };

        let elapsed = reference.signed_duration_since(stamped);
        // Floor division, matching the stat-based age filters' whole-unit view.
        let age = (elapsed.num_seconds() as f64 / self.unit.seconds()).floor();
        self.op.apply(&age, &self.value)
    }
}

fn to_local(naive: NaiveDateTime) -> Option<DateTime<Local>> {
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => None,
    }
}

/// Compare the age encoded in an entry's filename prefix against `value`
/// in the given unit.
///
/// # Errors
///
/// Fails at construction when `op` is `Eq` or `Ne`, like the stat-based
/// age filters.
pub fn name_age(unit: AgeUnit, op: CompareOp, value: f64) -> Result<Expr, QueryError> {
    let op = inclusive_op(op, "filename age filters")?;
    Ok(Expr::leaf(NameAgeFilter { op, unit, value }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_full_prefix() {
        let parts = extract_date_parts("2023-05-10_07_backup.zip").unwrap();
        assert_eq!(parts.year, 2023);
        assert_eq!(parts.month, Some(5));
        assert_eq!(parts.day, Some(10));
        assert_eq!(parts.hour, Some(7));
    }

    #[test]
    fn extracts_partial_prefixes() {
        let parts = extract_date_parts("2023-05_report.txt").unwrap();
        assert_eq!((parts.year, parts.month, parts.day), (2023, Some(5), None));

        let parts = extract_date_parts("2023-notes.md").unwrap();
        assert_eq!((parts.year, parts.month), (2023, None));
    }

    #[test]
    fn rejects_undated_names() {
        assert_eq!(extract_date_parts("report.txt"), None);
        // No separator between the date digits and the rest.
        assert_eq!(extract_date_parts("20230510.txt"), None);
        assert_eq!(extract_date_parts("202-oops.txt"), None);
    }
}
