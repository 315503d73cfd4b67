//! Datetime-part filters.
//!
//! A calendar filter matches entries whose selected timestamp falls in the
//! same calendar bucket as a shifted base datetime. The base defaults to
//! the traversal's reference time; the offset is applied at the filter's
//! own granularity, so `calendar(DatePart::Month).offset(-1)` means "the
//! calendar month before the base", with year rollover handled by the
//! month arithmetic (and day-of-month clamped at short months).
//!
//! Matching compares every calendar field from the year down through the
//! filter's granularity: an Hour filter requires year, month, day and hour
//! to all agree, not just the hour number.

use chrono::{DateTime, Datelike, Duration, Local, Months, NaiveDateTime, Timelike};

use crate::entry::{Entry, TimeField};
use crate::predicate::{Expr, Predicate};

/// Calendar granularity of a datetime-part filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DatePart {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for a datetime-part filter, created by [`calendar`].
///
/// # Example
///
/// ```rust
/// use chrono::{Local, TimeZone};
/// use pathq::filters::{calendar, DatePart};
///
/// let june = Local.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap();
/// // Entries modified anywhere in May 2023.
/// let last_month = calendar(DatePart::Month).base(june).offset(-1).build();
/// # let _ = last_month;
/// ```
#[derive(Debug, Clone)]
pub struct Calendar {
    part: DatePart,
    field: TimeField,
    base: Option<DateTime<Local>>,
    offset: i32,
}

/// Start building a datetime-part filter at the given granularity.
///
/// Defaults: base = the traversal's reference time, offset = 0, timestamp
/// selector = modification time.
pub fn calendar(part: DatePart) -> Calendar {
    Calendar {
        part,
        field: TimeField::Modified,
        base: None,
        offset: 0,
    }
}

impl Calendar {
    /// Fix the base datetime instead of using the reference time.
    pub fn base(mut self, base: DateTime<Local>) -> Self {
        self.base = Some(base);
        self
    }

    /// Shift the base by `offset` units of the filter's own granularity.
    pub fn offset(mut self, offset: i32) -> Self {
        self.offset = offset;
        self
    }

    /// Select which timestamp to test (modified by default).
    pub fn field(mut self, field: TimeField) -> Self {
        self.field = field;
        self
    }

    pub fn build(self) -> Expr {
        Expr::leaf(CalendarFilter {
            part: self.part,
            field: self.field,
            base: self.base,
            offset: self.offset,
        })
    }
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

struct CalendarFilter {
    part: DatePart,
    field: TimeField,
    base: Option<DateTime<Local>>,
    offset: i32,
}

impl Predicate for CalendarFilter {
    fn evaluate(&self, entry: &Entry, reference: DateTime<Local>) -> bool {
        let Some(snap) = entry.snapshot() else {
            return false;
        };
        let Some(ts) = snap.timestamp(self.field) else {
            return false;
        };

        let base = self.base.unwrap_or(reference).naive_local();
        let Some(shifted) = shift(base, self.part, self.offset) else {
            return false;
        };
        let value = DateTime::<Local>::from(ts).naive_local();
        parts_match(value, shifted, self.part)
    }
}

fn shift(base: NaiveDateTime, part: DatePart, offset: i32) -> Option<NaiveDateTime> {
    if offset == 0 {
        return Some(base);
    }
    match part {
        DatePart::Year | DatePart::Month => {
            let months = i64::from(offset) * if part == DatePart::Year { 12 } else { 1 };
            let span = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
            if months >= 0 {
                base.checked_add_months(span)
            } else {
                base.checked_sub_months(span)
            }
        }
        DatePart::Day => base.checked_add_signed(Duration::days(offset.into())),
        DatePart::Hour => base.checked_add_signed(Duration::hours(offset.into())),
        DatePart::Minute => base.checked_add_signed(Duration::minutes(offset.into())),
        DatePart::Second => base.checked_add_signed(Duration::seconds(offset.into())),
    }
}

fn parts_match(value: NaiveDateTime, shifted: NaiveDateTime, part: DatePart) -> bool {
    if value.year() != shifted.year() {
        return false;
    }
    if part == DatePart::Year {
        return true;
    }
    if value.month() != shifted.month() {
        return false;
    }
    if part == DatePart::Month {
        return true;
    }
    if value.day() != shifted.day() {
        return false;
    }
    if part == DatePart::Day {
        return true;
    }
    if value.hour() != shifted.hour() {
        return false;
    }
    if part == DatePart::Hour {
        return true;
    }
    if value.minute() != shifted.minute() {
        return false;
    }
    if part == DatePart::Minute {
        return true;
    }
    value.second() == shifted.second()
}
