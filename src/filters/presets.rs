//! Ready-made calendar compositions for common time buckets.
//!
//! All presets resolve their base against the traversal's reference time
//! at evaluation, so a query fixed with `at_time` stays reproducible.

use super::calendar::{calendar, DatePart};
use crate::entry::TimeField;
use crate::predicate::Expr;

pub fn modified_this_minute() -> Expr {
    calendar(DatePart::Minute).build()
}

pub fn modified_this_hour() -> Expr {
    calendar(DatePart::Hour).build()
}

pub fn modified_today() -> Expr {
    calendar(DatePart::Day).build()
}

pub fn modified_yesterday() -> Expr {
    calendar(DatePart::Day).offset(-1).build()
}

pub fn modified_this_month() -> Expr {
    calendar(DatePart::Month).build()
}

pub fn modified_this_year() -> Expr {
    calendar(DatePart::Year).build()
}

pub fn created_this_minute() -> Expr {
    calendar(DatePart::Minute).field(TimeField::Created).build()
}

pub fn created_this_hour() -> Expr {
    calendar(DatePart::Hour).field(TimeField::Created).build()
}

pub fn created_today() -> Expr {
    calendar(DatePart::Day).field(TimeField::Created).build()
}

pub fn created_yesterday() -> Expr {
    calendar(DatePart::Day)
        .offset(-1)
        .field(TimeField::Created)
        .build()
}

pub fn created_this_month() -> Expr {
    calendar(DatePart::Month).field(TimeField::Created).build()
}

pub fn created_this_year() -> Expr {
    calendar(DatePart::Year).field(TimeField::Created).build()
}
