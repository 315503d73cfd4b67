//! Age filters: time since last modification, in a caller-chosen unit.
//!
//! Age is computed as `reference - modification_time`, so a fixed reference
//! time yields reproducible results no matter how long the traversal runs.
//! Only inclusive comparisons exist for ages: `<` is accepted as an alias
//! for `<=` and `>` for `>=`, while `==` and `!=` are rejected when the
//! filter is built. An exact-equality age query is almost always a bug
//! (sub-second timestamps make it match nothing), so it is a construction
//! error rather than a silently empty result.

use chrono::{DateTime, Local};

use super::CompareOp;
use crate::entry::Entry;
use crate::error::QueryError;
use crate::predicate::{Expr, Predicate};

/// Unit for age comparisons. Years use the 365.25-day average.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeUnit {
    Minutes,
    Hours,
    Days,
    Years,
}

impl AgeUnit {
    pub(crate) fn seconds(self) -> f64 {
        match self {
            AgeUnit::Minutes => 60.0,
            AgeUnit::Hours => 3600.0,
            AgeUnit::Days => 86_400.0,
            AgeUnit::Years => 365.25 * 86_400.0,
        }
    }
}

/// Normalize an age comparison operator: aliases `<` to `<=` and `>` to
/// `>=`, rejects `==` and `!=`.
pub(crate) fn inclusive_op(op: CompareOp, what: &str) -> Result<CompareOp, QueryError> {
    match op {
        CompareOp::Lt | CompareOp::Le => Ok(CompareOp::Le),
        CompareOp::Gt | CompareOp::Ge => Ok(CompareOp::Ge),
        CompareOp::Eq | CompareOp::Ne => Err(QueryError::InvalidPredicate(format!(
            "{} is not supported for {what}; use <= or >= (inclusive)",
            op.symbol()
        ))),
    }
}

struct AgeFilter {
    op: CompareOp,
    unit: AgeUnit,
    value: f64,
}

impl Predicate for AgeFilter {
    fn evaluate(&self, entry: &Entry, reference: DateTime<Local>) -> bool {
        let Some(snap) = entry.snapshot() else {
            return false;
        };
        let elapsed = reference.signed_duration_since(snap.modified_at());
        let age = elapsed.num_seconds() as f64 / self.unit.seconds();
        self.op.apply(&age, &self.value)
    }
}

/// Compare an entry's age (since last modification) against `value` in the
/// given unit.
///
/// # Errors
///
/// Fails at construction when `op` is `Eq` or `Ne`.
pub fn age(unit: AgeUnit, op: CompareOp, value: f64) -> Result<Expr, QueryError> {
    let op = inclusive_op(op, "age filters")?;
    Ok(Expr::leaf(AgeFilter { op, unit, value }))
}
