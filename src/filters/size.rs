//! Size filters: byte-count comparison with human-readable magnitudes.

use chrono::{DateTime, Local};

use super::CompareOp;
use crate::entry::Entry;
use crate::error::QueryError;
use crate::predicate::{Expr, Predicate};

struct SizeFilter {
    op: CompareOp,
    bytes: u64,
}

impl Predicate for SizeFilter {
    fn evaluate(&self, entry: &Entry, _reference: DateTime<Local>) -> bool {
        match entry.snapshot() {
            Some(snap) => self.op.apply(&snap.len(), &self.bytes),
            None => false,
        }
    }
}

/// Compare entry size against a human-readable magnitude such as
/// `"500"`, `"10 mb"` or `"1.5GiB"`. Units are 1024-based.
///
/// # Errors
///
/// Fails at construction when the magnitude or its unit cannot be parsed.
pub fn size(op: CompareOp, magnitude: &str) -> Result<Expr, QueryError> {
    Ok(size_bytes(op, parse_size(magnitude)?))
}

/// Compare entry size against an exact byte count.
pub fn size_bytes(op: CompareOp, bytes: u64) -> Expr {
    Expr::leaf(SizeFilter { op, bytes })
}

// ---------------------------------------------------------------------------
// Magnitude parsing
// ---------------------------------------------------------------------------

pub(crate) fn parse_size(raw: &str) -> Result<u64, QueryError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(QueryError::InvalidSize(raw.to_string()));
    }

    let split = trimmed
        .char_indices()
        .find(|(_, ch)| !ch.is_ascii_digit() && *ch != '.')
        .map(|(idx, _)| idx)
        .unwrap_or(trimmed.len());
    let (number_part, unit_part) = trimmed.split_at(split);
    if number_part.is_empty() {
        return Err(QueryError::InvalidSize(raw.to_string()));
    }

    let value: f64 = number_part
        .parse()
        .map_err(|_| QueryError::InvalidSize(raw.to_string()))?;
    let multiplier = unit_multiplier(unit_part.trim(), raw)?;

    let bytes = (value * multiplier as f64).round();
    if !bytes.is_finite() || bytes < 0.0 {
        return Err(QueryError::InvalidSize(raw.to_string()));
    }
    if bytes > u64::MAX as f64 {
        return Ok(u64::MAX);
    }
    Ok(bytes as u64)
}

fn unit_multiplier(unit: &str, raw: &str) -> Result<u64, QueryError> {
    match unit.to_ascii_lowercase().as_str() {
        "" | "b" | "byte" | "bytes" => Ok(1),
        "k" | "kb" | "kib" | "kilobyte" | "kilobytes" => Ok(1024),
        "m" | "mb" | "mib" | "megabyte" | "megabytes" => Ok(1024 * 1024),
        "g" | "gb" | "gib" | "gigabyte" | "gigabytes" => Ok(1024 * 1024 * 1024),
        "t" | "tb" | "tib" | "terabyte" | "terabytes" => Ok(1024_u64.pow(4)),
        "p" | "pb" | "pib" | "petabyte" | "petabytes" => Ok(1024_u64.pow(5)),
        _ => Err(QueryError::InvalidSize(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_bytes() {
        assert_eq!(parse_size("500").unwrap(), 500);
        assert_eq!(parse_size("0").unwrap(), 0);
    }

    #[test]
    fn parses_units_with_and_without_space() {
        assert_eq!(parse_size("10 mb").unwrap(), 10 * 1024 * 1024);
        assert_eq!(parse_size("10mb").unwrap(), 10 * 1024 * 1024);
        assert_eq!(parse_size("2GB").unwrap(), 2 * 1024 * 1024 * 1024);
    }

    #[test]
    fn parses_fractional_magnitudes() {
        assert_eq!(parse_size("1.5 kb").unwrap(), 1536);
    }

    #[test]
    fn rejects_unknown_unit() {
        assert!(matches!(
            parse_size("10 lightyears"),
            Err(QueryError::InvalidSize(_))
        ));
    }

    #[test]
    fn rejects_empty_and_unitless_garbage() {
        assert!(parse_size("").is_err());
        assert!(parse_size("mb").is_err());
    }
}
