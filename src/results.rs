use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::entry::{Entry, EntryKind};

// ---------------------------------------------------------------------------
// Field
// ---------------------------------------------------------------------------

/// A derived field of a matched entry, used for sorting and aggregation.
///
/// Timestamps come in two representations: `Mtime`/`Ctime`/`Atime` as epoch
/// seconds and `MtimeAt`/`CtimeAt`/`AtimeAt` as local datetimes. Both sort
/// identically; the numeric aggregations operate on epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Size,
    Mtime,
    Ctime,
    Atime,
    MtimeAt,
    CtimeAt,
    AtimeAt,
    Name,
    Stem,
    Suffix,
    Path,
    Parent,
}

impl Field {
    fn is_numeric(self) -> bool {
        matches!(
            self,
            Field::Size
                | Field::Mtime
                | Field::Ctime
                | Field::Atime
                | Field::MtimeAt
                | Field::CtimeAt
                | Field::AtimeAt
        )
    }
}

/// Sort direction for [`ResultSet::sorted_by`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

// ---------------------------------------------------------------------------
// MatchRecord
// ---------------------------------------------------------------------------

/// One matched entry with its derived fields captured at match time.
///
/// Fields that could not be read (vanished entry, platform without a
/// creation time) are `None`; aggregation skips them.
#[derive(Debug, Clone)]
pub struct MatchRecord {
    path: PathBuf,
    name: String,
    stem: Option<String>,
    suffix: Option<String>,
    size: Option<u64>,
    modified: Option<DateTime<Local>>,
    created: Option<DateTime<Local>>,
    accessed: Option<DateTime<Local>>,
    kind: EntryKind,
}

impl MatchRecord {
    pub(crate) fn from_entry(entry: &Entry) -> Self {
        let name = entry.name().to_string();
        let name_path = Path::new(&name);
        let stem = name_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned());
        let suffix = name_path
            .extension()
            .map(|s| s.to_string_lossy().into_owned());

        let snap = entry.snapshot();
        Self {
            kind: entry.kind(),
            size: snap.map(|s| s.len()),
            modified: snap.map(|s| s.modified_at()),
            created: snap.and_then(|s| s.created_at()),
            accessed: snap.and_then(|s| s.accessed_at()),
            path: entry.path().to_path_buf(),
            name,
            stem,
            suffix,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Filename without its final extension.
    pub fn stem(&self) -> Option<&str> {
        self.stem.as_deref()
    }

    /// Final extension without the dot.
    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }

    pub fn size(&self) -> Option<u64> {
        self.size
    }

    pub fn modified(&self) -> Option<DateTime<Local>> {
        self.modified
    }

    pub fn created(&self) -> Option<DateTime<Local>> {
        self.created
    }

    pub fn accessed(&self) -> Option<DateTime<Local>> {
        self.accessed
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Ancestor directories, from the immediate parent up to the root.
    pub fn parents(&self) -> impl Iterator<Item = &Path> {
        self.path.ancestors().skip(1)
    }

    /// Numeric view of a field: size in bytes or a timestamp in epoch
    /// seconds. `None` for text fields or missing values.
    pub fn numeric(&self, field: Field) -> Option<f64> {
        match field {
            Field::Size => self.size.map(|s| s as f64),
            Field::Mtime | Field::MtimeAt => self.modified.map(|t| t.timestamp() as f64),
            Field::Ctime | Field::CtimeAt => self.created.map(|t| t.timestamp() as f64),
            Field::Atime | Field::AtimeAt => self.accessed.map(|t| t.timestamp() as f64),
            _ => None,
        }
    }

    /// Text view of a field. `None` for numeric fields or missing values.
    pub fn text(&self, field: Field) -> Option<String> {
        match field {
            Field::Name => Some(self.name.clone()),
            Field::Stem => self.stem.clone(),
            Field::Suffix => self.suffix.clone(),
            Field::Path => Some(self.path.display().to_string()),
            Field::Parent => self.path.parent().map(|p| p.display().to_string()),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// ResultSet
// ---------------------------------------------------------------------------

/// Materialized, ordered collection of matches (discovery order) with
/// aggregation over the fields captured at match time.
///
/// Immutable once built: sorting and top/bottom-N selection produce new
/// sets rather than mutating in place.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    rows: Vec<MatchRecord>,
}

impl ResultSet {
    pub(crate) fn new(rows: Vec<MatchRecord>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn records(&self) -> &[MatchRecord] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MatchRecord> {
        self.rows.iter()
    }

    /// Matched paths, in order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.rows.iter().map(|r| r.path())
    }

    /// Consume the set into its matched paths, in order. Useful for
    /// feeding batch actions.
    pub fn into_paths(self) -> Vec<PathBuf> {
        self.rows.into_iter().map(|r| r.path).collect()
    }

    // ── Aggregation ───────────────────────────────────────────────────────

    fn numeric_column(&self, field: Field) -> Vec<f64> {
        self.rows.iter().filter_map(|r| r.numeric(field)).collect()
    }

    pub fn min(&self, field: Field) -> Option<f64> {
        self.numeric_column(field).into_iter().reduce(f64::min)
    }

    pub fn max(&self, field: Field) -> Option<f64> {
        self.numeric_column(field).into_iter().reduce(f64::max)
    }

    pub fn mean(&self, field: Field) -> Option<f64> {
        let column = self.numeric_column(field);
        if column.is_empty() {
            return None;
        }
        Some(column.iter().sum::<f64>() / column.len() as f64)
    }

    /// Median of the field's numeric values; the average of the two middle
    /// values for even-sized columns.
    pub fn median(&self, field: Field) -> Option<f64> {
        let mut column = self.numeric_column(field);
        if column.is_empty() {
            return None;
        }
        column.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        let mid = column.len() / 2;
        if column.len() % 2 == 1 {
            Some(column[mid])
        } else {
            Some((column[mid - 1] + column[mid]) / 2.0)
        }
    }

    // ── Ordering views ────────────────────────────────────────────────────

    fn compare(a: &MatchRecord, b: &MatchRecord, field: Field) -> Ordering {
        if field.is_numeric() {
            // Missing values sort first; the column never holds NaN.
            a.numeric(field)
                .partial_cmp(&b.numeric(field))
                .unwrap_or(Ordering::Equal)
        } else {
            a.text(field).cmp(&b.text(field))
        }
    }

    /// A new set sorted by `field`. Stable: ties keep discovery order.
    pub fn sorted_by(&self, field: Field, order: SortOrder) -> ResultSet {
        let mut rows = self.rows.clone();
        rows.sort_by(|a, b| {
            let ord = Self::compare(a, b, field);
            match order {
                SortOrder::Ascending => ord,
                SortOrder::Descending => ord.reverse(),
            }
        });
        ResultSet { rows }
    }

    /// The `n` largest records by `field`, as a new set.
    pub fn top(&self, n: usize, field: Field) -> ResultSet {
        let mut sorted = self.sorted_by(field, SortOrder::Descending);
        sorted.rows.truncate(n);
        sorted
    }

    /// The `n` smallest records by `field`, as a new set.
    pub fn bottom(&self, n: usize, field: Field) -> ResultSet {
        let mut sorted = self.sorted_by(field, SortOrder::Ascending);
        sorted.rows.truncate(n);
        sorted
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a MatchRecord;
    type IntoIter = std::slice::Iter<'a, MatchRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl IntoIterator for ResultSet {
    type Item = MatchRecord;
    type IntoIter = std::vec::IntoIter<MatchRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}
