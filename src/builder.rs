use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::engine::{EngineOptions, Matches};
use crate::entry::{Entry, MetadataSnapshot};
use crate::error::QueryError;
use crate::predicate::{Expr, Predicate};
use crate::results::{MatchRecord, ResultSet};

/// Default capacity of the producer/consumer queue in pipelined mode.
/// Small on purpose: it bounds in-flight entries, not throughput.
const DEFAULT_QUEUE_CAPACITY: usize = 10;

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// A filesystem query: root paths, a predicate expression, and traversal
/// options.
///
/// Created via [`pathq::query()`](crate::query). Configure with chained
/// builder methods, then call [`stream()`](Query::stream) for lazy
/// iteration or [`collect()`](Query::collect) for a materialized
/// [`ResultSet`].
///
/// # Example
///
/// ```rust,ignore
/// let old_logs = pathq::query()
///     .from_path("/var/log")
///     .filter(filters::suffix(".log")? & filters::age(AgeUnit::Days, CompareOp::Ge, 30.0)?)
///     .collect()?;
/// ```
#[derive(Debug)]
pub struct Query {
    roots: Vec<PathBuf>,
    expr: Expr,
    recursive: bool,
    files_only: bool,
    threaded: bool,
    reference: Option<DateTime<Local>>,
    queue_capacity: usize,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            roots: vec![PathBuf::from(".")],
            expr: Expr::always(),
            recursive: true,
            files_only: true,
            threaded: true,
            reference: None,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl Query {
    // ── Sources ───────────────────────────────────────────────────────────

    /// Search under a single root directory.
    pub fn from_path(mut self, root: impl Into<PathBuf>) -> Self {
        self.roots = vec![root.into()];
        self
    }

    /// Search under several roots, traversed in the given order.
    pub fn from_paths<I, P>(mut self, roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.roots = roots.into_iter().map(Into::into).collect();
        self
    }

    // ── Predicate ─────────────────────────────────────────────────────────

    /// Set the predicate expression. Defaults to matching everything.
    pub fn filter(mut self, expr: Expr) -> Self {
        self.expr = expr;
        self
    }

    // ── Options ───────────────────────────────────────────────────────────

    /// Descend into subdirectories (default) or stay at one level.
    pub fn recursive(mut self, yes: bool) -> Self {
        self.recursive = yes;
        self
    }

    /// Yield only regular files (default), or every entry kind.
    pub fn files_only(mut self, yes: bool) -> Self {
        self.files_only = yes;
        self
    }

    /// Overlap the directory walk with predicate evaluation using a
    /// producer thread and a bounded queue (default), or walk inline.
    /// Both modes yield identical sequences for a static tree.
    pub fn threaded(mut self, yes: bool) -> Self {
        self.threaded = yes;
        self
    }

    /// Fix the reference time used by all time-relative predicates.
    /// Without this, the clock is read once when the traversal starts.
    pub fn at_time(mut self, reference: DateTime<Local>) -> Self {
        self.reference = Some(reference);
        self
    }

    /// Capacity of the producer/consumer queue in pipelined mode.
    /// Values below 1 are clamped to 1.
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    // ── Single-path matching ──────────────────────────────────────────────

    /// Evaluate the predicate against one already-known path.
    pub fn matches(&self, path: impl AsRef<Path>) -> bool {
        self.matches_with(path, None, None)
    }

    /// Evaluate against one path with an explicit reference time and/or a
    /// caller-supplied snapshot (avoiding any metadata fetch).
    pub fn matches_with(
        &self,
        path: impl AsRef<Path>,
        reference: Option<DateTime<Local>>,
        snapshot: Option<MetadataSnapshot>,
    ) -> bool {
        let reference = reference.or(self.reference).unwrap_or_else(Local::now);
        let entry = match snapshot {
            Some(snap) => Entry::with_snapshot(path.as_ref(), snap),
            None => Entry::new(path.as_ref()),
        };
        self.expr.evaluate(&entry, reference)
    }

    // ── Execution ─────────────────────────────────────────────────────────

    /// Start the traversal and return the lazy match stream.
    ///
    /// The reference time is fixed here and never advances mid-traversal.
    ///
    /// # Errors
    ///
    /// Fails when any root does not exist or cannot be statted. Per-entry
    /// errors during the walk are skipped, not surfaced.
    pub fn stream(&self) -> Result<Matches, QueryError> {
        for root in &self.roots {
            if let Err(err) = fs::metadata(root) {
                return Err(if err.kind() == io::ErrorKind::NotFound {
                    QueryError::RootNotFound(root.clone())
                } else {
                    QueryError::RootUnreadable {
                        path: root.clone(),
                        source: err,
                    }
                });
            }
        }

        let reference = self.reference.unwrap_or_else(Local::now);
        let opts = EngineOptions {
            recursive: self.recursive,
            files_only: self.files_only,
            threaded: self.threaded,
            queue_capacity: self.queue_capacity,
        };
        Ok(Matches::start(
            self.roots.clone(),
            opts,
            self.expr.clone(),
            reference,
        ))
    }

    /// Drain the stream into a materialized, ordered [`ResultSet`].
    ///
    /// Each match's derived fields are captured from its snapshot at match
    /// time; aggregation on the result set never re-stats.
    pub fn collect(&self) -> Result<ResultSet, QueryError> {
        let mut stream = self.stream()?;
        let mut rows = Vec::new();
        while let Some(item) = stream.next_match() {
            let entry = item?;
            rows.push(MatchRecord::from_entry(&entry));
        }
        Ok(ResultSet::new(rows))
    }
}
