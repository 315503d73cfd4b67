//! # pathq
//!
//! Lazy filesystem query engine: composable predicates over a bounded
//! producer/consumer walk.
//!
//! pathq answers "which filesystem entries do I want" questions. A query
//! combines root paths, a predicate expression built from the [`filters`]
//! constructors (or any custom [`Predicate`]), and traversal options. The
//! engine walks the tree, stats each entry at most once and only when a
//! predicate needs it, and yields matches lazily, either inline or
//! overlapped with the walk through a bounded queue.
//!
//! # Quick Start
//!
//! ```rust
//! use pathq::{filters, query, CompareOp};
//!
//! let dir = tempfile::tempdir().unwrap();
//! std::fs::write(dir.path().join("a.txt"), vec![0u8; 500]).unwrap();
//! std::fs::write(dir.path().join("b.txt"), vec![0u8; 2000]).unwrap();
//! std::fs::write(dir.path().join("c.log"), vec![0u8; 500]).unwrap();
//!
//! let results = query()
//!     .from_path(dir.path())
//!     .filter(filters::suffix(".txt").unwrap() & filters::size(CompareOp::Le, "1 kb").unwrap())
//!     .collect()
//!     .unwrap();
//!
//! assert_eq!(results.len(), 1);
//! assert_eq!(results.records()[0].name(), "a.txt");
//! ```
//!
//! # Composition
//!
//! Filters compose with `&`, `|` and `!` (Rust's native precedence;
//! parenthesize for grouping) or with the explicit [`Expr::all`] /
//! [`Expr::any`] constructors. Evaluation short-circuits: the right side
//! of an `&` is never evaluated once the left side is false.
//!
//! ```rust
//! use pathq::filters::{self, AgeUnit};
//! use pathq::CompareOp;
//!
//! let stale_media = filters::suffix("{png,bmp}").unwrap()
//!     & filters::age(AgeUnit::Days, CompareOp::Ge, 30.0).unwrap();
//! let keep = !stale_media;
//! # let _ = keep;
//! ```
//!
//! # Custom Predicates
//!
//! Implement [`Predicate`] (or lift a closure with [`predicate_fn`]) and
//! compose it like any built-in filter:
//!
//! ```rust
//! use pathq::{predicate_fn, query};
//!
//! let q = query().filter(predicate_fn(|entry, _now| {
//!     entry.name().chars().any(|c| c.is_ascii_digit())
//! }));
//! assert!(q.matches("report_2024.txt"));
//! assert!(!q.matches("notes.txt"));
//! ```

#![forbid(unsafe_code)]

pub mod actions;
pub mod filters;

mod builder;
mod engine;
mod entry;
mod error;
mod predicate;
mod results;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use builder::Query;
pub use engine::Matches;
pub use entry::{Entry, EntryKind, MetadataSnapshot, TimeField};
pub use error::QueryError;
pub use filters::CompareOp;
pub use predicate::{predicate_fn, Expr, Predicate};
pub use results::{Field, MatchRecord, ResultSet, SortOrder};

// ── Entry point ───────────────────────────────────────────────────────────────

/// Create a new [`Query`] to configure and run.
///
/// # Example
///
/// ```rust
/// use pathq::{filters, query};
///
/// let q = query().filter(filters::name("invoice_*").unwrap());
/// assert!(q.matches("invoice_jan.txt"));
/// assert!(!q.matches("report.txt"));
/// ```
pub fn query() -> Query {
    Query::default()
}
