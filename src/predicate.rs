use std::fmt;
use std::ops::{BitAnd, BitOr, Not};
use std::sync::Arc;

use chrono::{DateTime, Local};

use crate::entry::Entry;

// ---------------------------------------------------------------------------
// Predicate
// ---------------------------------------------------------------------------

/// A boolean test over one filesystem entry.
///
/// Implement this to define custom matching logic; any implementor composes
/// with the built-in filters through [`Expr`].
///
/// # Purity
///
/// `evaluate` must be a pure function of the entry's metadata and the
/// reference time. Combinators are free to skip evaluating a child
/// entirely, so observable side effects would make match results depend on
/// the shape of the expression tree.
///
/// # Thread Safety
///
/// `Send + Sync` are required so predicates can live inside a [`Query`]
/// that is shared or sent across threads.
///
/// [`Query`]: crate::Query
///
/// # Example
///
/// ```rust
/// use chrono::{DateTime, Local};
/// use pathq::{Entry, Predicate};
///
/// struct NonEmpty;
///
/// impl Predicate for NonEmpty {
///     fn evaluate(&self, entry: &Entry, _reference: DateTime<Local>) -> bool {
///         entry.snapshot().map(|s| s.len() > 0).unwrap_or(false)
///     }
/// }
/// ```
pub trait Predicate: Send + Sync {
    /// Returns `true` if the entry satisfies this predicate.
    ///
    /// `reference` is the single timestamp fixed at traversal start; all
    /// time-relative predicates consult it instead of reading the clock.
    fn evaluate(&self, entry: &Entry, reference: DateTime<Local>) -> bool;
}

// ---------------------------------------------------------------------------
// Expr
// ---------------------------------------------------------------------------

/// A predicate expression tree.
///
/// Leaves wrap a [`Predicate`]; combinators own their children. The tree is
/// immutable after construction and cheap to clone (leaves are shared).
///
/// Compose with the `&`, `|` and `!` operators, which follow Rust's native
/// precedence, or with [`Expr::all`] / [`Expr::any`] for explicit grouping:
///
/// ```rust
/// use pathq::filters;
///
/// let txt_or_log = filters::suffix("{txt,log}").unwrap();
/// let small = filters::size_bytes(pathq::CompareOp::Le, 4096);
/// let wanted = txt_or_log & small;
/// # let _ = wanted;
/// ```
#[derive(Clone)]
pub enum Expr {
    Leaf(Arc<dyn Predicate>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
    All(Vec<Expr>),
    Any(Vec<Expr>),
}

impl Expr {
    /// Wrap a predicate as a leaf expression.
    pub fn leaf(predicate: impl Predicate + 'static) -> Self {
        Expr::Leaf(Arc::new(predicate))
    }

    /// An expression that matches every entry (empty conjunction).
    pub fn always() -> Self {
        Expr::All(Vec::new())
    }

    /// An expression that matches no entry (empty disjunction).
    pub fn never() -> Self {
        Expr::Any(Vec::new())
    }

    /// Conjunction over any number of children; true when all pass,
    /// including the empty list.
    pub fn all(children: impl IntoIterator<Item = Expr>) -> Self {
        Expr::All(children.into_iter().collect())
    }

    /// Disjunction over any number of children; false when none pass,
    /// including the empty list.
    pub fn any(children: impl IntoIterator<Item = Expr>) -> Self {
        Expr::Any(children.into_iter().collect())
    }

    /// Named form of `self & other`.
    pub fn and(self, other: Expr) -> Self {
        Expr::And(Box::new(self), Box::new(other))
    }

    /// Named form of `self | other`.
    pub fn or(self, other: Expr) -> Self {
        Expr::Or(Box::new(self), Box::new(other))
    }

    /// Named form of `!self`.
    pub fn negate(self) -> Self {
        Expr::Not(Box::new(self))
    }
}

impl Predicate for Expr {
    fn evaluate(&self, entry: &Entry, reference: DateTime<Local>) -> bool {
        match self {
            Expr::Leaf(p) => p.evaluate(entry, reference),
            // && and || give the required short-circuit: the right side is
            // never evaluated once the left side decides the outcome.
            Expr::And(left, right) => {
                left.evaluate(entry, reference) && right.evaluate(entry, reference)
            }
            Expr::Or(left, right) => {
                left.evaluate(entry, reference) || right.evaluate(entry, reference)
            }
            Expr::Not(child) => !child.evaluate(entry, reference),
            Expr::All(children) => children.iter().all(|c| c.evaluate(entry, reference)),
            Expr::Any(children) => children.iter().any(|c| c.evaluate(entry, reference)),
        }
    }
}

impl BitAnd for Expr {
    type Output = Expr;

    fn bitand(self, rhs: Expr) -> Expr {
        self.and(rhs)
    }
}

impl BitOr for Expr {
    type Output = Expr;

    fn bitor(self, rhs: Expr) -> Expr {
        self.or(rhs)
    }
}

impl Not for Expr {
    type Output = Expr;

    fn not(self) -> Expr {
        self.negate()
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Leaf(_) => f.write_str("Leaf(..)"),
            Expr::And(l, r) => f.debug_tuple("And").field(l).field(r).finish(),
            Expr::Or(l, r) => f.debug_tuple("Or").field(l).field(r).finish(),
            Expr::Not(c) => f.debug_tuple("Not").field(c).finish(),
            Expr::All(cs) => f.debug_tuple("All").field(&cs.len()).finish(),
            Expr::Any(cs) => f.debug_tuple("Any").field(&cs.len()).finish(),
        }
    }
}

// ---------------------------------------------------------------------------
// Closure predicates
// ---------------------------------------------------------------------------

struct FnPredicate<F>(F);

impl<F> Predicate for FnPredicate<F>
where
    F: Fn(&Entry, DateTime<Local>) -> bool + Send + Sync,
{
    fn evaluate(&self, entry: &Entry, reference: DateTime<Local>) -> bool {
        (self.0)(entry, reference)
    }
}

/// Lift a closure into an [`Expr`] leaf.
///
/// # Example
///
/// ```rust
/// use pathq::predicate_fn;
///
/// let has_digit = predicate_fn(|entry, _now| {
///     entry.name().chars().any(|c| c.is_ascii_digit())
/// });
/// # let _ = has_digit;
/// ```
pub fn predicate_fn<F>(f: F) -> Expr
where
    F: Fn(&Entry, DateTime<Local>) -> bool + Send + Sync + 'static,
{
    Expr::leaf(FnPredicate(f))
}
