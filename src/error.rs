use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueryError {
    // Construction
    #[error("invalid predicate: {0}")]
    InvalidPredicate(String),

    #[error("invalid pattern {pattern:?}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("invalid size {0:?}")]
    InvalidSize(String),

    // Traversal start
    #[error("root path not found")]
    RootNotFound(PathBuf),

    #[error("cannot read root path")]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Mid-traversal
    #[error("traversal aborted: {0}")]
    WalkAborted(String),
}

impl QueryError {
    /// The path this error occurred at, if applicable.
    /// Callers use this to present "Skipped: <path>" without pattern matching on variants.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::RootNotFound(p) | Self::RootUnreadable { path: p, .. } => Some(p),
            _ => None,
        }
    }

    /// Whether the error was raised while building a predicate, as opposed
    /// to running a traversal.
    pub fn is_construction(&self) -> bool {
        matches!(
            self,
            Self::InvalidPredicate(_) | Self::InvalidPattern { .. } | Self::InvalidSize(_)
        )
    }
}
