use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use chrono::{DateTime, Local};
use crossbeam_channel::{bounded, Receiver, Sender};
use ignore::WalkBuilder;

use crate::entry::{Entry, EntryKind};
use crate::error::QueryError;
use crate::predicate::{Expr, Predicate};

// ---------------------------------------------------------------------------
// Engine options
// ---------------------------------------------------------------------------

/// Traversal parameters passed from the query builder to the engine.
///
/// `pub(crate)`: not part of the public API. Callers configure these via
/// the builder methods (`.recursive()`, `.files_only()`, `.threaded()`,
/// `.queue_capacity()`).
pub(crate) struct EngineOptions {
    pub recursive: bool,
    pub files_only: bool,
    pub threaded: bool,
    pub queue_capacity: usize,
}

// ---------------------------------------------------------------------------
// Walk construction
// ---------------------------------------------------------------------------

fn build_walk(root: &Path, recursive: bool) -> ignore::Walk {
    let mut builder = WalkBuilder::new(root);
    builder
        .standard_filters(false)
        .ignore(false)
        .parents(false)
        .hidden(false)
        .follow_links(false)
        .same_file_system(false)
        // Deterministic lexicographic-per-directory depth-first order, so
        // repeated runs over a static tree yield identical sequences.
        .sort_by_file_path(|a, b| a.cmp(b));

    if !recursive {
        builder.max_depth(Some(1));
    }

    builder.build()
}

/// Chains sequential walks over each root, in root order.
struct MultiWalk {
    pending: std::vec::IntoIter<ignore::Walk>,
    current: Option<ignore::Walk>,
}

impl MultiWalk {
    fn new(roots: &[PathBuf], recursive: bool) -> Self {
        let walks: Vec<_> = roots.iter().map(|r| build_walk(r, recursive)).collect();
        let mut pending = walks.into_iter();
        let current = pending.next();
        Self { pending, current }
    }
}

impl Iterator for MultiWalk {
    type Item = Result<ignore::DirEntry, ignore::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let walk = self.current.as_mut()?;
            match walk.next() {
                Some(item) => return Some(item),
                None => self.current = self.pending.next(),
            }
        }
    }
}

/// Build an [`Entry`] for a discovered path, or `None` when the entry is
/// the walk root or filtered out by `files_only`.
fn candidate(dir_entry: ignore::DirEntry, files_only: bool) -> Option<Entry> {
    if dir_entry.depth() == 0 {
        return None;
    }
    let kind = match dir_entry.file_type() {
        Some(ft) if ft.is_dir() => EntryKind::Dir,
        Some(ft) if ft.is_file() => EntryKind::File,
        Some(ft) if ft.is_symlink() => EntryKind::Symlink,
        _ => EntryKind::Other,
    };
    if files_only && kind != EntryKind::File {
        return None;
    }
    Some(Entry::with_kind(dir_entry.into_path(), kind))
}

// ---------------------------------------------------------------------------
// Pipelined producer
// ---------------------------------------------------------------------------

enum WalkMessage {
    Entry(Entry),
    /// Enumeration finished; distinct from channel disconnection so the
    /// consumer can tell completion from an aborted producer.
    Done,
}

fn spawn_producer(
    roots: Vec<PathBuf>,
    recursive: bool,
    files_only: bool,
    cancel: Arc<AtomicBool>,
    tx: Sender<WalkMessage>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let walk = MultiWalk::new(&roots, recursive);
        for item in walk {
            if cancel.load(Ordering::Relaxed) {
                return;
            }
            match item {
                Err(err) => {
                    log::debug!("skipping unreadable entry: {err}");
                }
                Ok(dir_entry) => {
                    if let Some(entry) = candidate(dir_entry, files_only) {
                        // A send error means the consumer dropped the
                        // receiver; stop enumerating immediately.
                        if tx.send(WalkMessage::Entry(entry)).is_err() {
                            return;
                        }
                    }
                }
            }
        }
        let _ = tx.send(WalkMessage::Done);
    })
}

// ---------------------------------------------------------------------------
// Matches
// ---------------------------------------------------------------------------

/// Lazy stream of matching paths, yielded in discovery order.
///
/// Created by [`Query::stream`](crate::Query::stream); not restartable.
/// Items are `Ok(path)` for each match; a single final `Err` is yielded if
/// the walk aborts before completing.
///
/// In pipelined mode the stream owns the producer thread. Dropping the
/// stream early (or unwinding through it, e.g. when a caller-supplied
/// predicate panics) signals cancellation, unblocks the producer within
/// one queue operation, and joins it before `drop` returns.
pub struct Matches {
    expr: Expr,
    reference: DateTime<Local>,
    files_only: bool,
    inner: Inner,
}

enum Inner {
    Sequential {
        walk: MultiWalk,
    },
    Pipelined {
        rx: Option<Receiver<WalkMessage>>,
        cancel: Arc<AtomicBool>,
        producer: Option<JoinHandle<()>>,
        finished: bool,
    },
}

impl Matches {
    pub(crate) fn start(
        roots: Vec<PathBuf>,
        opts: EngineOptions,
        expr: Expr,
        reference: DateTime<Local>,
    ) -> Self {
        let inner = if opts.threaded {
            let cancel = Arc::new(AtomicBool::new(false));
            let (tx, rx) = bounded(opts.queue_capacity.max(1));
            let producer = spawn_producer(
                roots,
                opts.recursive,
                opts.files_only,
                Arc::clone(&cancel),
                tx,
            );
            Inner::Pipelined {
                rx: Some(rx),
                cancel,
                producer: Some(producer),
                finished: false,
            }
        } else {
            Inner::Sequential {
                walk: MultiWalk::new(&roots, opts.recursive),
            }
        };

        Self {
            expr,
            reference,
            files_only: opts.files_only,
            inner,
        }
    }

    /// Next candidate entry from the walk, before predicate evaluation.
    fn next_entry(&mut self) -> Option<Result<Entry, QueryError>> {
        match &mut self.inner {
            Inner::Sequential { walk } => loop {
                match walk.next()? {
                    Err(err) => {
                        log::debug!("skipping unreadable entry: {err}");
                    }
                    Ok(dir_entry) => {
                        if let Some(entry) = candidate(dir_entry, self.files_only) {
                            return Some(Ok(entry));
                        }
                    }
                }
            },
            Inner::Pipelined {
                rx,
                producer,
                finished,
                ..
            } => {
                if *finished {
                    return None;
                }
                let message = match rx.as_ref() {
                    Some(receiver) => receiver.recv(),
                    None => return None,
                };
                match message {
                    Ok(WalkMessage::Entry(entry)) => Some(Ok(entry)),
                    Ok(WalkMessage::Done) => {
                        *finished = true;
                        rx.take();
                        if let Some(handle) = producer.take() {
                            let _ = handle.join();
                        }
                        None
                    }
                    // Disconnected without a Done marker: the producer died
                    // mid-walk. Surface it after the matches already
                    // delivered.
                    Err(_) => {
                        *finished = true;
                        rx.take();
                        if let Some(handle) = producer.take() {
                            let _ = handle.join();
                        }
                        Some(Err(QueryError::WalkAborted(
                            "walker thread exited before signalling completion".to_string(),
                        )))
                    }
                }
            }
        }
    }

    /// Next matching entry, with its (possibly already populated) snapshot.
    pub(crate) fn next_match(&mut self) -> Option<Result<Entry, QueryError>> {
        loop {
            match self.next_entry()? {
                Err(err) => return Some(Err(err)),
                Ok(entry) => {
                    if self.expr.evaluate(&entry, self.reference) {
                        return Some(Ok(entry));
                    }
                }
            }
        }
    }
}

impl Iterator for Matches {
    type Item = Result<PathBuf, QueryError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_match()
            .map(|item| item.map(Entry::into_path))
    }
}

impl Drop for Matches {
    fn drop(&mut self) {
        if let Inner::Pipelined {
            rx,
            cancel,
            producer,
            ..
        } = &mut self.inner
        {
            cancel.store(true, Ordering::Relaxed);
            // Dropping the receiver fails any blocked send, so the producer
            // is released within a bounded number of queue operations.
            drop(rx.take());
            if let Some(handle) = producer.take() {
                let _ = handle.join();
            }
        }
    }
}
