use std::cell::OnceCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Local};

// ---------------------------------------------------------------------------
// EntryKind
// ---------------------------------------------------------------------------

/// The kind of a filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A regular file.
    File,

    /// A directory.
    Dir,

    /// A symbolic link (not followed when classifying).
    Symlink,

    /// Anything else (device files, pipes, sockets, etc.).
    Other,
}

/// Selects one of the three timestamps carried by a [`MetadataSnapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeField {
    Modified,
    Created,
    Accessed,
}

// ---------------------------------------------------------------------------
// MetadataSnapshot
// ---------------------------------------------------------------------------

/// An immutable bundle of OS-level facts about one entry.
///
/// Snapshots are captured at most once per entry per traversal (see
/// [`Entry::snapshot`]) and are never shared across entries. Creation and
/// access times are optional because not every platform or filesystem
/// reports them.
#[derive(Debug, Clone, Copy)]
pub struct MetadataSnapshot {
    len: u64,
    modified: SystemTime,
    created: Option<SystemTime>,
    accessed: Option<SystemTime>,
    kind: EntryKind,
}

impl MetadataSnapshot {
    /// Stat `path` without following symlinks and capture a snapshot.
    pub fn capture(path: &Path) -> io::Result<Self> {
        let meta = fs::symlink_metadata(path)?;
        Ok(Self::from(&meta))
    }

    /// Size of the entry in bytes.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether the entry is zero bytes long.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn modified(&self) -> SystemTime {
        self.modified
    }

    pub fn created(&self) -> Option<SystemTime> {
        self.created
    }

    pub fn accessed(&self) -> Option<SystemTime> {
        self.accessed
    }

    /// The timestamp selected by `field`, if the platform reported it.
    pub fn timestamp(&self, field: TimeField) -> Option<SystemTime> {
        match field {
            TimeField::Modified => Some(self.modified),
            TimeField::Created => self.created,
            TimeField::Accessed => self.accessed,
        }
    }

    /// Modification time as a local datetime.
    pub fn modified_at(&self) -> DateTime<Local> {
        DateTime::<Local>::from(self.modified)
    }

    pub fn created_at(&self) -> Option<DateTime<Local>> {
        self.created.map(DateTime::<Local>::from)
    }

    pub fn accessed_at(&self) -> Option<DateTime<Local>> {
        self.accessed.map(DateTime::<Local>::from)
    }
}

impl From<&fs::Metadata> for MetadataSnapshot {
    fn from(meta: &fs::Metadata) -> Self {
        let ft = meta.file_type();
        let kind = if ft.is_file() {
            EntryKind::File
        } else if ft.is_dir() {
            EntryKind::Dir
        } else if ft.is_symlink() {
            EntryKind::Symlink
        } else {
            EntryKind::Other
        };

        Self {
            len: meta.len(),
            modified: meta.modified().unwrap_or(UNIX_EPOCH),
            created: meta.created().ok(),
            accessed: meta.accessed().ok(),
            kind,
        }
    }
}

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

/// A single filesystem entry under evaluation.
///
/// The snapshot cell enforces the at-most-one-fetch invariant: metadata is
/// never read until a predicate asks for it, and once read it is reused for
/// every subsequent check against this entry. Entries are created when the
/// walk discovers a path and discarded once the match decision is made.
pub struct Entry {
    path: PathBuf,
    name: String,
    kind_hint: Option<EntryKind>,
    snapshot: OnceCell<Option<MetadataSnapshot>>,
}

impl Entry {
    /// Wrap a path with no metadata loaded.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path,
            name,
            kind_hint: None,
            snapshot: OnceCell::new(),
        }
    }

    /// Wrap a path whose kind the walker already knows, avoiding a stat for
    /// kind-only checks.
    pub(crate) fn with_kind(path: PathBuf, kind: EntryKind) -> Self {
        let mut entry = Self::new(path);
        entry.kind_hint = Some(kind);
        entry
    }

    /// Wrap a path with a caller-supplied snapshot, so evaluation never
    /// touches the filesystem.
    pub fn with_snapshot(path: impl Into<PathBuf>, snapshot: MetadataSnapshot) -> Self {
        let mut entry = Self::new(path);
        entry.kind_hint = Some(snapshot.kind());
        entry.snapshot = OnceCell::from(Some(snapshot));
        entry
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The final component of the path, lossily converted.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entry kind, from the walker's hint when available, otherwise from
    /// the (lazily captured) snapshot. `Other` if the entry cannot be
    /// statted at all.
    pub fn kind(&self) -> EntryKind {
        if let Some(kind) = self.kind_hint {
            return kind;
        }
        self.snapshot()
            .map(MetadataSnapshot::kind)
            .unwrap_or(EntryKind::Other)
    }

    /// The entry's metadata snapshot, captured on first call and cached.
    ///
    /// Returns `None` when the entry cannot be statted (vanished, access
    /// denied); predicates treat that as a non-match.
    pub fn snapshot(&self) -> Option<&MetadataSnapshot> {
        self.snapshot
            .get_or_init(|| match MetadataSnapshot::capture(&self.path) {
                Ok(snap) => Some(snap),
                Err(err) => {
                    log::debug!("stat failed for {}: {err}", self.path.display());
                    None
                }
            })
            .as_ref()
    }

    pub fn into_path(self) -> PathBuf {
        self.path
    }
}
