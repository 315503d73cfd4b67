//! Batch file actions over matched paths.
//!
//! Each item is processed independently: one failure is recorded and the
//! batch continues (fail-soft per item). Actions consume any iterable of
//! paths, so they compose with [`ResultSet::into_paths`] or a collected
//! stream alike.
//!
//! [`ResultSet::into_paths`]: crate::ResultSet::into_paths

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ActionReport
// ---------------------------------------------------------------------------

/// Outcome of a batch action: which items succeeded, which failed, and why.
#[derive(Debug, Default)]
pub struct ActionReport {
    succeeded: Vec<PathBuf>,
    failed: Vec<(PathBuf, io::Error)>,
}

impl ActionReport {
    /// True when every item succeeded.
    pub fn ok(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn succeeded(&self) -> &[PathBuf] {
        &self.succeeded
    }

    /// Failed items with their causes, in processing order.
    pub fn failed(&self) -> &[(PathBuf, io::Error)] {
        &self.failed
    }

    /// The failure cause for a specific item, if it failed.
    pub fn failure_for(&self, path: &Path) -> Option<&io::Error> {
        self.failed
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, err)| err)
    }

    fn record(&mut self, path: PathBuf, outcome: io::Result<()>) {
        match outcome {
            Ok(()) => self.succeeded.push(path),
            Err(err) => self.failed.push((path, err)),
        }
    }
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// Copy each path into `target_dir`, creating the directory if needed.
pub fn copy_to<I, P>(paths: I, target_dir: &Path) -> ActionReport
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    run_action(paths, target_dir, |path, target| {
        fs::copy(path, target).map(|_| ())
    })
}

/// Move each path into `target_dir`, creating the directory if needed.
/// Falls back to copy-then-remove when a direct rename fails (e.g. across
/// filesystems).
pub fn move_to<I, P>(paths: I, target_dir: &Path) -> ActionReport
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    run_action(paths, target_dir, |path, target| {
        match fs::rename(path, target) {
            Ok(()) => Ok(()),
            Err(_) => {
                fs::copy(path, target)?;
                fs::remove_file(path)
            }
        }
    })
}

/// Delete each path: files and symlinks with `remove_file`, directories
/// recursively.
pub fn delete<I, P>(paths: I) -> ActionReport
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    let mut report = ActionReport::default();
    for path in paths {
        let path: PathBuf = path.into();
        let outcome = delete_one(&path);
        report.record(path, outcome);
    }
    report
}

fn delete_one(path: &Path) -> io::Result<()> {
    let meta = fs::symlink_metadata(path)?;
    if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

fn run_action<I, P, F>(paths: I, target_dir: &Path, action: F) -> ActionReport
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
    F: Fn(&Path, &Path) -> io::Result<()>,
{
    let mut report = ActionReport::default();

    if let Err(err) = fs::create_dir_all(target_dir) {
        // No usable target: every item fails with the same cause.
        for path in paths {
            report.failed.push((
                path.into(),
                io::Error::new(
                    err.kind(),
                    format!("cannot create target directory {}: {err}", target_dir.display()),
                ),
            ));
        }
        return report;
    }

    for path in paths {
        let path: PathBuf = path.into();
        let outcome = match path.file_name() {
            Some(file_name) => action(&path, &target_dir.join(file_name)),
            None => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "path has no file name",
            )),
        };
        report.record(path, outcome);
    }
    report
}
