//! Destination clearing.

use std::fs;
use std::path::Path;

use crate::error::{io_err, SyncError};

/// Result of clearing one destination directory.
#[derive(Debug, Default)]
pub struct CleanOutcome {
    /// Entries removed.
    pub removed: usize,
    /// Enumeration or removal failures, in the order they happened.
    pub errors: Vec<SyncError>,
}

impl CleanOutcome {
    /// True when the directory was enumerated and every entry removed.
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Remove every immediate entry of `dir`, keeping `dir` itself.
///
/// A failing entry does not stop the remaining removals. Subdirectories are
/// removed with their contents.
pub fn clean_directory(dir: &Path) -> CleanOutcome {
    let mut outcome = CleanOutcome::default();

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            outcome.errors.push(io_err(dir, err));
            return outcome;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                outcome.errors.push(io_err(dir, err));
                continue;
            }
        };
        let path = entry.path();
        match remove_entry(&path, &entry) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "removed");
                outcome.removed += 1;
            }
            Err(err) => outcome.errors.push(err),
        }
    }

    outcome
}

fn remove_entry(path: &Path, entry: &fs::DirEntry) -> Result<(), SyncError> {
    // DirEntry::file_type does not follow symlinks, so a link to a directory
    // is unlinked rather than emptied.
    let ty = entry.file_type().map_err(|e| io_err(path, e))?;
    if ty.is_dir() {
        fs::remove_dir_all(path).map_err(|e| io_err(path, e))
    } else {
        fs::remove_file(path).map_err(|e| io_err(path, e))
    }
}
