//! Error types for demon-sync.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by a single clean or copy step.
///
/// None of these abort a run; [`crate::pipeline::run`] logs and counts them.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The copy target already exists, so nothing was written.
    #[error("failed copying to {path}: target already exists")]
    TargetExists { path: PathBuf },

    /// A source entry has no final path component to copy under.
    #[error("no file name in {path}")]
    NoFileName { path: PathBuf },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
