//! Diagnostic output: `tracing-subscriber` to stderr or to an appended,
//! size-rotated log file.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::{io_err, DaemonError};
use crate::paths::rotated_log_path;

/// Rotate once the live log reaches 10 MiB.
pub const MAX_LOG_BYTES: u64 = 10 * 1024 * 1024;

/// Rotated backups kept next to the live log.
pub const MAX_ROTATED_FILES: usize = 5;

/// Install the global subscriber. `RUST_LOG` overrides the `info` default.
///
/// With `log_file` set, the file is rotated if oversized and then appended to.
/// A subscriber installed earlier (e.g. by a test harness) is kept.
pub fn init_tracing(log_file: Option<&Path>, json: bool) -> Result<(), DaemonError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let writer = match log_file {
        Some(path) => {
            if let Err(err) = rotate_if_needed(path, MAX_LOG_BYTES, MAX_ROTATED_FILES) {
                eprintln!("log rotation failed for {}: {err}", path.display());
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| io_err(path, e))?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(io::stderr),
    };

    let layer = if json {
        fmt::layer()
            .json()
            .with_target(false)
            .with_writer(writer)
            .boxed()
    } else {
        fmt::layer()
            .with_target(false)
            .with_ansi(log_file.is_none())
            .with_writer(writer)
            .boxed()
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init();
    Ok(())
}

/// Rotate `log` when it is at least `max_bytes` long.
///
/// `log.<max_files>` is dropped, each `log.<n>` moves to `log.<n+1>`, and the
/// live file becomes `log.1`. Returns whether a rotation happened; a missing
/// log is not an error.
pub fn rotate_if_needed(log: &Path, max_bytes: u64, max_files: usize) -> io::Result<bool> {
    let size = match fs::metadata(log) {
        Ok(meta) => meta.len(),
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(err) => return Err(err),
    };
    if size < max_bytes || max_files == 0 {
        return Ok(false);
    }

    match fs::remove_file(rotated_log_path(log, max_files)) {
        Err(err) if err.kind() != io::ErrorKind::NotFound => return Err(err),
        _ => {}
    }
    for n in (1..max_files).rev() {
        let from = rotated_log_path(log, n);
        if from.exists() {
            fs::rename(&from, rotated_log_path(log, n + 1))?;
        }
    }
    fs::rename(log, rotated_log_path(log, 1))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn small_log_is_left_alone() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("demon.log");
        fs::write(&log, "short").unwrap();

        assert!(!rotate_if_needed(&log, 1024, 3).unwrap());
        assert!(log.exists());
        assert!(!rotated_log_path(&log, 1).exists());
    }

    #[test]
    fn missing_log_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(!rotate_if_needed(&dir.path().join("none.log"), 1, 3).unwrap());
    }

    #[test]
    fn oversized_log_shifts_backups_and_drops_the_oldest() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("demon.log");
        for n in 1..=3 {
            fs::write(rotated_log_path(&log, n), format!("backup-{n}")).unwrap();
        }
        fs::write(&log, "live-contents").unwrap();

        assert!(rotate_if_needed(&log, 4, 3).unwrap());

        assert!(!log.exists(), "live log is recreated by the next open");
        let read = |n| fs::read_to_string(rotated_log_path(&log, n)).unwrap();
        assert_eq!(read(1), "live-contents");
        assert_eq!(read(2), "backup-1");
        assert_eq!(read(3), "backup-2");
        assert!(!rotated_log_path(&log, 4).exists());
    }

    #[test]
    fn init_with_log_file_creates_it() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("demon.log");
        init_tracing(Some(&log), false).unwrap();
        assert!(log.exists());
    }
}
