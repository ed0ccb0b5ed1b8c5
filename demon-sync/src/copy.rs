//! Source scanning and exclusive file copies.

use std::ffi::OsStr;
use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use crate::error::{io_err, SyncError};

/// True when `file_name` ends with `extension` and is strictly longer than it.
///
/// The comparison is byte-exact and case-sensitive, so a file named exactly
/// `.log` does not match `.log`.
pub fn matches_extension(file_name: &OsStr, extension: &str) -> bool {
    let name = file_name.as_encoded_bytes();
    let suffix = extension.as_bytes();
    name.len() > suffix.len() && name.ends_with(suffix)
}

/// List the regular files directly inside `source` whose names match
/// `extension`, sorted by path.
///
/// Symlinks are followed when deciding whether an entry is a regular file.
/// Unreadable entries are logged and skipped.
///
/// # Errors
/// Returns [`SyncError::Io`] when `source` itself cannot be enumerated.
pub fn matching_files(source: &Path, extension: &str) -> Result<Vec<PathBuf>, SyncError> {
    let entries = fs::read_dir(source).map_err(|e| io_err(source, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::error!(path = %source.display(), error = %err, "unreadable source entry");
                continue;
            }
        };

        if !matches_extension(&entry.file_name(), extension) {
            continue;
        }

        let path = entry.path();
        match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => files.push(path),
            Ok(_) => {}
            Err(err) => {
                tracing::error!(path = %path.display(), error = %err, "cannot stat source entry");
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Copy `source_file` into `destination_dir` under its own file name.
///
/// The target is created exclusively: an existing file of the same name is
/// never overwritten. Contents and permissions are copied. Returns the path
/// written.
///
/// # Errors
/// [`SyncError::TargetExists`] when nothing was written because the target is
/// already present, [`SyncError::Io`] for any other filesystem failure.
pub fn copy_new_file(source_file: &Path, destination_dir: &Path) -> Result<PathBuf, SyncError> {
    let file_name = source_file
        .file_name()
        .ok_or_else(|| SyncError::NoFileName {
            path: source_file.to_path_buf(),
        })?;
    let target = destination_dir.join(file_name);

    let mut reader = File::open(source_file).map_err(|e| io_err(source_file, e))?;
    let permissions = reader
        .metadata()
        .map_err(|e| io_err(source_file, e))?
        .permissions();

    let mut writer = match OpenOptions::new().write(true).create_new(true).open(&target) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::AlreadyExists => {
            return Err(SyncError::TargetExists { path: target });
        }
        Err(err) => return Err(io_err(&target, err)),
    };

    if let Err(err) = io::copy(&mut reader, &mut writer) {
        drop(writer);
        let _ = fs::remove_file(&target);
        return Err(io_err(&target, err));
    }

    writer
        .set_permissions(permissions)
        .map_err(|e| io_err(&target, e))?;

    Ok(target)
}
