//! Explicit daemon settings, built once by the bootstrap and passed down.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{io_err, DaemonError};
use crate::paths::{default_config_path, default_pid_file};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaemonSettings {
    /// Rule file, re-read in full on every reload.
    pub config_path: PathBuf,
    /// InstanceMarker holding the pid of the active instance.
    pub pid_file: PathBuf,
    /// Append diagnostics here instead of stderr.
    pub log_file: Option<PathBuf>,
    /// Emit diagnostics as JSON lines.
    pub log_json: bool,
    /// Directory to change into before takeover.
    pub workdir: Option<PathBuf>,
}

impl Default for DaemonSettings {
    fn default() -> Self {
        Self {
            config_path: default_config_path(),
            pid_file: default_pid_file(),
            log_file: None,
            log_json: false,
            workdir: None,
        }
    }
}

impl DaemonSettings {
    pub fn new(config_path: impl Into<PathBuf>, pid_file: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            pid_file: pid_file.into(),
            ..Self::default()
        }
    }

    /// Make every path absolute against the current directory so the
    /// settings stay valid after [`Self::enter_workdir`].
    pub fn resolve(self) -> Result<Self, DaemonError> {
        Ok(Self {
            config_path: absolute(&self.config_path)?,
            pid_file: absolute(&self.pid_file)?,
            log_file: self.log_file.as_deref().map(absolute).transpose()?,
            log_json: self.log_json,
            workdir: self.workdir.as_deref().map(absolute).transpose()?,
        })
    }

    /// Change into `workdir` when one is set.
    pub fn enter_workdir(&self) -> Result<(), DaemonError> {
        let Some(dir) = &self.workdir else {
            return Ok(());
        };
        std::env::set_current_dir(dir).map_err(|source| DaemonError::Workdir {
            path: dir.clone(),
            source,
        })
    }
}

fn absolute(path: &Path) -> Result<PathBuf, DaemonError> {
    std::path::absolute(path).map_err(|e| io_err(path, e))
}
