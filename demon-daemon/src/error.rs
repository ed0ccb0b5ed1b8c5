use std::path::PathBuf;

use nix::errno::Errno;
use thiserror::Error;

use crate::instance::InstanceError;

/// Error surface for the daemon lifecycle, settings and control commands.
#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config error: {0}")]
    Config(#[from] demon_core::ConfigError),

    #[error("instance takeover failed: {0}")]
    Instance(#[from] InstanceError),

    #[error("cannot change working directory to {path}: {source}")]
    Workdir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to signal process {pid}: {source}")]
    Signal {
        pid: i32,
        #[source]
        source: Errno,
    },

    #[error("daemon is not running (pid file: {pid_file})")]
    NotRunning { pid_file: PathBuf },

    #[error("cannot install {signal} handler: {source}")]
    SignalSetup {
        signal: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("sync task join error: {0}")]
    Join(String),
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> DaemonError {
    DaemonError::Io {
        path: path.into(),
        source,
    }
}
