//! Single-instance takeover through a PID marker file.
//!
//! The marker holds the decimal pid of the active instance. A starting
//! instance sends SIGTERM to the recorded pid, then writes its own pid. The
//! marker is never removed on exit.
//!
//! PID reuse is not detected: an unrelated live process whose pid sits in a
//! stale marker receives the signal.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use thiserror::Error;

/// Failure to deliver a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SignalError {
    #[error("no such process")]
    NoSuchProcess,
    #[error("{0}")]
    Failed(Errno),
}

/// Why a takeover failed.
#[derive(Debug, Error)]
pub enum InstanceError {
    #[error("invalid pid marker at {path}: {reason}")]
    InvalidMarker { path: PathBuf, reason: String },

    #[error("cannot terminate prior instance {pid}: {source}")]
    Signal {
        pid: i32,
        #[source]
        source: Errno,
    },
}

/// Access to the process table. Tests substitute a fake.
pub trait ProcessTable {
    /// Deliver `signal` to `pid`. `None` only checks that the process exists.
    fn send(&self, pid: i32, signal: Option<Signal>) -> Result<(), SignalError>;

    fn terminate(&self, pid: i32) -> Result<(), SignalError> {
        self.send(pid, Some(Signal::SIGTERM))
    }

    fn is_alive(&self, pid: i32) -> bool {
        match self.send(pid, None) {
            Ok(()) => true,
            // The process exists but belongs to someone else.
            Err(SignalError::Failed(Errno::EPERM)) => true,
            Err(_) => false,
        }
    }
}

/// The real process table, via `kill(2)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessTable;

impl ProcessTable for SystemProcessTable {
    fn send(&self, pid: i32, signal: Option<Signal>) -> Result<(), SignalError> {
        kill(Pid::from_raw(pid), signal).map_err(|errno| match errno {
            Errno::ESRCH => SignalError::NoSuchProcess,
            other => SignalError::Failed(other),
        })
    }
}

/// What was found in the marker before takeover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorInstance {
    /// Marker absent or unreadable.
    None,
    /// SIGTERM delivered to this pid.
    Displaced(i32),
    /// The recorded pid no longer exists.
    AlreadyGone(i32),
    /// The marker already names the calling process.
    Myself(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Takeover {
    pub prior: PriorInstance,
    /// False when the marker could not be written. Never fatal.
    pub marker_written: bool,
}

/// Enforces at most one live instance per marker path.
#[derive(Debug, Clone, Default)]
pub struct InstanceGuard<P = SystemProcessTable> {
    processes: P,
}

impl<P: ProcessTable> InstanceGuard<P> {
    pub fn new(processes: P) -> Self {
        Self { processes }
    }

    #[cfg(test)]
    pub(crate) fn processes(&self) -> &P {
        &self.processes
    }

    /// Displace the instance recorded in `marker` and record `self_pid`.
    ///
    /// # Errors
    /// [`InstanceError::InvalidMarker`] when the marker exists but does not
    /// hold a positive pid, [`InstanceError::Signal`] when SIGTERM fails for a
    /// reason other than the process being gone.
    pub fn takeover(&self, marker: &Path, self_pid: i32) -> Result<Takeover, InstanceError> {
        let prior = match read_marker(marker)? {
            None => PriorInstance::None,
            Some(pid) if pid == self_pid => PriorInstance::Myself(pid),
            Some(pid) => match self.processes.terminate(pid) {
                Ok(()) => PriorInstance::Displaced(pid),
                Err(SignalError::NoSuchProcess) => PriorInstance::AlreadyGone(pid),
                Err(SignalError::Failed(source)) => {
                    return Err(InstanceError::Signal { pid, source });
                }
            },
        };

        match prior {
            PriorInstance::Displaced(pid) => tracing::info!(pid, "terminated prior instance"),
            PriorInstance::AlreadyGone(pid) => tracing::debug!(pid, "prior instance already gone"),
            PriorInstance::None | PriorInstance::Myself(_) => {}
        }

        let marker_written = match write_marker(marker, self_pid) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(path = %marker.display(), error = %err, "cannot write pid marker");
                false
            }
        };

        Ok(Takeover {
            prior,
            marker_written,
        })
    }
}

/// Read the pid recorded in `marker`.
///
/// Returns `Ok(None)` when the marker does not exist or cannot be opened.
pub fn read_marker(marker: &Path) -> Result<Option<i32>, InstanceError> {
    let mut file = match File::open(marker) {
        Ok(file) => file,
        Err(_) => return Ok(None),
    };

    let invalid = |reason: String| InstanceError::InvalidMarker {
        path: marker.to_path_buf(),
        reason,
    };

    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|err| invalid(err.to_string()))?;

    let token = content
        .split_whitespace()
        .next()
        .ok_or_else(|| invalid("empty marker".to_string()))?;
    let pid: i32 = token
        .parse()
        .map_err(|_| invalid(format!("'{token}' is not a pid")))?;

    // kill(2) treats 0 and negative pids as process groups.
    if pid <= 0 {
        return Err(invalid(format!("'{pid}' is not a process id")));
    }
    Ok(Some(pid))
}

fn write_marker(marker: &Path, pid: i32) -> std::io::Result<()> {
    fs::write(marker, format!("{pid}\n"))
}
