//! Client side of the daemon: find the running instance through its pid
//! marker and signal it.

use std::path::{Path, PathBuf};

use nix::sys::signal::Signal;
use serde::Serialize;

use crate::error::DaemonError;
use crate::instance::{read_marker, ProcessTable, SignalError};

/// Snapshot of the instance named by a pid marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstanceStatus {
    pub pid_file: PathBuf,
    pub pid: Option<i32>,
    pub running: bool,
}

pub fn status<P: ProcessTable>(processes: &P, pid_file: &Path) -> Result<InstanceStatus, DaemonError> {
    let pid = read_marker(pid_file)?;
    let running = pid.map(|pid| processes.is_alive(pid)).unwrap_or(false);
    Ok(InstanceStatus {
        pid_file: pid_file.to_path_buf(),
        pid,
        running,
    })
}

/// Ask the running instance to terminate. Returns its pid.
pub fn request_stop<P: ProcessTable>(processes: &P, pid_file: &Path) -> Result<i32, DaemonError> {
    signal_instance(processes, pid_file, Signal::SIGTERM)
}

/// Ask the running instance to reload its configuration. Returns its pid.
pub fn request_reload<P: ProcessTable>(processes: &P, pid_file: &Path) -> Result<i32, DaemonError> {
    signal_instance(processes, pid_file, Signal::SIGHUP)
}

fn signal_instance<P: ProcessTable>(
    processes: &P,
    pid_file: &Path,
    signal: Signal,
) -> Result<i32, DaemonError> {
    let not_running = || DaemonError::NotRunning {
        pid_file: pid_file.to_path_buf(),
    };

    let pid = read_marker(pid_file)?.ok_or_else(not_running)?;
    match processes.send(pid, Some(signal)) {
        Ok(()) => Ok(pid),
        Err(SignalError::NoSuchProcess) => Err(not_running()),
        Err(SignalError::Failed(source)) => Err(DaemonError::Signal { pid, source }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::fs;
    use tempfile::TempDir;

    struct Recorder {
        alive: bool,
        sent: RefCell<Vec<(i32, Option<Signal>)>>,
    }

    impl Recorder {
        fn new(alive: bool) -> Self {
            Self {
                alive,
                sent: RefCell::new(Vec::new()),
            }
        }
    }

    impl ProcessTable for Recorder {
        fn send(&self, pid: i32, signal: Option<Signal>) -> Result<(), SignalError> {
            self.sent.borrow_mut().push((pid, signal));
            if self.alive {
                Ok(())
            } else {
                Err(SignalError::NoSuchProcess)
            }
        }
    }

    #[test]
    fn reload_sends_sighup_to_marker_pid() {
        let dir = TempDir::new().unwrap();
        let pid_file = dir.path().join("demon.pid");
        fs::write(&pid_file, "321\n").unwrap();
        let processes = Recorder::new(true);

        assert_eq!(request_reload(&processes, &pid_file).unwrap(), 321);
        assert_eq!(*processes.sent.borrow(), vec![(321, Some(Signal::SIGHUP))]);
    }

    #[test]
    fn stop_without_marker_reports_not_running() {
        let dir = TempDir::new().unwrap();
        let processes = Recorder::new(true);
        let err = request_stop(&processes, &dir.path().join("demon.pid")).unwrap_err();
        assert!(matches!(err, DaemonError::NotRunning { .. }));
        assert!(processes.sent.borrow().is_empty());
    }

    #[test]
    fn stop_with_stale_marker_reports_not_running() {
        let dir = TempDir::new().unwrap();
        let pid_file = dir.path().join("demon.pid");
        fs::write(&pid_file, "321\n").unwrap();
        let err = request_stop(&Recorder::new(false), &pid_file).unwrap_err();
        assert!(matches!(err, DaemonError::NotRunning { .. }));
    }

    #[test]
    fn status_reports_pid_and_liveness() {
        let dir = TempDir::new().unwrap();
        let pid_file = dir.path().join("demon.pid");

        let absent = status(&Recorder::new(true), &pid_file).unwrap();
        assert_eq!(absent.pid, None);
        assert!(!absent.running);

        fs::write(&pid_file, "321\n").unwrap();
        let stale = status(&Recorder::new(false), &pid_file).unwrap();
        assert_eq!(stale.pid, Some(321));
        assert!(!stale.running);
    }
}
