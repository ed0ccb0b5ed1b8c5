use std::path::{Path, PathBuf};

pub const DAEMON_IDENT: &str = "demon";

pub const DEFAULT_CONFIG_FILE: &str = "config.cfg";
pub const DEFAULT_PID_FILE: &str = "/var/run/demon.pid";

/// Capacity of the lifecycle event channel.
pub const EVENT_QUEUE_DEPTH: usize = 16;

pub fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_FILE)
}

pub fn default_pid_file() -> PathBuf {
    PathBuf::from(DEFAULT_PID_FILE)
}

/// Path of the `n`-th rotated copy of `log` (e.g. `demon.log.2`).
pub fn rotated_log_path(log: &Path, n: usize) -> PathBuf {
    let name = log
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("{DAEMON_IDENT}.log"));
    log.with_file_name(format!("{name}.{n}"))
}
