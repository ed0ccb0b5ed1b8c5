//! `demon start|stop|reload|status`: daemon lifecycle over the pid marker.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;

use demon_daemon::paths::DEFAULT_CONFIG_FILE;
use demon_daemon::{
    request_reload, request_stop, start_blocking, status, DaemonError, DaemonSettings,
    SystemProcessTable,
};

#[derive(Args, Debug)]
pub struct StartArgs {
    /// Rule file, resolved against the invocation directory.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Change into this directory before taking over.
    #[arg(long)]
    pub workdir: Option<PathBuf>,

    /// Append diagnostics to this file instead of stderr.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Emit diagnostics as JSON lines.
    #[arg(long)]
    pub log_json: bool,
}

impl StartArgs {
    pub fn run(self, pid_file: PathBuf) -> Result<ExitCode> {
        let settings = DaemonSettings {
            config_path: self.config,
            pid_file,
            log_file: self.log_file,
            log_json: self.log_json,
            workdir: self.workdir,
        }
        .resolve()
        .context("failed to resolve daemon paths")?;

        let exit = start_blocking(settings).context("daemon failed to start")?;
        Ok(ExitCode::from(exit.code()))
    }
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Print machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl StatusArgs {
    pub fn run(self, pid_file: &Path) -> Result<ExitCode> {
        let status = status(&SystemProcessTable, pid_file).context("failed to read pid marker")?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&status).context("failed to render status JSON")?
            );
        } else {
            match (status.pid, status.running) {
                (Some(pid), true) => println!("demon is running (pid {pid})"),
                (Some(pid), false) => println!("demon is not running (stale pid {pid})"),
                (None, _) => println!("demon is not running"),
            }
        }
        Ok(ExitCode::SUCCESS)
    }
}

pub fn stop(pid_file: &Path) -> Result<ExitCode> {
    match request_stop(&SystemProcessTable, pid_file) {
        Ok(pid) => println!("stop requested (pid {pid})"),
        Err(DaemonError::NotRunning { .. }) => println!("demon is not running"),
        Err(err) => return Err(err).context("failed to stop daemon"),
    }
    Ok(ExitCode::SUCCESS)
}

pub fn reload(pid_file: &Path) -> Result<ExitCode> {
    let pid = request_reload(&SystemProcessTable, pid_file).context("failed to reload daemon")?;
    println!("reload requested (pid {pid})");
    Ok(ExitCode::SUCCESS)
}
