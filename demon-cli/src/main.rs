//! demon: mirror files between directory pairs, resynchronizing on SIGHUP.
//!
//! # Usage
//!
//! ```text
//! demon start [--config <file>] [--workdir <dir>] [--log-file <file>] [--log-json]
//! demon stop
//! demon reload
//! demon status [--json]
//! demon sync [--config <file>]
//! demon check [--config <file>] [--json]
//! ```
//!
//! Every command accepts `--pid-file <path>` (default `/var/run/demon.pid`).

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{check::CheckArgs, daemon::StartArgs, daemon::StatusArgs, sync::SyncArgs};
use demon_daemon::paths::DEFAULT_PID_FILE;

#[derive(Parser, Debug)]
#[command(
    name = "demon",
    version,
    about = "Mirror files between directory pairs declared in a config file",
    long_about = None,
)]
struct Cli {
    /// PID marker identifying the running instance.
    #[arg(long, global = true, default_value = DEFAULT_PID_FILE)]
    pid_file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the daemon in the foreground, displacing any running instance.
    Start(StartArgs),

    /// Send SIGTERM to the running instance.
    Stop,

    /// Send SIGHUP to the running instance to resynchronize.
    Reload,

    /// Show the pid recorded in the marker and whether it is alive.
    Status(StatusArgs),

    /// Run one synchronization pass in the foreground.
    Sync(SyncArgs),

    /// Validate the config file and list its rules.
    Check(CheckArgs),
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Start(args) => args.run(cli.pid_file),
        Commands::Stop => commands::daemon::stop(&cli.pid_file),
        Commands::Reload => commands::daemon::reload(&cli.pid_file),
        Commands::Status(args) => args.run(&cli.pid_file),
        Commands::Sync(args) => args.run(),
        Commands::Check(args) => args.run(),
    }
}
