//! `demon sync`: one clean-then-copy pass without the daemon.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;

use demon_core::config;
use demon_daemon::logging::init_tracing;
use demon_daemon::paths::DEFAULT_CONFIG_FILE;
use demon_sync::pipeline;

#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Rule file to apply.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,
}

impl SyncArgs {
    pub fn run(self) -> Result<ExitCode> {
        init_tracing(None, false).context("failed to set up logging")?;

        let rules = config::load(&self.config)
            .with_context(|| format!("failed to load {}", self.config.display()))?;
        if rules.is_empty() {
            println!("No rules in {}. Nothing to do.", self.config.display());
            return Ok(ExitCode::SUCCESS);
        }

        let report = pipeline::run(&rules);
        println!(
            "✓ {} rules synced ({} copied, {} removed, {} failed)",
            report.rules, report.copied_files, report.removed_entries, report.failures
        );
        Ok(ExitCode::SUCCESS)
    }
}
