//! `demon check`: validate a rule file without touching any directory.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;

use demon_core::config;
use demon_daemon::paths::DEFAULT_CONFIG_FILE;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Rule file to validate.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Print the parsed rules as JSON.
    #[arg(long)]
    pub json: bool,
}

impl CheckArgs {
    pub fn run(self) -> Result<ExitCode> {
        let rules = config::load(&self.config)
            .with_context(|| format!("invalid config {}", self.config.display()))?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&rules).context("failed to render rules JSON")?
            );
            return Ok(ExitCode::SUCCESS);
        }

        println!("{}: {} rule(s)", self.config.display(), rules.len());
        for rule in &rules {
            println!("  {rule}");
        }
        Ok(ExitCode::SUCCESS)
    }
}
