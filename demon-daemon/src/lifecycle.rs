//! Daemon state machine.
//!
//! ```text
//! Initializing -> Running -> { Reloading -> Running }* -> Terminating(exit)
//! ```
//!
//! Signals never run daemon code directly: they arrive as [`LifecycleEvent`]s
//! on a single-consumer channel, and each event is handled to completion
//! before the next one is read.

use tokio::sync::mpsc;

use demon_core::{config, RuleSet};
use demon_sync::{pipeline, SyncReport};

use crate::error::DaemonError;
use crate::instance::{InstanceGuard, ProcessTable, SystemProcessTable};
use crate::settings::DaemonSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    Reload,
    Terminate,
}

/// How the daemon ended once it was running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// Terminate request handled.
    Terminated,
    /// The configuration failed to load during a reload.
    ReloadFailed,
}

impl Exit {
    /// Process exit status.
    pub fn code(self) -> u8 {
        match self {
            Exit::Terminated => 0,
            Exit::ReloadFailed => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Initializing,
    Running,
    Reloading,
    Terminating(Exit),
}

pub struct Lifecycle<P = SystemProcessTable> {
    settings: DaemonSettings,
    guard: InstanceGuard<P>,
    self_pid: i32,
    state: LifecycleState,
    rules: RuleSet,
}

impl<P: ProcessTable> Lifecycle<P> {
    pub fn new(settings: DaemonSettings, guard: InstanceGuard<P>, self_pid: i32) -> Self {
        Self {
            settings,
            guard,
            self_pid,
            state: LifecycleState::Initializing,
            rules: RuleSet::new(),
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Rules from the most recent successful load.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Take over, load the rules and run the first sync pass.
    ///
    /// # Errors
    /// Any error here aborts startup: a failed takeover, an invalid
    /// configuration, or a panicked sync task.
    pub async fn initialize(&mut self) -> Result<SyncReport, DaemonError> {
        tracing::info!(
            config = %self.settings.config_path.display(),
            pid = self.self_pid,
            "start",
        );

        self.guard.takeover(&self.settings.pid_file, self.self_pid)?;
        self.rules = config::load(&self.settings.config_path)?;
        let report = self.sync().await?;

        self.state = LifecycleState::Running;
        Ok(report)
    }

    /// Handle one event. Returns the exit once the daemon must stop.
    pub async fn handle(&mut self, event: LifecycleEvent) -> Result<Option<Exit>, DaemonError> {
        match event {
            LifecycleEvent::Terminate => {
                tracing::info!("terminate");
                Ok(Some(self.terminate(Exit::Terminated)))
            }
            LifecycleEvent::Reload => {
                self.state = LifecycleState::Reloading;
                tracing::info!("reload config");

                match config::load(&self.settings.config_path) {
                    Ok(rules) => self.rules = rules,
                    Err(err) => {
                        tracing::error!(error = %err, "failed reloading config");
                        return Ok(Some(self.terminate(Exit::ReloadFailed)));
                    }
                }

                self.sync().await?;
                self.state = LifecycleState::Running;
                Ok(None)
            }
        }
    }

    /// Initialize, then handle events until one ends the daemon.
    ///
    /// A closed channel counts as a terminate request.
    pub async fn run(
        mut self,
        mut events: mpsc::Receiver<LifecycleEvent>,
    ) -> Result<Exit, DaemonError> {
        self.initialize().await?;

        loop {
            let event = events.recv().await.unwrap_or(LifecycleEvent::Terminate);
            if let Some(exit) = self.handle(event).await? {
                return Ok(exit);
            }
        }
    }

    fn terminate(&mut self, exit: Exit) -> Exit {
        self.state = LifecycleState::Terminating(exit);
        exit
    }

    async fn sync(&self) -> Result<SyncReport, DaemonError> {
        let rules = self.rules.clone();
        let report = tokio::task::spawn_blocking(move || pipeline::run(&rules))
            .await
            .map_err(|err| DaemonError::Join(err.to_string()))?;
        tracing::info!(
            rules = report.rules,
            copied = report.copied_files,
            failures = report.failures,
            "sync completed",
        );
        Ok(report)
    }
}
