use tokio::sync::mpsc;

use crate::error::{io_err, DaemonError};
use crate::instance::{InstanceGuard, SystemProcessTable};
use crate::lifecycle::{Exit, Lifecycle};
use crate::logging::init_tracing;
use crate::paths::EVENT_QUEUE_DEPTH;
use crate::settings::DaemonSettings;
use crate::signals::forward_signals;

/// Start the daemon and block the current thread until it exits.
///
/// `settings` should already be [resolved](DaemonSettings::resolve). Errors
/// come from startup or from a sync task that could not be joined; a normal
/// run ends with an [`Exit`].
pub fn start_blocking(settings: DaemonSettings) -> Result<Exit, DaemonError> {
    init_tracing(settings.log_file.as_deref(), settings.log_json)?;
    settings.enter_workdir()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| io_err("tokio-runtime", e))?;
    runtime.block_on(run(settings))
}

/// Run the daemon on the current runtime with real signals and the real
/// process table.
pub async fn run(settings: DaemonSettings) -> Result<Exit, DaemonError> {
    let (events_tx, events_rx) = mpsc::channel(EVENT_QUEUE_DEPTH);
    let _forwarder = forward_signals(events_tx)?;

    let self_pid = nix::unistd::getpid().as_raw();
    let lifecycle = Lifecycle::new(settings, InstanceGuard::new(SystemProcessTable), self_pid);
    let exit = lifecycle.run(events_rx).await;

    if let Err(err) = &exit {
        tracing::error!(error = %err, "daemon stopped on error");
    }
    exit
}
