//! Signal forwarding: SIGHUP becomes [`LifecycleEvent::Reload`], SIGTERM and
//! SIGINT become [`LifecycleEvent::Terminate`].

use tokio::signal::unix::{signal, Signal, SignalKind};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::DaemonError;
use crate::lifecycle::LifecycleEvent;

/// Install the handlers and spawn a task posting events onto `events`.
///
/// Must be called inside a tokio runtime. Handlers are live as soon as this
/// returns, so signals arriving during startup are queued rather than lost.
pub fn forward_signals(
    events: mpsc::Sender<LifecycleEvent>,
) -> Result<JoinHandle<()>, DaemonError> {
    let mut hangup = install(SignalKind::hangup(), "SIGHUP")?;
    let mut terminate = install(SignalKind::terminate(), "SIGTERM")?;
    let mut interrupt = install(SignalKind::interrupt(), "SIGINT")?;

    Ok(tokio::spawn(async move {
        loop {
            let event = tokio::select! {
                Some(()) = hangup.recv() => LifecycleEvent::Reload,
                Some(()) = terminate.recv() => LifecycleEvent::Terminate,
                Some(()) = interrupt.recv() => LifecycleEvent::Terminate,
                else => break,
            };
            if events.send(event).await.is_err() {
                break;
            }
        }
    }))
}

fn install(kind: SignalKind, name: &'static str) -> Result<Signal, DaemonError> {
    signal(kind).map_err(|source| DaemonError::SignalSetup {
        signal: name,
        source,
    })
}
