//! demon daemon runtime: single-instance takeover, signal-driven lifecycle,
//! and the client commands that signal a running instance.

pub mod control;
mod error;
pub mod instance;
pub mod lifecycle;
pub mod logging;
pub mod paths;
mod runtime;
pub mod settings;
pub mod signals;

pub use control::{request_reload, request_stop, status, InstanceStatus};
pub use error::DaemonError;
pub use instance::{
    InstanceError, InstanceGuard, PriorInstance, ProcessTable, SignalError, SystemProcessTable,
    Takeover,
};
pub use lifecycle::{Exit, Lifecycle, LifecycleEvent, LifecycleState};
pub use runtime::{run, start_blocking};
pub use settings::DaemonSettings;
