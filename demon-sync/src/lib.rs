//! # demon-sync
//!
//! Clean-then-copy directory synchronization.
//!
//! Call [`pipeline::run`] with a [`demon_core::RuleSet`] to clear every
//! destination once and copy the matching files from each source. Failures
//! are per-entry: they are logged, counted in the [`SyncReport`], and never
//! stop the run.

pub mod clean;
pub mod copy;
pub mod error;
pub mod pipeline;

pub use error::SyncError;
pub use pipeline::{run, SyncReport};
