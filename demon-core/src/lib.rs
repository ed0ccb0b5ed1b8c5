//! demon core library: sync rules, rule sets and configuration loading.
//!
//! - [`types`]: [`SyncRule`] and [`RuleSet`]
//! - [`config`]: parse the plain-text rule file
//! - [`error`]: [`ConfigError`]

pub mod config;
pub mod error;
pub mod types;

pub use error::ConfigError;
pub use types::{RuleSet, SyncRule};
