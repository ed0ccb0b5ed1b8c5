//! Error types for demon-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file was opened but could not be read to the end.
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A non-blank line did not split into exactly three tokens.
    #[error("malformed config line {line} in {path}: expected 3 tokens, found {found}")]
    Malformed {
        path: PathBuf,
        line: usize,
        found: usize,
    },
}
