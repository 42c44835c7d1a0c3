//! Error types for schema assembly.
//!
//! Fragment reads and the output write carry the path that failed so the
//! operator can see which file broke the run.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a configuration or assembling a schema.
#[derive(Debug, Error)]
pub enum AssembleError {
    /// A manifest fragment could not be read.
    #[error("failed to read fragment '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The output file could not be written.
    #[error("failed to write output '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The existing output could not be read for comparison.
    #[error("failed to read existing output '{}': {source}", .path.display())]
    ReadOutput {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Configuration file I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// The manifest failed shape validation.
    #[error("invalid manifest: {0}")]
    InvalidManifest(String),
}

/// Convenience alias for results with [`AssembleError`].
pub type Result<T> = std::result::Result<T, AssembleError>;
