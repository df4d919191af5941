//! Error types for the Seabreak word-boundary engine.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for Seabreak operations.
#[derive(Error, Debug)]
pub enum SeabreakError {
    /// A same-script run exceeded the per-call length cap.
    #[error("range too long: {len} code points (max {max})")]
    RangeTooLong {
        /// Length of the rejected run.
        len: usize,
        /// The per-call cap.
        max: usize,
    },

    /// Model data that does not satisfy the declared shapes.
    #[error("invalid model: {0}")]
    InvalidModel(String),

    /// Malformed binary model container.
    #[error("invalid model format: {0}")]
    InvalidFormat(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// File not found.
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    /// Empty input.
    #[error("empty input: {0}")]
    EmptyInput(String),

    /// A process-wide registry has already been installed.
    #[error("model registry already installed")]
    RegistryInstalled,

    /// No process-wide registry has been installed.
    #[error("no model registry installed")]
    RegistryMissing,
}

/// Result type alias for Seabreak operations.
pub type Result<T> = std::result::Result<T, SeabreakError>;

impl From<serde_json::Error> for SeabreakError {
    fn from(err: serde_json::Error) -> Self {
        SeabreakError::Serialization(err.to_string())
    }
}
