//! Core error types for podium-core.
//!
//! Setup-time failures (unknown category, session already live) surface to
//! the caller as explicit results. Everything that happens inside the
//! timing loop is contained there -- nothing in this crate terminates the
//! process.

use std::path::PathBuf;

use thiserror::Error;

/// Umbrella error for podium-core.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Timer error: {0}")]
    Timer(#[from] TimerError),

    #[error("Record error: {0}")]
    Record(#[from] RecordError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Timer lifecycle errors.
#[derive(Error, Debug)]
pub enum TimerError {
    /// Requested speech category has no profile in the catalog.
    #[error("Unknown speech category: '{0}'")]
    UnknownCategory(String),

    /// A session is already live; callers must stop it first.
    #[error("A timer session is already running")]
    AlreadyRunning,
}

/// Record store errors.
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Failed to read records from {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write records to {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Records file {path} is not valid JSON: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    #[error("No configuration directory available on this platform")]
    NoConfigDir,
}

/// Result type alias for CoreError.
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
