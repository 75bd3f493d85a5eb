//! Error types for inventory collection.
//!
//! Provides a unified error type covering subprocess execution, deadlines,
//! malformed tool output, missing data and file I/O.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while collecting or rendering an inventory.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// Subprocess could not be spawned or exited unsuccessfully.
    #[error("failed to execute '{program}': {message}")]
    Execution { program: String, message: String },

    /// Subprocess did not finish before its deadline and was killed.
    #[error("'{program}' timed out after {timeout:?}")]
    Timeout { program: String, timeout: Duration },

    /// Tool output did not have the expected shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// An expected top-level key was absent or empty.
    #[error("missing data: {0}")]
    MissingData(String),

    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for results with [`InventoryError`].
pub type Result<T> = std::result::Result<T, InventoryError>;
