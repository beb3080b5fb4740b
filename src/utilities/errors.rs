//! Error types for the affect core.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors raised by the detector, the adaptation engine and their stores.
///
/// Insufficient data is never an error: short histories and empty
/// interaction batches produce empty or neutral results instead.
#[derive(Debug, Error)]
pub enum AffectError {
    /// Configuration rejected at construction time.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A state older than the log's last entry was appended.
    #[error("Non-monotonic timestamp: {attempted} is earlier than {previous}")]
    NonMonotonicTimestamp {
        previous: DateTime<Utc>,
        attempted: DateTime<Utc>,
    },

    /// A profile that cannot be scored or adapted (e.g. non-finite traits).
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    /// Profile store backend failure.
    #[error("Profile store error: {0}")]
    Store(#[source] anyhow::Error),

    /// YAML parsing or serialization failed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing or serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the crate.
pub type AffectResult<T> = Result<T, AffectError>;

impl AffectError {
    /// Shorthand for [`AffectError::InvalidConfig`].
    pub fn config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
