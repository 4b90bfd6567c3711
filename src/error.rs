//! Error types for sheet-intake

use std::time::Duration;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by intake operations and their collaborators
#[derive(Debug, Error)]
pub enum Error {
    /// Bad input: disallowed extension, unknown sheet, empty submission
    #[error("{0}")]
    Validation(String),

    /// The submission lock could not be acquired in time
    #[error("timed out after {}ms waiting for the submission lock", .0.as_millis())]
    LockTimeout(Duration),

    /// A table could not be read or written
    #[error("store write failed: {0}")]
    StoreWrite(String),

    /// The confirmation message could not be delivered
    #[error("notification failed: {0}")]
    Notification(String),

    /// Blob storage fault
    #[error("storage error: {0}")]
    Storage(String),

    /// Session cache fault
    #[error("cache error: {0}")]
    Cache(String),

    /// Invalid configuration
    #[error("config error: {0}")]
    Config(String),

    /// Filesystem error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Anything else
    #[error("internal error: {0}")]
    Internal(String),
}
