//! Error types for the rehearsal room
//!
//! Session operations never fail (empty input is a silent no-op), so this
//! only covers the ambient layers: configuration, the log file, and I/O.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RehearsalError {
    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Log subscriber could not be installed
    #[error("Logging error: {0}")]
    Logging(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RehearsalError>;
