//! Error types for countdays.

use thiserror::Error;

/// Errors raised by the store, configuration and command layers.
///
/// The recurrence calculator never produces these: bad dates and unknown
/// categories fall back to showing the stored date string.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("Event not found: {0}")]
    EventNotFound(i64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for countdays operations.
pub type AppResult<T> = Result<T, AppError>;
