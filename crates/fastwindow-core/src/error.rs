//! Core error types for fastwindow-core.
//!
//! Everything here is recoverable: the worst a caller should do with any
//! of these is report it and carry on. Persistence decode failures never
//! surface at all -- the store degrades to empty collections instead.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// Core error type for fastwindow-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Record store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Session state machine errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Input validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Record-store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the underlying database
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Fasting-session state machine errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    /// A fast is already running; only one in-progress record may exist.
    #[error("A fast is already in progress; stop it before starting another")]
    CannotStartWhileRunning,

    /// The day being cleared anchors the active session.
    #[error("Cannot clear {day}: the active fast is recorded on that day")]
    CannotClearActiveSession { day: NaiveDate },

    /// Duration changes are rejected mid-session.
    #[error("Cannot change the fasting duration while a fast is running")]
    ReconfigureWhileRunning,

    /// A record already exists for the day and the caller did not opt in
    /// to overwriting it.
    #[error("A record already exists for {day}; pass overwrite to replace it")]
    DayAlreadyRecorded { day: NaiveDate },

    /// Stop/complete requested with no running fast.
    #[error("No fast is in progress")]
    NotRunning,
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Input validation errors.
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    /// Non-numeric or non-positive weight input; rejected before persisting.
    #[error("Invalid weight input '{input}': expected a positive number of kilograms")]
    InvalidWeightInput { input: String },

    /// Fasting duration outside the supported 12-24 hour window.
    #[error("Fasting duration {hours} h is outside the supported range of 12-24 h")]
    DurationOutOfRange { hours: f64 },
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::QueryFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
