//! Core error types for ergplan-core.
//!
//! Plan generation failures share one flat enum, [`PlanError`]. They are all
//! caused by bad request parameters or a malformed model, never by the
//! environment, so nothing in the crate retries them.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for ergplan-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Plan generation errors
    #[error("Plan error: {0}")]
    Plan(#[from] PlanError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures raised while building, walking or formatting a model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    /// A probability mapping failed the coverage, range or sum checks, or a
    /// state's reachable set differs from the model's state set.
    #[error("Invalid distribution: {0}")]
    InvalidDistribution(String),

    /// The requested date range or minute target cannot be scheduled.
    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    /// A workout identifier is not in the catalog.
    #[error("No workout type named '{0}'")]
    NoWorkoutType(String),

    /// The emission sequence could not be laid onto the calendar.
    #[error("Formatter failure: {0}")]
    FormatterFailure(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for plan operations.
pub type Result<T, E = PlanError> = std::result::Result<T, E>;
