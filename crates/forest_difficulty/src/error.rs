//! Error types for difficulty handling

use thiserror::Error;

/// Difficulty errors
#[derive(Debug, Error)]
pub enum DifficultyError {
    /// Reply contained no `{...}` block and was not `NO_CHANGE`
    #[error("Director reply contains no JSON object")]
    NoJson,

    /// The `{...}` block did not parse
    #[error("Director reply is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Top-level JSON value was not an object
    #[error("Director reply is not a JSON object")]
    NotAnObject,

    /// The director request itself failed
    #[error("Director request failed: {0}")]
    Request(String),

    /// Unrecognised intensity name
    #[error("Unknown intensity: {0}")]
    UnknownIntensity(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, DifficultyError>;
