//! Error types for the core library

use thiserror::Error;

/// Core errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Handle generation no longer matches its slot
    #[error("Handle is stale (already freed)")]
    StaleHandle,

    /// Handle index space used up
    #[error("Handle allocator exhausted")]
    HandlesExhausted,

    /// Unrecognised enemy kind name
    #[error("Unknown enemy kind: {0}")]
    UnknownKind(String),

    /// Unrecognised personality name
    #[error("Unknown personality: {0}")]
    UnknownPersonality(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, CoreError>;
