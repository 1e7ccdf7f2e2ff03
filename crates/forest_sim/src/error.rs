//! Error types for the simulation

use std::path::PathBuf;

use forest_core::CoreError;
use thiserror::Error;

/// Simulation errors
#[derive(Debug, Error)]
pub enum SimError {
    /// Config file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`crate::SimConfig`]
    #[error("Invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    /// Enemy handle errors
    #[error(transparent)]
    Core(#[from] CoreError),

    /// No live enemy behind a handle
    #[error("Enemy {0} does not exist")]
    UnknownEnemy(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, SimError>;
