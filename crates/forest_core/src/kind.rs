//! Closed enemy taxonomies
//!
//! Enemy behavior is selected by two small enums rather than string tags:
//! the body type decides stats and attack timing, the personality decides
//! how the decision engine hunts and whether the enemy ever retreats.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Enemy body type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    #[default]
    Normal,
    Fast,
    Tank,
    Boss,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 4] = [Self::Normal, Self::Fast, Self::Tank, Self::Boss];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Fast => "fast",
            Self::Tank => "tank",
            Self::Boss => "boss",
        }
    }
}

impl fmt::Display for EnemyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnemyKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "fast" => Ok(Self::Fast),
            "tank" => Ok(Self::Tank),
            "boss" => Ok(Self::Boss),
            other => Err(CoreError::UnknownKind(other.to_string())),
        }
    }
}

/// Decision-making temperament
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Personality {
    /// Charges straight in and never retreats
    #[default]
    Aggressive,
    /// Flanks instead of charging
    Tactical,
    Defensive,
    Support,
}

impl Personality {
    pub const ALL: [Personality; 4] = [
        Self::Aggressive,
        Self::Tactical,
        Self::Defensive,
        Self::Support,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Aggressive => "aggressive",
            Self::Tactical => "tactical",
            Self::Defensive => "defensive",
            Self::Support => "support",
        }
    }
}

impl fmt::Display for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Personality {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "aggressive" => Ok(Self::Aggressive),
            "tactical" => Ok(Self::Tactical),
            "defensive" => Ok(Self::Defensive),
            "support" => Ok(Self::Support),
            other => Err(CoreError::UnknownPersonality(other.to_string())),
        }
    }
}
