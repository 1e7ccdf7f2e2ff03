//! Player as seen by the enemy simulation

use forest_combat::Health;
use forest_math::Vec3;
use serde::{Deserialize, Serialize};

/// How a hit on the player was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HitSource {
    /// Regular attack cycle
    Strike,
    /// Overlap fallback
    Overlap,
}

/// Damage an enemy dealt to the player this tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerHit {
    pub amount: f32,
    pub source: HitSource,
}

/// Player kinematics and health, written by the game each frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub position: Vec3,
    /// Units per second
    pub velocity: Vec3,
    pub health: Health,
}

impl PlayerState {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            health: Health::new(100.0),
        }
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.health.is_alive()
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}
