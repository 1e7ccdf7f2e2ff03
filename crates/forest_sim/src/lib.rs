//! # forest_sim - Enemy Simulation World
//!
//! Ties perception, decisions, attacks and difficulty together:
//!
//! - [`Enemy`] aggregates the per-enemy state objects
//! - [`EnemyWorld`] owns all enemies and runs frame-synchronous ticks
//! - [`SimConfig`] loads tuning from TOML and the environment
//!
//! # Example
//!
//! ```ignore
//! use forest_sim::prelude::*;
//!
//! let mut world = EnemyWorld::new(SimConfig::load(), 42);
//! let mut player = PlayerState::new(Vec3::ZERO);
//! world.spawn(EnemyKind::Tank, Vec3::ground(0.0, 30.0))?;
//!
//! loop {
//!     let report = world.tick(1.0 / 60.0, &mut player);
//!     // feed report.hits to the HUD, report.removed to the renderer
//! }
//! ```

pub mod config;
pub mod enemy;
pub mod error;
pub mod player;
pub mod world;

pub use config::SimConfig;
pub use enemy::{Enemy, EnemyId};
pub use error::{Result, SimError};
pub use player::{HitSource, PlayerHit, PlayerState};
pub use world::{EnemyWorld, KillReport, TickReport, WorldStats};

pub mod prelude {
    pub use crate::config::{CombatConfig, EnemyTable, SimConfig, WorldConfig};
    pub use crate::enemy::{Enemy, EnemyId};
    pub use crate::error::{Result, SimError};
    pub use crate::player::{HitSource, PlayerHit, PlayerState};
    pub use crate::world::{EnemyWorld, KillReport, TickReport, WorldStats};
    pub use forest_ai::AiState;
    pub use forest_core::{EnemyKind, Personality, TerrainObstacle};
    pub use forest_difficulty::{DifficultyConfig, DirectorReply, Intensity};
    pub use forest_math::Vec3;
}
