//! Forest AI - Enemy Perception and Decisions
//!
//! Per-enemy sensing and behavior selection.
//!
//! # Features
//!
//! - Vision cone with night penalty and terrain occlusion
//! - Hearing with a short memory of gunshots
//! - Threat scoring (0-100)
//! - Priority-arbitrated behaviors: attack, retreat, hunt, coordinate,
//!   investigate, patrol
//! - Seeded patrol rings around each spawn point
//!
//! # Example
//!
//! ```ignore
//! use forest_ai::prelude::*;
//!
//! let mut senses = EnemyPerception::default();
//! let mut brain = BehaviorSystem::new(Personality::Tactical, spawn, seed);
//!
//! let seen = senses.perceive(pos, yaw, player, player_vel, &obstacles, false, now);
//! let ctx = BehaviorContext::new(id, pos, player).with_senses(seen.can_see_player, seen.can_hear_player);
//! let decision = brain.make_decision(&ctx, dt, now);
//! ```

pub mod behavior;
pub mod context;
pub mod patrol;
pub mod perception;

pub mod prelude {
    pub use crate::behavior::{priority, BehaviorConfig, BehaviorSystem};
    pub use crate::context::{AiDecision, AiState, AllySnapshot, BehaviorContext};
    pub use crate::patrol::{PatrolRoute, PATROL_ARRIVAL_RADIUS};
    pub use crate::perception::{
        is_line_blocked, EnemyPerception, HeardSound, PerceptionConfig, PerceptionResult,
    };
    pub use forest_core::{EnemyKind, Personality, TerrainObstacle, Timestamp};
}

pub use prelude::*;
