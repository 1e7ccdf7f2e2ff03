//! Forest Combat - Enemy Attacks and Health
//!
//! # Features
//!
//! - Per-type melee attack table (normal, fast, tank, boss)
//! - Windup / strike / recovery attack cycles with a once-per-cycle hit guard
//! - Forgiving hit checks plus an overlap fallback for clipping enemies
//! - Arm and torso pose curves for the renderer
//! - Health with death reporting
//!
//! # Example
//!
//! ```ignore
//! use forest_combat::prelude::*;
//!
//! let mut attack = AttackResolver::for_kind(EnemyKind::Tank, 10.0);
//! if attack.try_attack(enemy_pos, player_pos, now) {
//!     // ...
//! }
//! attack.update(dt);
//! if attack.check_hit(enemy_pos, enemy_yaw, player_pos) {
//!     player_health.apply_damage(attack.damage());
//! }
//! ```

pub mod attack;
pub mod health;
pub mod pose;

pub mod prelude {
    pub use crate::attack::{AttackConfig, AttackPhase, AttackResolver, AttackState, OverlapRule};
    pub use crate::health::{DamageOutcome, Health};
    pub use crate::pose::{arm_rotation, torso_rotation, ArmPose};
    pub use forest_core::EnemyKind;
}

pub use prelude::*;
