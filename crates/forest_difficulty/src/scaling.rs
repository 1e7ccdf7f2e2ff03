//! Enemy stat scaling
//!
//! Health and damage scale with `enemy_difficulty`, movement with
//! `enemy_speed`. Score is never scaled.

use forest_core::EnemyKind;
use serde::{Deserialize, Serialize};

use crate::config::DifficultyConfig;

/// Unscaled per-kind stats
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaseStats {
    pub health: f32,
    /// Units per second
    pub speed: f32,
    pub score: u32,
}

impl BaseStats {
    pub fn for_kind(kind: EnemyKind) -> Self {
        let (health, speed, score) = match kind {
            EnemyKind::Normal => (50.0, 4.8, 10),
            EnemyKind::Fast => (30.0, 9.0, 15),
            EnemyKind::Tank => (150.0, 2.4, 30),
            EnemyKind::Boss => (300.0, 3.0, 100),
        };
        Self { health, speed, score }
    }
}

impl Default for BaseStats {
    fn default() -> Self {
        Self::for_kind(EnemyKind::Normal)
    }
}

/// Stats after difficulty multipliers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyStats {
    pub kind: EnemyKind,
    pub max_health: f32,
    pub speed: f32,
    /// Melee damage before the per-kind attack multiplier
    pub base_damage: f32,
    pub score: u32,
}

impl EnemyStats {
    pub fn scaled(kind: EnemyKind, base: &BaseStats, base_damage: f32, difficulty: &DifficultyConfig) -> Self {
        Self {
            kind,
            max_health: base.health * difficulty.enemy_difficulty,
            speed: base.speed * difficulty.enemy_speed,
            base_damage: base_damage * difficulty.enemy_difficulty,
            score: base.score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_default_difficulty_is_identity() {
        let base = BaseStats::for_kind(EnemyKind::Tank);
        let stats = EnemyStats::scaled(EnemyKind::Tank, &base, 10.0, &DifficultyConfig::default());
        assert_eq!(stats.max_health, 150.0);
        assert_eq!(stats.speed, 2.4);
        assert_eq!(stats.base_damage, 10.0);
        assert_eq!(stats.score, 30);
    }

    #[test]
    fn test_multipliers_apply() {
        let difficulty = DifficultyConfig::default().with_multipliers(2.0, 1.5);
        let base = BaseStats::for_kind(EnemyKind::Fast);
        let stats = EnemyStats::scaled(EnemyKind::Fast, &base, 10.0, &difficulty);
        assert_abs_diff_eq!(stats.max_health, 60.0);
        assert_abs_diff_eq!(stats.speed, 13.5);
        assert_abs_diff_eq!(stats.base_damage, 20.0);
        assert_eq!(stats.score, 15);
    }
}
