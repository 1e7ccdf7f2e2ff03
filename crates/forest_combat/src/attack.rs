//! Melee attack cycles
//!
//! An attack runs windup -> strike -> recovery over `attack_duration`
//! seconds. Damage can only land during the strike window and at most once
//! per cycle. The cooldown is measured from the start of the previous attack.

use forest_core::{EnemyKind, Timestamp};
use forest_math::{angle_between, consts, Vec3};
use serde::{Deserialize, Serialize};

/// Share of the attack duration spent in the strike window
pub const STRIKE_RATIO: f32 = 0.3;

/// Extra distance allowed by [`AttackResolver::check_hit`] beyond the attack range
pub const HIT_RANGE_SLACK: f32 = 1.5;

/// Extra angle (radians) allowed by [`AttackResolver::check_hit`] beyond the arc
pub const HIT_ARC_SLACK: f32 = 0.3;

/// Timing and reach of one enemy type's attack
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackConfig {
    pub damage: f32,
    pub attack_range: f32,
    pub attack_cooldown_ms: u64,
    /// Seconds
    pub attack_duration: f32,
    /// Seconds before the strike window opens
    pub attack_windup: f32,
    /// Seconds, informational; recovery is whatever remains after the strike
    pub attack_recovery: f32,
    pub can_move_while_attacking: bool,
    /// Radians
    pub attack_arc: f32,
}

impl AttackConfig {
    /// Per-type table; damage is `base_damage` times the type multiplier
    pub fn for_kind(kind: EnemyKind, base_damage: f32) -> Self {
        match kind {
            EnemyKind::Normal => Self {
                damage: base_damage,
                attack_range: 4.5,
                attack_cooldown_ms: 900,
                attack_duration: 0.4,
                attack_windup: 0.15,
                attack_recovery: 0.1,
                can_move_while_attacking: false,
                attack_arc: consts::PI * 0.8,
            },
            EnemyKind::Fast => Self {
                damage: base_damage * 0.75,
                attack_range: 4.5,
                attack_cooldown_ms: 700,
                attack_duration: 0.35,
                attack_windup: 0.1,
                attack_recovery: 0.1,
                can_move_while_attacking: true,
                attack_arc: consts::PI,
            },
            EnemyKind::Tank => Self {
                damage: base_damage * 1.5,
                attack_range: 5.0,
                attack_cooldown_ms: 1200,
                attack_duration: 0.6,
                attack_windup: 0.25,
                attack_recovery: 0.2,
                can_move_while_attacking: false,
                attack_arc: consts::PI * 0.75,
            },
            EnemyKind::Boss => Self {
                damage: base_damage * 2.0,
                attack_range: 5.5,
                attack_cooldown_ms: 1000,
                attack_duration: 0.5,
                attack_windup: 0.2,
                attack_recovery: 0.15,
                can_move_while_attacking: true,
                attack_arc: consts::PI * 1.2,
            },
        }
    }

    pub fn with_damage(mut self, damage: f32) -> Self {
        self.damage = damage;
        self
    }

    pub fn with_cooldown_ms(mut self, cooldown_ms: u64) -> Self {
        self.attack_cooldown_ms = cooldown_ms;
        self
    }

    /// Progress at which the strike window opens
    pub fn windup_ratio(&self) -> f32 {
        if self.attack_duration > 0.0 {
            self.attack_windup / self.attack_duration
        } else {
            0.0
        }
    }

    /// Progress at which recovery begins
    pub fn recovery_start(&self) -> f32 {
        self.windup_ratio() + STRIKE_RATIO
    }
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self::for_kind(EnemyKind::Normal, 10.0)
    }
}

/// Phase of an attack cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttackPhase {
    #[default]
    Idle,
    Windup,
    Strike,
    Recovery,
}

/// Contact damage when an enemy is inside the player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlapRule {
    pub radius: f32,
    /// Minimum gap between two overlap hits from the same enemy
    pub interval_ms: u64,
}

impl Default for OverlapRule {
    fn default() -> Self {
        Self {
            radius: 2.0,
            interval_ms: 800,
        }
    }
}

/// Snapshot of an attack cycle, for animation and HUD
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AttackState {
    pub is_attacking: bool,
    pub phase: AttackPhase,
    /// 0-1 through the current cycle
    pub progress: f32,
    pub last_attack_time: Option<Timestamp>,
    /// Whether this cycle already landed
    pub damage_dealt: bool,
    /// Player position when the attack started
    pub target_position: Option<Vec3>,
}

/// Per-enemy attack state machine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackResolver {
    /// Applies to the next cycle
    config: AttackConfig,
    /// Frozen at `try_attack` for the running cycle
    cycle: AttackConfig,
    overlap: OverlapRule,
    state: AttackState,
}

impl AttackResolver {
    pub fn new(config: AttackConfig) -> Self {
        Self {
            config,
            cycle: config,
            overlap: OverlapRule::default(),
            state: AttackState::default(),
        }
    }

    pub fn for_kind(kind: EnemyKind, base_damage: f32) -> Self {
        Self::new(AttackConfig::for_kind(kind, base_damage))
    }

    pub fn with_overlap(mut self, overlap: OverlapRule) -> Self {
        self.overlap = overlap;
        self
    }

    /// Advance the running cycle (call once per tick)
    pub fn update(&mut self, delta_time: f32) {
        if !self.state.is_attacking {
            return;
        }

        let step = if self.cycle.attack_duration > 0.0 {
            delta_time.max(0.0) / self.cycle.attack_duration
        } else {
            1.0
        };
        if step.is_finite() {
            self.state.progress = (self.state.progress + step).clamp(0.0, 1.0);
        } else if step.is_infinite() {
            self.state.progress = 1.0;
        }

        let progress = self.state.progress;
        self.state.phase = if progress < self.cycle.windup_ratio() {
            AttackPhase::Windup
        } else if progress < self.cycle.recovery_start() {
            AttackPhase::Strike
        } else {
            AttackPhase::Recovery
        };

        if progress >= 1.0 {
            self.end_attack();
        }
    }

    /// Start an attack if off cooldown and the player is within range
    pub fn try_attack(&mut self, enemy_position: Vec3, player_position: Vec3, now: Timestamp) -> bool {
        if let Some(last) = self.state.last_attack_time {
            if now.millis_since(last) < self.config.attack_cooldown_ms {
                return false;
            }
        }

        let distance = enemy_position.distance(player_position);
        if distance.is_nan() || distance > self.config.attack_range {
            return false;
        }

        self.cycle = self.config;
        self.state = AttackState {
            is_attacking: true,
            phase: AttackPhase::Windup,
            progress: 0.0,
            last_attack_time: Some(now),
            damage_dealt: false,
            target_position: Some(player_position),
        };

        true
    }

    /// Whether the running attack connects this tick. True at most once per cycle.
    pub fn check_hit(&mut self, enemy_position: Vec3, enemy_rotation: f32, player_position: Vec3) -> bool {
        if self.state.phase != AttackPhase::Strike || self.state.damage_dealt {
            return false;
        }

        let distance = enemy_position.distance(player_position);
        if distance.is_nan() || distance > self.cycle.attack_range + HIT_RANGE_SLACK {
            return false;
        }

        let forward = Vec3::from_yaw(enemy_rotation);
        let to_player = (player_position - enemy_position).normalize_or_zero();
        if angle_between(forward, to_player) > self.cycle.attack_arc + HIT_ARC_SLACK {
            return false;
        }

        self.state.damage_dealt = true;
        true
    }

    /// Fallback contact damage for an enemy clipping into the player
    pub fn check_overlap_damage(
        &self,
        enemy_position: Vec3,
        player_position: Vec3,
        last_damage_time: Option<Timestamp>,
        now: Timestamp,
    ) -> bool {
        let distance = enemy_position.distance(player_position);
        if distance.is_nan() || distance >= self.overlap.radius {
            return false;
        }

        match last_damage_time {
            Some(last) => now.millis_since(last) >= self.overlap.interval_ms,
            None => true,
        }
    }

    /// Damage of the running cycle, or of the next one when idle
    pub fn damage(&self) -> f32 {
        if self.state.is_attacking {
            self.cycle.damage
        } else {
            self.config.damage
        }
    }

    pub fn cancel_attack(&mut self) {
        if self.state.is_attacking {
            log::trace!("attack cancelled at {:.2}", self.state.progress);
        }
        self.end_attack();
    }

    pub fn can_move(&self) -> bool {
        !self.state.is_attacking || self.cycle.can_move_while_attacking
    }

    pub fn is_attacking(&self) -> bool {
        self.state.is_attacking
    }

    pub fn phase(&self) -> AttackPhase {
        self.state.phase
    }

    pub fn progress(&self) -> f32 {
        self.state.progress
    }

    pub fn state(&self) -> AttackState {
        self.state
    }

    pub fn config(&self) -> &AttackConfig {
        &self.config
    }

    /// The config frozen for the running cycle
    pub fn cycle_config(&self) -> &AttackConfig {
        &self.cycle
    }

    /// Replace the config; a running cycle keeps the old one until it ends
    pub fn update_config(&mut self, config: AttackConfig) {
        self.config = config;
        if !self.state.is_attacking {
            self.cycle = config;
        }
    }

    /// Forget everything, including the cooldown
    pub fn reset(&mut self) {
        self.state = AttackState::default();
        self.cycle = self.config;
    }

    fn end_attack(&mut self) {
        self.state.is_attacking = false;
        self.state.phase = AttackPhase::Idle;
        self.state.progress = 0.0;
        self.state.target_position = None;
        self.cycle = self.config;
    }
}

impl Default for AttackResolver {
    fn default() -> Self {
        Self::new(AttackConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn at(ms: u64) -> Timestamp {
        Timestamp::from_millis(ms)
    }

    fn in_front(distance: f32) -> Vec3 {
        Vec3::ground(0.0, distance)
    }

    #[test]
    fn test_config_table() {
        let normal = AttackConfig::for_kind(EnemyKind::Normal, 10.0);
        assert_eq!(normal.damage, 10.0);
        assert_eq!(normal.attack_cooldown_ms, 900);
        assert!(!normal.can_move_while_attacking);

        let fast = AttackConfig::for_kind(EnemyKind::Fast, 10.0);
        assert_eq!(fast.damage, 7.5);
        assert!(fast.can_move_while_attacking);

        let tank = AttackConfig::for_kind(EnemyKind::Tank, 10.0);
        assert_eq!(tank.damage, 15.0);
        assert_eq!(tank.attack_range, 5.0);

        let boss = AttackConfig::for_kind(EnemyKind::Boss, 10.0);
        assert_eq!(boss.damage, 20.0);
        assert_abs_diff_eq!(boss.attack_arc, consts::PI * 1.2);
    }

    #[test]
    fn test_out_of_range_does_not_start() {
        let mut attack = AttackResolver::for_kind(EnemyKind::Normal, 10.0);
        assert!(!attack.try_attack(Vec3::ZERO, in_front(4.6), at(0)));
        assert!(!attack.is_attacking());
        assert!(attack.try_attack(Vec3::ZERO, in_front(4.5), at(0)));
        assert_eq!(attack.phase(), AttackPhase::Windup);
        assert_eq!(attack.state().target_position, Some(in_front(4.5)));
    }

    #[test]
    fn test_cooldown_from_attack_start() {
        let mut attack = AttackResolver::for_kind(EnemyKind::Normal, 10.0);
        assert!(attack.try_attack(Vec3::ZERO, in_front(2.0), at(1_000)));
        // No update in between: still on cooldown
        assert!(!attack.try_attack(Vec3::ZERO, in_front(2.0), at(1_899)));
        assert!(attack.try_attack(Vec3::ZERO, in_front(2.0), at(1_900)));
    }

    #[test]
    fn test_phase_progression() {
        // Normal: windup ratio 0.375, strike until 0.675
        let mut attack = AttackResolver::for_kind(EnemyKind::Normal, 10.0);
        attack.try_attack(Vec3::ZERO, in_front(2.0), at(0));

        attack.update(0.1);
        assert_abs_diff_eq!(attack.progress(), 0.25, epsilon = 1e-5);
        assert_eq!(attack.phase(), AttackPhase::Windup);

        attack.update(0.1);
        assert_eq!(attack.phase(), AttackPhase::Strike);

        attack.update(0.1);
        assert_eq!(attack.phase(), AttackPhase::Recovery);

        attack.update(0.2);
        assert!(!attack.is_attacking());
        assert_eq!(attack.phase(), AttackPhase::Idle);
        assert_eq!(attack.progress(), 0.0);
        assert_eq!(attack.state().target_position, None);
    }

    #[test]
    fn test_hit_lands_once_per_cycle() {
        let mut attack = AttackResolver::for_kind(EnemyKind::Normal, 10.0);
        let player = in_front(3.0);
        attack.try_attack(Vec3::ZERO, player, at(0));

        assert!(!attack.check_hit(Vec3::ZERO, 0.0, player), "windup cannot hit");

        attack.update(0.2);
        assert_eq!(attack.phase(), AttackPhase::Strike);
        assert!(attack.check_hit(Vec3::ZERO, 0.0, player));
        assert!(!attack.check_hit(Vec3::ZERO, 0.0, player));

        attack.update(0.02);
        assert!(!attack.check_hit(Vec3::ZERO, 0.0, player));
    }

    #[test]
    fn test_hit_range_is_forgiving() {
        let mut attack = AttackResolver::for_kind(EnemyKind::Normal, 10.0);
        attack.try_attack(Vec3::ZERO, in_front(4.0), at(0));
        attack.update(0.2);

        // Player backed off to 5.9 during the windup: range 4.5 + 1.5
        assert!(attack.check_hit(Vec3::ZERO, 0.0, in_front(5.9)));

        let mut attack = AttackResolver::for_kind(EnemyKind::Normal, 10.0);
        attack.try_attack(Vec3::ZERO, in_front(4.0), at(0));
        attack.update(0.2);
        assert!(!attack.check_hit(Vec3::ZERO, 0.0, in_front(6.1)));
    }

    #[test]
    fn test_hit_arc() {
        // Tank arc 0.75pi + 0.3 is about 2.66 rad; directly behind is pi
        let mut attack = AttackResolver::for_kind(EnemyKind::Tank, 10.0);
        attack.try_attack(Vec3::ZERO, in_front(3.0), at(0));
        attack.update(0.3);
        assert_eq!(attack.phase(), AttackPhase::Strike);
        assert!(!attack.check_hit(Vec3::ZERO, 0.0, Vec3::ground(0.0, -3.0)));
        // Side-on is within the arc
        assert!(attack.check_hit(Vec3::ZERO, 0.0, Vec3::ground(3.0, 0.0)));
    }

    #[test]
    fn test_wide_boss_arc_hits_behind() {
        let mut attack = AttackResolver::for_kind(EnemyKind::Boss, 10.0);
        attack.try_attack(Vec3::ZERO, in_front(3.0), at(0));
        attack.update(0.25);
        assert!(attack.check_hit(Vec3::ZERO, 0.0, Vec3::ground(0.0, -3.0)));
    }

    #[test]
    fn test_overlap_damage() {
        let attack = AttackResolver::default();
        let player = in_front(1.5);

        assert!(attack.check_overlap_damage(Vec3::ZERO, player, None, at(0)));
        assert!(!attack.check_overlap_damage(Vec3::ZERO, player, Some(at(1_000)), at(1_799)));
        assert!(attack.check_overlap_damage(Vec3::ZERO, player, Some(at(1_000)), at(1_800)));
        assert!(!attack.check_overlap_damage(Vec3::ZERO, in_front(2.0), None, at(0)));
    }

    #[test]
    fn test_can_move() {
        let mut normal = AttackResolver::for_kind(EnemyKind::Normal, 10.0);
        assert!(normal.can_move());
        normal.try_attack(Vec3::ZERO, in_front(1.0), at(0));
        assert!(!normal.can_move());
        normal.cancel_attack();
        assert!(normal.can_move());

        let mut fast = AttackResolver::for_kind(EnemyKind::Fast, 10.0);
        fast.try_attack(Vec3::ZERO, in_front(1.0), at(0));
        assert!(fast.can_move());
    }

    #[test]
    fn test_config_change_waits_for_next_cycle() {
        let mut attack = AttackResolver::for_kind(EnemyKind::Normal, 10.0);
        attack.try_attack(Vec3::ZERO, in_front(1.0), at(0));

        attack.update_config(AttackConfig::for_kind(EnemyKind::Normal, 30.0));
        assert_eq!(attack.damage(), 10.0);
        assert_eq!(attack.cycle_config().damage, 10.0);

        attack.update(1.0);
        assert!(!attack.is_attacking());
        assert_eq!(attack.damage(), 30.0);
    }

    #[test]
    fn test_degenerate_inputs() {
        let mut attack = AttackResolver::for_kind(EnemyKind::Normal, 10.0);
        attack.try_attack(Vec3::ZERO, Vec3::ZERO, at(0));
        attack.update(f32::NAN);
        assert!(attack.progress() >= 0.0 && attack.progress() <= 1.0);
        attack.update(-5.0);
        assert_eq!(attack.progress(), 0.0);

        // Zero duration finishes in one tick
        let zero = AttackConfig::default().with_cooldown_ms(0);
        let mut attack = AttackResolver::new(AttackConfig {
            attack_duration: 0.0,
            ..zero
        });
        attack.try_attack(Vec3::ZERO, in_front(1.0), at(0));
        attack.update(0.016);
        assert!(!attack.is_attacking());
    }

    #[test]
    fn test_reset_clears_cooldown() {
        let mut attack = AttackResolver::default();
        attack.try_attack(Vec3::ZERO, in_front(1.0), at(0));
        attack.reset();
        assert!(!attack.is_attacking());
        assert!(attack.try_attack(Vec3::ZERO, in_front(1.0), at(10)));
    }
}
