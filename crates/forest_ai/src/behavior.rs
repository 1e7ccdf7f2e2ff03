//! Behavior decision engine
//!
//! Priority arbitration rather than a transition table: at each decision
//! boundary every eligible behavior is scored and the highest priority wins.
//!
//! | Behavior    | Eligible when                                   | Priority |
//! |-------------|-------------------------------------------------|----------|
//! | Attack      | player visible and closer than 5               | 100      |
//! | Retreat     | health < 25% and not aggressive                 | 95 / 70  |
//! | Hunt        | visible, audible, or alert level above 50       | 80       |
//! | Coordinate  | 3+ enemies within 40 of the player, self included | 60     |
//! | Investigate | not visible and a gunshot is being investigated | 50       |
//! | Patrol      | always                                          | 10       |
//!
//! Decisions are re-arbitrated at most every 200 ms. In between, only the
//! current behavior's target is recomputed so movement stays smooth.

use forest_core::{EnemyKind, Personality, Timestamp};
use forest_math::{consts, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::context::{AiDecision, AiState, BehaviorContext};
use crate::patrol::PatrolRoute;

/// Arbitration priorities
pub mod priority {
    pub const ATTACK: u8 = 100;
    pub const RETREAT_CRITICAL: u8 = 95;
    pub const HUNT: u8 = 80;
    pub const RETREAT: u8 = 70;
    pub const COORDINATE: u8 = 60;
    pub const INVESTIGATE: u8 = 50;
    pub const PATROL: u8 = 10;
}

const ATTACK_ENGAGE_DISTANCE: f32 = 5.0;
const ATTACK_STANDOFF: f32 = 3.0;
const ATTACK_LEAD_SECS: f32 = 0.3;
const HUNT_LEAD_PER_UNIT: f32 = 0.05;
const HUNT_MAX_LEAD_SECS: f32 = 2.0;
const FLANK_DISTANCE: f32 = 15.0;
const RETREAT_HEALTH: f32 = 0.25;
const RETREAT_CRITICAL_HEALTH: f32 = 0.15;
const RETREAT_DISTANCE: f32 = 25.0;
const COORDINATE_PLAYER_RADIUS: f32 = 40.0;
const COORDINATE_MIN_GROUP: usize = 3;
const CLUSTER_RADIUS: f32 = 30.0;
const SURROUND_RADIUS: f32 = 12.0;
const COORDINATE_STRIKE_DISTANCE: f32 = 4.0;
const INVESTIGATE_ARRIVAL: f32 = 3.0;
const SHOT_NOTICE_RADIUS: f32 = 40.0;
const ALERT_HUNT_THRESHOLD: f32 = 50.0;
const MAX_ALERT: f32 = 100.0;

/// Tunables for the decision engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Minimum time between full re-arbitrations
    pub decision_cooldown_ms: u64,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            decision_cooldown_ms: 200,
        }
    }
}

/// Per-enemy decision state
#[derive(Debug, Clone)]
pub struct BehaviorSystem {
    config: BehaviorConfig,
    personality: Personality,
    current_state: AiState,
    /// Seconds spent in the current state
    state_timer: f32,
    last_decision_time: Option<Timestamp>,
    patrol: PatrolRoute,
    last_known_player_position: Option<Vec3>,
    investigate_position: Option<Vec3>,
    alert_level: f32,
    /// +1 or -1, which side of the player to flank this decision interval
    flank_side: f32,
    rng: StdRng,
}

impl BehaviorSystem {
    /// New engine whose patrol ring surrounds `spawn`.
    ///
    /// `seed` drives the patrol ring and flank side choices.
    pub fn new(personality: Personality, spawn: Vec3, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let patrol = PatrolRoute::generate(spawn, &mut rng);

        Self {
            config: BehaviorConfig::default(),
            personality,
            current_state: AiState::Idle,
            state_timer: 0.0,
            last_decision_time: None,
            patrol,
            last_known_player_position: None,
            investigate_position: None,
            alert_level: 0.0,
            flank_side: 1.0,
            rng,
        }
    }

    pub fn with_config(mut self, config: BehaviorConfig) -> Self {
        self.config = config;
        self
    }

    /// Pick (or continue) a behavior for this tick
    pub fn make_decision(&mut self, context: &BehaviorContext<'_>, delta_time: f32, now: Timestamp) -> AiDecision {
        if delta_time.is_finite() && delta_time > 0.0 {
            self.state_timer += delta_time;
        }
        self.update_alert_level(context, delta_time);

        if let Some(last) = self.last_decision_time {
            if now.millis_since(last) < self.config.decision_cooldown_ms {
                return self.execute_current_state(context);
            }
        }
        self.last_decision_time = Some(now);

        if context.can_see_player {
            self.last_known_player_position = Some(context.player_position);
            self.investigate_position = None;
        }

        self.flank_side = if self.rng.gen_bool(0.5) { 1.0 } else { -1.0 };

        // Fixed slots in evaluation order; earlier slots win ties
        let mut candidates: [Option<AiDecision>; 6] = [None; 6];

        if context.health_fraction() < RETREAT_HEALTH && self.personality != Personality::Aggressive {
            candidates[0] = Some(self.evaluate_retreat(context));
        }

        if context.can_see_player && context.distance_to_player < ATTACK_ENGAGE_DISTANCE {
            candidates[1] = Some(self.evaluate_attack(context));
        }

        if context.can_see_player || context.hear_player_shooting || self.alert_level > ALERT_HUNT_THRESHOLD {
            candidates[2] = Some(self.evaluate_hunt(context));
        }

        if coordinate_eligible(context) {
            candidates[3] = Some(self.evaluate_coordinate(context));
        }

        if !context.can_see_player && self.investigate_position.is_some() {
            candidates[4] = Some(self.evaluate_investigate(context));
        }

        candidates[5] = Some(self.evaluate_patrol(context));

        let best = select_highest(&candidates).unwrap_or_else(|| self.evaluate_patrol(context));

        if best.state != self.current_state {
            log::debug!(
                "enemy {} {} -> {} after {:.1}s (priority {}, alert {:.0})",
                context.self_id,
                self.current_state,
                best.state,
                self.state_timer,
                best.priority,
                self.alert_level
            );
        }

        self.current_state = best.state;
        self.state_timer = 0.0;

        best
    }

    fn update_alert_level(&mut self, context: &BehaviorContext<'_>, delta_time: f32) {
        let dt = if delta_time.is_finite() { delta_time.max(0.0) } else { 0.0 };

        self.alert_level = if context.can_see_player {
            (self.alert_level + dt * 50.0).min(MAX_ALERT)
        } else if context.hear_player_shooting {
            (self.alert_level + dt * 30.0).min(MAX_ALERT)
        } else {
            (self.alert_level - dt * 5.0).max(0.0)
        };
    }

    /// Refresh the target of the current behavior without re-arbitrating
    fn execute_current_state(&mut self, context: &BehaviorContext<'_>) -> AiDecision {
        match self.current_state {
            AiState::Attack => self.evaluate_attack(context),
            AiState::Hunt => self.evaluate_hunt(context),
            AiState::Retreat => self.evaluate_retreat(context),
            AiState::Coordinate => self.evaluate_coordinate(context),
            AiState::Investigate if self.investigate_position.is_some() => self.evaluate_investigate(context),
            _ => self.evaluate_patrol(context),
        }
    }

    /// Close in on where the player will be, stopping at striking distance
    fn evaluate_attack(&self, context: &BehaviorContext<'_>) -> AiDecision {
        let predicted = lead(context.player_position, context.player_velocity, ATTACK_LEAD_SECS);
        let direction = (predicted - context.enemy_position)
            .flatten()
            .normalize_or(Vec3::from_yaw(context.enemy_rotation));

        AiDecision {
            state: AiState::Attack,
            target_position: predicted - direction * ATTACK_STANDOFF,
            should_attack: context.distance_to_player <= ATTACK_STANDOFF + 0.5,
            move_speed: if self.personality == Personality::Aggressive { 1.5 } else { 1.2 },
            priority: priority::ATTACK,
        }
    }

    fn evaluate_hunt(&self, context: &BehaviorContext<'_>) -> AiDecision {
        let lead_secs = (context.distance_to_player * HUNT_LEAD_PER_UNIT).min(HUNT_MAX_LEAD_SECS);
        let predicted = lead(context.player_position, context.player_velocity, lead_secs);

        let (target_position, move_speed) =
            if self.personality == Personality::Tactical || context.kind == EnemyKind::Fast {
                let to_player = context.player_position - context.enemy_position;
                let bearing = to_player.z.atan2(to_player.x) + self.flank_side * consts::FRAC_PI_3;
                let offset = Vec3::ground(bearing.cos(), bearing.sin()) * FLANK_DISTANCE;
                (context.player_position + offset, 1.3)
            } else if self.personality == Personality::Aggressive || context.kind == EnemyKind::Tank {
                (predicted, 1.2)
            } else {
                (predicted, 1.0)
            };

        AiDecision {
            state: AiState::Hunt,
            target_position,
            should_attack: false,
            move_speed,
            priority: priority::HUNT,
        }
    }

    fn evaluate_retreat(&self, context: &BehaviorContext<'_>) -> AiDecision {
        let away = (context.enemy_position - context.player_position)
            .flatten()
            .normalize_or(-Vec3::from_yaw(context.enemy_rotation));

        let priority = if context.health_fraction() < RETREAT_CRITICAL_HEALTH {
            priority::RETREAT_CRITICAL
        } else {
            priority::RETREAT
        };

        AiDecision {
            state: AiState::Retreat,
            target_position: context.enemy_position + away * RETREAT_DISTANCE,
            should_attack: false,
            move_speed: 1.5,
            priority,
        }
    }

    /// Take a slot in a ring around the player, indexed by position in the local cluster
    fn evaluate_coordinate(&self, context: &BehaviorContext<'_>) -> AiDecision {
        let mut total = 0usize;
        let mut own_slot = None;
        for ally in context
            .allies
            .iter()
            .filter(|a| a.alive && a.position.distance(context.enemy_position) < CLUSTER_RADIUS)
        {
            if ally.id == context.self_id {
                own_slot = Some(total);
            }
            total += 1;
        }

        let slot = match own_slot {
            Some(slot) => slot,
            None => {
                total += 1;
                total - 1
            }
        };

        if total < 2 {
            return self.evaluate_hunt(context);
        }

        let to_player = context.player_position - context.enemy_position;
        let angle = to_player.z.atan2(to_player.x) + consts::TAU * slot as f32 / total as f32;
        let offset = Vec3::ground(angle.cos(), angle.sin()) * SURROUND_RADIUS;

        AiDecision {
            state: AiState::Coordinate,
            target_position: context.player_position + offset,
            should_attack: context.distance_to_player < COORDINATE_STRIKE_DISTANCE,
            move_speed: 1.1,
            priority: priority::COORDINATE,
        }
    }

    fn evaluate_investigate(&mut self, context: &BehaviorContext<'_>) -> AiDecision {
        let target = self
            .investigate_position
            .or(self.last_known_player_position)
            .unwrap_or(context.enemy_position);

        if context.enemy_position.planar_distance(target) < INVESTIGATE_ARRIVAL {
            self.investigate_position = None;
            return self.evaluate_patrol(context);
        }

        AiDecision {
            state: AiState::Investigate,
            target_position: target,
            should_attack: false,
            move_speed: 0.8,
            priority: priority::INVESTIGATE,
        }
    }

    fn evaluate_patrol(&mut self, context: &BehaviorContext<'_>) -> AiDecision {
        AiDecision {
            state: AiState::Patrol,
            target_position: self.patrol.next_target(context.enemy_position),
            should_attack: false,
            move_speed: 0.5,
            priority: priority::PATROL,
        }
    }

    /// A shot was fired; enemies within 40 units go and look
    pub fn notify_player_shooting(&mut self, shot_position: Vec3, enemy_position: Vec3) {
        if shot_position.distance(enemy_position) < SHOT_NOTICE_RADIUS {
            self.investigate_position = Some(shot_position);
            self.alert_level = (self.alert_level + 30.0).min(MAX_ALERT);
        }
    }

    pub fn current_state(&self) -> AiState {
        self.current_state
    }

    pub fn alert_level(&self) -> f32 {
        self.alert_level
    }

    pub fn personality(&self) -> Personality {
        self.personality
    }

    pub fn investigate_position(&self) -> Option<Vec3> {
        self.investigate_position
    }

    pub fn last_known_player_position(&self) -> Option<Vec3> {
        self.last_known_player_position
    }

    pub fn patrol(&self) -> &PatrolRoute {
        &self.patrol
    }

    pub fn patrol_points(&self) -> Vec<Vec3> {
        self.patrol.points().collect()
    }

    /// Back to the pre-perception state, for respawn reuse
    pub fn reset(&mut self) {
        self.current_state = AiState::Idle;
        self.state_timer = 0.0;
        self.alert_level = 0.0;
        self.investigate_position = None;
        self.last_decision_time = None;
    }
}

fn coordinate_eligible(context: &BehaviorContext<'_>) -> bool {
    if context.distance_to_player.is_nan() || context.distance_to_player >= COORDINATE_PLAYER_RADIUS {
        return false;
    }

    let near_player = context
        .allies
        .iter()
        .filter(|a| a.alive && a.position.distance(context.player_position) < COORDINATE_PLAYER_RADIUS)
        .count();

    near_player >= COORDINATE_MIN_GROUP
}

/// Highest priority, first slot wins ties
fn select_highest(candidates: &[Option<AiDecision>]) -> Option<AiDecision> {
    candidates.iter().flatten().fold(None, |best: Option<AiDecision>, d| match best {
        Some(b) if b.priority >= d.priority => Some(b),
        _ => Some(*d),
    })
}

/// Where the player will be after `secs`, ignoring a non-finite velocity
fn lead(position: Vec3, velocity: Vec3, secs: f32) -> Vec3 {
    let predicted = position + velocity * secs;
    if predicted.is_finite() {
        predicted
    } else {
        position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::AllySnapshot;
    use approx::assert_abs_diff_eq;

    fn at(ms: u64) -> Timestamp {
        Timestamp::from_millis(ms)
    }

    fn engine(personality: Personality) -> BehaviorSystem {
        BehaviorSystem::new(personality, Vec3::ZERO, 42)
    }

    #[test]
    fn test_starts_idle_then_patrols() {
        let mut ai = engine(Personality::Defensive);
        assert_eq!(ai.current_state(), AiState::Idle);

        let ctx = BehaviorContext::new(1, Vec3::ZERO, Vec3::ground(0.0, 80.0));
        let decision = ai.make_decision(&ctx, 0.016, at(0));
        assert_eq!(decision.state, AiState::Patrol);
        assert_eq!(decision.priority, priority::PATROL);
        assert_eq!(decision.move_speed, 0.5);
        assert!(!decision.should_attack);
    }

    #[test]
    fn test_attack_outranks_critical_retreat() {
        // Attack(100) outranks even critical Retreat(95)
        let mut ai = engine(Personality::Tactical);
        let ctx = BehaviorContext::new(1, Vec3::ZERO, Vec3::ground(0.0, 3.0))
            .with_health(10.0, 100.0)
            .with_senses(true, false);

        let decision = ai.make_decision(&ctx, 0.016, at(0));
        assert_eq!(decision.state, AiState::Attack);
        assert_eq!(decision.priority, priority::ATTACK);
        assert!(decision.should_attack);
    }

    #[test]
    fn test_low_health_retreats_when_player_not_close() {
        let mut ai = engine(Personality::Defensive);
        let ctx = BehaviorContext::new(1, Vec3::ZERO, Vec3::ground(0.0, 20.0))
            .with_health(10.0, 100.0)
            .with_senses(true, false);

        let decision = ai.make_decision(&ctx, 0.016, at(0));
        assert_eq!(decision.state, AiState::Retreat);
        assert_eq!(decision.priority, priority::RETREAT_CRITICAL);
        assert_abs_diff_eq!(decision.target_position.z, -25.0, epsilon = 1e-4);
        assert_eq!(decision.move_speed, 1.5);
    }

    #[test]
    fn test_moderate_damage_retreat_loses_to_hunt() {
        let mut ai = engine(Personality::Defensive);
        let ctx = BehaviorContext::new(1, Vec3::ZERO, Vec3::ground(0.0, 20.0))
            .with_health(20.0, 100.0)
            .with_senses(true, false);

        let decision = ai.make_decision(&ctx, 0.016, at(0));
        assert_eq!(decision.state, AiState::Hunt);
    }

    #[test]
    fn test_aggressive_never_retreats() {
        let mut ai = engine(Personality::Aggressive);
        let ctx = BehaviorContext::new(1, Vec3::ZERO, Vec3::ground(0.0, 80.0)).with_health(1.0, 100.0);

        let decision = ai.make_decision(&ctx, 0.016, at(0));
        assert_eq!(decision.state, AiState::Patrol);
    }

    #[test]
    fn test_attack_targets_standoff_point() {
        let mut ai = engine(Personality::Aggressive);
        let ctx = BehaviorContext::new(1, Vec3::ZERO, Vec3::ground(0.0, 4.5)).with_senses(true, false);

        let decision = ai.make_decision(&ctx, 0.016, at(0));
        assert_eq!(decision.state, AiState::Attack);
        assert_abs_diff_eq!(decision.target_position.z, 1.5, epsilon = 1e-4);
        // 4.5 is outside striking distance of 3.5
        assert!(!decision.should_attack);
        assert_eq!(decision.move_speed, 1.5);
    }

    #[test]
    fn test_hunt_direct_charge_leads_target() {
        let mut ai = engine(Personality::Aggressive);
        let ctx = BehaviorContext::new(1, Vec3::ZERO, Vec3::ground(0.0, 20.0))
            .with_player_velocity(Vec3::ground(2.0, 0.0))
            .with_senses(true, false);

        let decision = ai.make_decision(&ctx, 0.016, at(0));
        assert_eq!(decision.state, AiState::Hunt);
        // 20 units away leads by one second
        assert_abs_diff_eq!(decision.target_position.x, 2.0, epsilon = 1e-4);
        assert_eq!(decision.move_speed, 1.2);
    }

    #[test]
    fn test_hunt_lead_is_capped() {
        let mut ai = engine(Personality::Defensive);
        let ctx = BehaviorContext::new(1, Vec3::ZERO, Vec3::ground(0.0, 45.0))
            .with_kind(EnemyKind::Tank)
            .with_player_velocity(Vec3::ground(1.0, 0.0))
            .with_senses(true, false);

        let decision = ai.make_decision(&ctx, 0.016, at(0));
        assert_eq!(decision.state, AiState::Hunt);
        assert_abs_diff_eq!(decision.target_position.x, 2.0, epsilon = 1e-4);
        assert_eq!(decision.move_speed, 1.2);
    }

    #[test]
    fn test_tactical_hunt_flanks() {
        for seed in 0..8 {
            let mut ai = BehaviorSystem::new(Personality::Tactical, Vec3::ZERO, seed);
            let player = Vec3::ground(0.0, 30.0);
            let ctx = BehaviorContext::new(1, Vec3::ZERO, player).with_senses(false, true);

            let decision = ai.make_decision(&ctx, 0.016, at(0));
            assert_eq!(decision.state, AiState::Hunt);
            assert_eq!(decision.move_speed, 1.3);
            assert_abs_diff_eq!(decision.target_position.planar_distance(player), 15.0, epsilon = 1e-3);
            // Offset 60 degrees from the enemy->player bearing, away from the enemy side
            let offset = decision.target_position - player;
            assert_abs_diff_eq!(offset.z, 15.0 * (consts::FRAC_PI_2 + consts::FRAC_PI_3).sin(), epsilon = 1e-3);
        }
    }

    #[test]
    fn test_decision_cooldown_keeps_state() {
        let mut ai = engine(Personality::Aggressive);
        let player = Vec3::ground(0.0, 20.0);
        let seen = BehaviorContext::new(1, Vec3::ZERO, player).with_senses(true, false);
        assert_eq!(ai.make_decision(&seen, 0.016, at(0)).state, AiState::Hunt);

        // Player vanishes 100ms later: still hunting, target refreshed
        let moved = Vec3::ground(5.0, 20.0);
        let unseen = BehaviorContext::new(1, Vec3::ZERO, moved);
        let decision = ai.make_decision(&unseen, 0.1, at(100));
        assert_eq!(decision.state, AiState::Hunt);
        assert_abs_diff_eq!(decision.target_position.x, 5.0, epsilon = 1e-3);

        // At the next boundary the alert level (< 50) no longer justifies hunting
        let decision = ai.make_decision(&unseen, 0.1, at(250));
        assert_eq!(decision.state, AiState::Patrol);
    }

    #[test]
    fn test_alert_level_rises_and_decays() {
        let mut ai = engine(Personality::Defensive);
        let far = Vec3::ground(0.0, 80.0);
        let seen = BehaviorContext::new(1, Vec3::ZERO, far).with_senses(true, false);
        ai.make_decision(&seen, 1.0, at(0));
        assert_abs_diff_eq!(ai.alert_level(), 50.0, epsilon = 1e-4);

        let heard = BehaviorContext::new(1, Vec3::ZERO, far).with_senses(false, true);
        ai.make_decision(&heard, 1.0, at(1_000));
        assert_abs_diff_eq!(ai.alert_level(), 80.0, epsilon = 1e-4);

        ai.make_decision(&seen, 1.0, at(2_000));
        assert_eq!(ai.alert_level(), 100.0);

        let calm = BehaviorContext::new(1, Vec3::ZERO, far);
        ai.make_decision(&calm, 2.0, at(3_000));
        assert_abs_diff_eq!(ai.alert_level(), 90.0, epsilon = 1e-4);

        ai.make_decision(&calm, 1_000.0, at(4_000));
        assert_eq!(ai.alert_level(), 0.0);
    }

    #[test]
    fn test_high_alert_alone_triggers_hunt() {
        let mut ai = engine(Personality::Aggressive);
        let far = Vec3::ground(0.0, 80.0);
        ai.notify_player_shooting(Vec3::ground(0.0, 30.0), Vec3::ZERO);
        ai.notify_player_shooting(Vec3::ground(0.0, 30.0), Vec3::ZERO);
        assert_eq!(ai.alert_level(), 60.0);

        let calm = BehaviorContext::new(1, Vec3::ZERO, far);
        let decision = ai.make_decision(&calm, 0.0, at(0));
        assert_eq!(decision.state, AiState::Hunt);
    }

    #[test]
    fn test_investigates_gunshot_then_patrols() {
        let mut ai = engine(Personality::Defensive);
        let shot = Vec3::ground(0.0, 20.0);
        ai.notify_player_shooting(shot, Vec3::ZERO);
        assert_eq!(ai.investigate_position(), Some(shot));

        let far = Vec3::ground(0.0, 80.0);
        let ctx = BehaviorContext::new(1, Vec3::ZERO, far);
        let decision = ai.make_decision(&ctx, 0.016, at(0));
        assert_eq!(decision.state, AiState::Investigate);
        assert_eq!(decision.target_position, shot);
        assert_eq!(decision.move_speed, 0.8);

        // Arrived: investigation resolves into patrol
        let arrived = BehaviorContext::new(1, Vec3::ground(0.0, 18.5), far);
        let decision = ai.make_decision(&arrived, 0.016, at(500));
        assert_eq!(decision.state, AiState::Patrol);
        assert_eq!(ai.investigate_position(), None);
    }

    #[test]
    fn test_distant_gunshot_ignored() {
        let mut ai = engine(Personality::Defensive);
        ai.notify_player_shooting(Vec3::ground(0.0, 41.0), Vec3::ZERO);
        assert_eq!(ai.investigate_position(), None);
        assert_eq!(ai.alert_level(), 0.0);
    }

    #[test]
    fn test_sighting_clears_investigation() {
        let mut ai = engine(Personality::Defensive);
        ai.notify_player_shooting(Vec3::ground(0.0, 20.0), Vec3::ZERO);

        let ctx = BehaviorContext::new(1, Vec3::ZERO, Vec3::ground(0.0, 30.0)).with_senses(true, false);
        ai.make_decision(&ctx, 0.016, at(0));
        assert_eq!(ai.investigate_position(), None);
        assert_eq!(ai.last_known_player_position(), Some(Vec3::ground(0.0, 30.0)));
    }

    fn pack(positions: &[Vec3]) -> Vec<AllySnapshot> {
        positions
            .iter()
            .enumerate()
            .map(|(i, p)| AllySnapshot {
                id: i as u64,
                position: *p,
                alive: true,
            })
            .collect()
    }

    #[test]
    fn test_coordinate_surrounds_player() {
        let player = Vec3::ground(0.0, 35.0);
        let allies = pack(&[Vec3::ZERO, Vec3::ground(5.0, 0.0), Vec3::ground(-5.0, 0.0)]);

        let mut ai = engine(Personality::Defensive);
        let ctx = BehaviorContext::new(1, allies[1].position, player).with_allies(&allies);
        let decision = ai.make_decision(&ctx, 0.016, at(0));

        assert_eq!(decision.state, AiState::Coordinate);
        assert_eq!(decision.priority, priority::COORDINATE);
        assert_abs_diff_eq!(decision.target_position.planar_distance(player), 12.0, epsilon = 1e-3);
        assert!(!decision.should_attack);
        assert_eq!(decision.move_speed, 1.1);
    }

    #[test]
    fn test_coordinate_strikes_when_close() {
        let player = Vec3::ground(0.0, 35.0);
        let allies = pack(&[Vec3::ground(0.0, 32.0), Vec3::ground(5.0, 20.0), Vec3::ground(-5.0, 20.0)]);

        let mut ai = engine(Personality::Defensive);
        let ctx = BehaviorContext::new(0, allies[0].position, player).with_allies(&allies);
        let decision = ai.make_decision(&ctx, 0.016, at(0));

        assert_eq!(decision.state, AiState::Coordinate);
        assert!(decision.should_attack);
    }

    #[test]
    fn test_coordinate_slots_differ_per_enemy() {
        let player = Vec3::ground(0.0, 35.0);
        let allies = pack(&[Vec3::ZERO, Vec3::ground(0.5, 0.0), Vec3::ground(-0.5, 0.0)]);

        let targets: Vec<Vec3> = (0..3)
            .map(|i| {
                let mut ai = engine(Personality::Defensive);
                let ctx = BehaviorContext::new(i as u64, allies[i].position, player).with_allies(&allies);
                ai.make_decision(&ctx, 0.016, at(0)).target_position
            })
            .collect();

        assert!(targets[0].distance(targets[1]) > 5.0);
        assert!(targets[1].distance(targets[2]) > 5.0);
    }

    #[test]
    fn test_coordinate_needs_three_near_player() {
        let player = Vec3::ground(0.0, 35.0);
        let allies = pack(&[Vec3::ZERO, Vec3::ground(5.0, 0.0), Vec3::ground(0.0, -20.0)]);

        let mut ai = engine(Personality::Defensive);
        let ctx = BehaviorContext::new(0, Vec3::ZERO, player).with_allies(&allies);
        assert_eq!(ai.make_decision(&ctx, 0.016, at(0)).state, AiState::Patrol);
    }

    #[test]
    fn test_coordinate_falls_back_to_hunt_when_isolated() {
        // Three enemies near the player, but the other two are far from this one
        let player = Vec3::ground(0.0, 0.0);
        let allies = pack(&[Vec3::ground(0.0, 35.0), Vec3::ground(0.0, -35.0), Vec3::ground(-35.0, 0.0)]);

        let mut ai = engine(Personality::Defensive);
        let ctx = BehaviorContext::new(0, allies[0].position, player).with_allies(&allies);
        let decision = ai.make_decision(&ctx, 0.016, at(0));
        assert_eq!(decision.state, AiState::Hunt);
    }

    #[test]
    fn test_dead_allies_do_not_count() {
        let player = Vec3::ground(0.0, 35.0);
        let mut allies = pack(&[Vec3::ZERO, Vec3::ground(5.0, 0.0), Vec3::ground(-5.0, 0.0)]);
        allies[2].alive = false;

        let mut ai = engine(Personality::Defensive);
        let ctx = BehaviorContext::new(0, Vec3::ZERO, player).with_allies(&allies);
        assert_eq!(ai.make_decision(&ctx, 0.016, at(0)).state, AiState::Patrol);
    }

    #[test]
    fn test_patrol_ring_advances() {
        let mut ai = engine(Personality::Defensive);
        let far = Vec3::ground(500.0, 500.0);
        let first = ai.patrol().current();

        let ctx = BehaviorContext::new(1, first, far);
        let decision = ai.make_decision(&ctx, 0.016, at(0));
        assert_eq!(decision.state, AiState::Patrol);
        assert_ne!(decision.target_position, first);
        assert_eq!(ai.patrol().index(), 1);
    }

    #[test]
    fn test_degenerate_geometry_is_finite() {
        let mut ai = engine(Personality::Tactical);
        let ctx = BehaviorContext::new(1, Vec3::ZERO, Vec3::ZERO)
            .with_player_velocity(Vec3::new(f32::NAN, 0.0, f32::INFINITY))
            .with_health(1.0, 100.0)
            .with_senses(true, true);

        let decision = ai.make_decision(&ctx, 0.016, at(0));
        assert!(decision.target_position.is_finite());
    }

    #[test]
    fn test_reset() {
        let mut ai = engine(Personality::Aggressive);
        ai.notify_player_shooting(Vec3::ground(0.0, 10.0), Vec3::ZERO);
        let ctx = BehaviorContext::new(1, Vec3::ZERO, Vec3::ground(0.0, 10.0)).with_senses(true, false);
        ai.make_decision(&ctx, 0.016, at(0));

        ai.reset();
        assert_eq!(ai.current_state(), AiState::Idle);
        assert_eq!(ai.alert_level(), 0.0);
        assert_eq!(ai.investigate_position(), None);
    }
}
