//! Enemy entity
//!
//! One [`Enemy`] owns the perception, decision and attack state for a single
//! enemy plus its kinematics and health. The world calls [`Enemy::update`]
//! once per tick with read-only views of everything else.

use forest_ai::{AiDecision, AiState, AllySnapshot, BehaviorContext, BehaviorSystem, EnemyPerception, PerceptionResult};
use forest_combat::{AttackConfig, AttackResolver, Health};
use forest_core::{EnemyKind, Handle, Personality, TerrainObstacle, Timestamp};
use forest_difficulty::EnemyStats;
use forest_math::Vec3;
use rand::Rng;

use crate::config::SimConfig;
use crate::player::{HitSource, PlayerHit, PlayerState};

/// Stable address of an enemy in the world
pub type EnemyId = Handle<Enemy>;

/// Personality a freshly spawned enemy gets
pub fn personality_for<R: Rng>(kind: EnemyKind, rng: &mut R) -> Personality {
    const NORMAL_POOL: [Personality; 3] = [Personality::Aggressive, Personality::Defensive, Personality::Support];

    match kind {
        EnemyKind::Fast | EnemyKind::Boss => Personality::Tactical,
        EnemyKind::Tank => Personality::Aggressive,
        EnemyKind::Normal => NORMAL_POOL[rng.gen_range(0..NORMAL_POOL.len())],
    }
}

/// Read-only world state shared by every enemy in a tick
#[derive(Debug, Clone, Copy)]
pub struct TickInputs<'a> {
    pub player: &'a PlayerState,
    pub allies: &'a [AllySnapshot],
    pub obstacles: &'a [TerrainObstacle],
    pub is_night: bool,
    pub arrival_radius: f32,
    pub delta_time: f32,
    pub now: Timestamp,
}

/// A live or dying enemy
#[derive(Debug, Clone)]
pub struct Enemy {
    kind: EnemyKind,
    position: Vec3,
    /// Yaw in radians, 0 faces +Z
    rotation: f32,
    stats: EnemyStats,
    health: Health,
    perception: EnemyPerception,
    behavior: BehaviorSystem,
    attack: AttackResolver,
    last_damage_time: Option<Timestamp>,
    /// Seconds left before a dead enemy is removed
    death_timer: Option<f32>,
    last_decision: Option<AiDecision>,
    last_perception: Option<PerceptionResult>,
}

impl Enemy {
    pub fn new(
        kind: EnemyKind,
        personality: Personality,
        position: Vec3,
        stats: EnemyStats,
        config: &SimConfig,
        seed: u64,
    ) -> Self {
        let attack = AttackResolver::new(AttackConfig::for_kind(kind, stats.base_damage))
            .with_overlap(config.combat.overlap);

        Self {
            kind,
            position,
            rotation: 0.0,
            stats,
            health: Health::new(stats.max_health),
            perception: EnemyPerception::new(config.perception),
            behavior: BehaviorSystem::new(personality, position, seed).with_config(config.behavior),
            attack,
            last_damage_time: None,
            death_timer: None,
            last_decision: None,
            last_perception: None,
        }
    }

    /// Run one tick: perceive, decide, attack, move.
    ///
    /// `self_id` is this enemy's id as it appears in `inputs.allies`.
    pub fn update(&mut self, self_id: u64, inputs: &TickInputs<'_>) -> Option<PlayerHit> {
        if !self.health.is_alive() {
            return None;
        }

        let player = inputs.player;
        let sensed = self.perception.perceive(
            self.position,
            self.rotation,
            player.position,
            player.velocity,
            inputs.obstacles,
            inputs.is_night,
            inputs.now,
        );

        let context = BehaviorContext::new(self_id, self.position, player.position)
            .with_rotation(self.rotation)
            .with_player_velocity(player.velocity)
            .with_health(self.health.current, self.health.max)
            .with_kind(self.kind)
            .with_allies(inputs.allies)
            .with_senses(sensed.can_see_player, sensed.can_hear_player);
        let decision = self.behavior.make_decision(&context, inputs.delta_time, inputs.now);

        self.attack.update(inputs.delta_time);

        if self.attack.can_move() {
            self.move_toward(decision.target_position, decision.move_speed, inputs);
        }

        if decision.state == AiState::Attack || self.attack.is_attacking() {
            self.face(player.position);
        }

        if decision.should_attack {
            self.attack.try_attack(self.position, player.position, inputs.now);
        }

        self.last_decision = Some(decision);
        self.last_perception = Some(sensed);

        let source = if self.attack.check_hit(self.position, self.rotation, player.position) {
            HitSource::Strike
        } else if self
            .attack
            .check_overlap_damage(self.position, player.position, self.last_damage_time, inputs.now)
        {
            HitSource::Overlap
        } else {
            return None;
        };

        self.last_damage_time = Some(inputs.now);
        Some(PlayerHit {
            amount: self.attack.damage(),
            source,
        })
    }

    fn move_toward(&mut self, target: Vec3, speed_multiplier: f32, inputs: &TickInputs<'_>) {
        let offset = (target - self.position).flatten();
        let distance = offset.length();
        if !distance.is_finite() || distance <= inputs.arrival_radius {
            return;
        }

        let step = self.stats.speed * speed_multiplier * inputs.delta_time.max(0.0);
        if !step.is_finite() || step <= 0.0 {
            return;
        }

        let direction = offset / distance;
        self.position += direction * step.min(distance - inputs.arrival_radius);
        self.rotation = direction.yaw();
    }

    fn face(&mut self, point: Vec3) {
        let direction = (point - self.position).flatten();
        if direction.length_squared() > 0.0 {
            self.rotation = direction.yaw();
        }
    }

    /// Apply player damage. Returns true if this hit killed the enemy.
    pub fn take_damage(&mut self, amount: f32, death_animation_secs: f32) -> bool {
        let killed = self.health.apply_damage(amount).killed;
        if killed {
            self.attack.cancel_attack();
            self.death_timer = Some(death_animation_secs.max(0.0));
        }
        killed
    }

    /// Count down the death animation. Returns true once the body should go.
    pub fn advance_death(&mut self, delta_time: f32) -> bool {
        match self.death_timer.as_mut() {
            Some(timer) => {
                *timer -= delta_time.max(0.0);
                *timer <= 0.0
            }
            None => false,
        }
    }

    /// Pick up new difficulty multipliers, keeping current health
    pub fn rescale(&mut self, stats: EnemyStats) {
        self.stats = EnemyStats {
            max_health: self.stats.max_health,
            ..stats
        };
        let config = AttackConfig::for_kind(self.kind, stats.base_damage);
        self.attack.update_config(config);
    }

    pub fn hear_gunshot(&mut self, shot_position: Vec3, volume: f32, now: Timestamp) {
        if !self.health.is_alive() {
            return;
        }
        self.perception.register_sound(shot_position, volume, now);
        self.behavior.notify_player_shooting(shot_position, self.position);
    }

    pub fn snapshot(&self, id: u64) -> AllySnapshot {
        AllySnapshot {
            id,
            position: self.position,
            alive: self.health.is_alive(),
        }
    }

    pub fn kind(&self) -> EnemyKind {
        self.kind
    }

    pub fn personality(&self) -> Personality {
        self.behavior.personality()
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: f32) {
        self.rotation = rotation;
    }

    pub fn stats(&self) -> &EnemyStats {
        &self.stats
    }

    pub fn health(&self) -> &Health {
        &self.health
    }

    pub fn is_alive(&self) -> bool {
        self.health.is_alive()
    }

    pub fn state(&self) -> AiState {
        self.behavior.current_state()
    }

    pub fn behavior(&self) -> &BehaviorSystem {
        &self.behavior
    }

    pub fn perception(&self) -> &EnemyPerception {
        &self.perception
    }

    pub fn attack(&self) -> &AttackResolver {
        &self.attack
    }

    pub fn last_decision(&self) -> Option<&AiDecision> {
        self.last_decision.as_ref()
    }

    pub fn last_perception(&self) -> Option<&PerceptionResult> {
        self.last_perception.as_ref()
    }
}
