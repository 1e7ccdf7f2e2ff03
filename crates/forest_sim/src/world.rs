//! Enemy world
//!
//! Owns every enemy in an arena addressed by [`EnemyId`]. A tick updates
//! each enemy against a snapshot of the others taken at the start of the
//! tick; removals (finished death animations, despawns) are queued and
//! compacted once every enemy has been updated.

use forest_ai::AllySnapshot;
use forest_core::{EnemyKind, HandleMap, SimClock, TerrainObstacle, Timestamp};
use forest_difficulty::{DifficultyConfig, DirectorHandle, DirectorLink, EnemyStats};
use forest_math::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::enemy::{personality_for, Enemy, EnemyId, TickInputs};
use crate::error::{Result, SimError};
use crate::player::{PlayerHit, PlayerState};

/// An enemy killed by the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KillReport {
    pub id: EnemyId,
    pub kind: EnemyKind,
    pub score: u32,
}

/// What happened during one tick
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub now: Timestamp,
    /// Hits on the player, in update order
    pub hits: Vec<(EnemyId, PlayerHit)>,
    /// Health the player actually lost
    pub damage_taken: f32,
    /// Enemies removed at the end of the tick
    pub removed: Vec<EnemyId>,
    pub difficulty_changed: bool,
}

/// Running totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldStats {
    pub spawned: u64,
    pub killed: u64,
    pub despawned: u64,
    pub score: u64,
}

pub struct EnemyWorld {
    config: SimConfig,
    difficulty: DifficultyConfig,
    director: DirectorLink,
    enemies: HandleMap<Enemy>,
    obstacles: Vec<TerrainObstacle>,
    clock: SimClock,
    rng: StdRng,
    /// Queued for removal at the end of the current tick
    pending_removal: Vec<EnemyId>,
    stats: WorldStats,
}

impl EnemyWorld {
    pub fn new(config: SimConfig, seed: u64) -> Self {
        let difficulty = config.starting_difficulty();
        log::info!(
            "Enemy world: difficulty {} (x{:.1} health, x{:.1} speed)",
            difficulty.intensity,
            difficulty.enemy_difficulty,
            difficulty.enemy_speed
        );

        Self {
            config,
            difficulty,
            director: DirectorLink::new(),
            enemies: HandleMap::new(),
            obstacles: Vec::new(),
            clock: SimClock::new(),
            rng: StdRng::seed_from_u64(seed),
            pending_removal: Vec::new(),
            stats: WorldStats::default(),
        }
    }

    pub fn with_obstacles(mut self, obstacles: Vec<TerrainObstacle>) -> Self {
        self.obstacles = obstacles;
        self
    }

    pub fn with_difficulty(mut self, difficulty: DifficultyConfig) -> Self {
        self.set_difficulty(difficulty);
        self
    }

    /// Spawn an enemy of `kind` at `position`
    pub fn spawn(&mut self, kind: EnemyKind, position: Vec3) -> Result<EnemyId> {
        let stats = self.scaled_stats(kind);
        let personality = personality_for(kind, &mut self.rng);
        let seed = self.rng.gen();

        let enemy = Enemy::new(kind, personality, position, stats, &self.config, seed);
        let id = self.enemies.insert(enemy)?;
        self.stats.spawned += 1;

        log::debug!("Spawned {} {} ({}) at {:?}", kind, id, personality, position.to_array());
        Ok(id)
    }

    /// Spawn an enemy whose kind is drawn from the current spawn mix
    pub fn spawn_random(&mut self, position: Vec3) -> Result<EnemyId> {
        let kind = self.difficulty.spawn_variety.pick(&mut self.rng);
        self.spawn(kind, position)
    }

    /// Apply player damage to an enemy.
    ///
    /// Returns a kill report when this hit killed it. Hits on an enemy that
    /// is already dying are ignored.
    pub fn damage_enemy(&mut self, id: EnemyId, amount: f32) -> Result<Option<KillReport>> {
        let death_secs = self.config.world.death_animation_secs;
        let enemy = self
            .enemies
            .get_mut(id)
            .ok_or_else(|| SimError::UnknownEnemy(id.to_string()))?;

        if !enemy.take_damage(amount, death_secs) {
            return Ok(None);
        }

        let report = KillReport {
            id,
            kind: enemy.kind(),
            score: enemy.stats().score,
        };
        self.stats.killed += 1;
        self.stats.score += u64::from(report.score);

        log::info!("{} {} killed (+{} score)", report.kind, id, report.score);
        Ok(Some(report))
    }

    /// The player fired from `position`; every live enemy hears it
    pub fn player_fired(&mut self, position: Vec3, volume: f32) {
        let now = self.clock.now();
        for (_, enemy) in self.enemies.iter_mut() {
            enemy.hear_gunshot(position, volume, now);
        }
    }

    /// Replace the difficulty record. Live enemies rescale speed and damage
    /// for future attack cycles; their health is kept.
    pub fn set_difficulty(&mut self, difficulty: DifficultyConfig) {
        self.difficulty = difficulty.sanitized();

        let base_damage = self.config.combat.base_damage;
        for (_, enemy) in self.enemies.iter_mut() {
            let kind = enemy.kind();
            let stats = EnemyStats::scaled(kind, self.config.enemies.get(kind), base_damage, &self.difficulty);
            enemy.rescale(stats);
        }

        log::info!(
            "Difficulty now {} (x{:.2} health/damage, x{:.2} speed, spawn x{:.2})",
            self.difficulty.intensity,
            self.difficulty.enemy_difficulty,
            self.difficulty.enemy_speed,
            self.difficulty.enemy_spawn_rate
        );
    }

    /// Advance the simulation by `delta_time` seconds
    pub fn tick(&mut self, delta_time: f32, player: &mut PlayerState) -> TickReport {
        let delta_time = if delta_time.is_finite() { delta_time.max(0.0) } else { 0.0 };
        let now = self.clock.advance(delta_time);
        let mut report = TickReport {
            now,
            ..TickReport::default()
        };

        if let Some(difficulty) = self.director.poll() {
            self.set_difficulty(difficulty);
            report.difficulty_changed = true;
        }

        let allies: Vec<AllySnapshot> = self
            .enemies
            .iter()
            .map(|(id, enemy)| enemy.snapshot(id.to_bits()))
            .collect();
        let player_view = *player;
        let inputs = TickInputs {
            player: &player_view,
            allies: &allies,
            obstacles: &self.obstacles,
            is_night: self.difficulty.is_night(),
            arrival_radius: self.config.world.arrival_radius,
            delta_time,
            now,
        };

        let despawn_distance = self.config.world.despawn_distance;
        for (id, enemy) in self.enemies.iter_mut() {
            if !enemy.is_alive() {
                if enemy.advance_death(delta_time) {
                    self.pending_removal.push(id);
                }
                continue;
            }

            if enemy.position().planar_distance(player_view.position) > despawn_distance {
                log::debug!("Despawning {} {}: too far from player", enemy.kind(), id);
                self.stats.despawned += 1;
                self.pending_removal.push(id);
                continue;
            }

            if let Some(hit) = enemy.update(id.to_bits(), &inputs) {
                report.hits.push((id, hit));
            }
        }

        for (_, hit) in &report.hits {
            let outcome = player.health.apply_damage(hit.amount);
            report.damage_taken += outcome.dealt;
            if outcome.killed {
                log::info!("Player killed at {:.1}s", self.clock.elapsed_secs());
            }
        }

        for id in self.pending_removal.drain(..) {
            if self.enemies.remove(id).is_some() {
                report.removed.push(id);
            }
        }

        report
    }

    fn scaled_stats(&self, kind: EnemyKind) -> EnemyStats {
        EnemyStats::scaled(
            kind,
            self.config.enemies.get(kind),
            self.config.combat.base_damage,
            &self.difficulty,
        )
    }

    /// Sending side for an adaptive director
    pub fn director_handle(&self) -> DirectorHandle {
        self.director.handle()
    }

    pub fn get(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.get(id)
    }

    pub fn contains(&self, id: EnemyId) -> bool {
        self.enemies.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EnemyId, &Enemy)> {
        self.enemies.iter()
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    /// Enemies that are not dead or dying
    pub fn alive_count(&self) -> usize {
        self.enemies.iter().filter(|(_, e)| e.is_alive()).count()
    }

    pub fn difficulty(&self) -> &DifficultyConfig {
        &self.difficulty
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn obstacles(&self) -> &[TerrainObstacle] {
        &self.obstacles
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub fn stats(&self) -> WorldStats {
        self.stats
    }
}
