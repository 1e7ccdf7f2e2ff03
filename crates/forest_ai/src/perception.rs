//! Perception and sensing system
//!
//! Each enemy owns one [`EnemyPerception`]. Every tick it fuses three sensors
//! into a [`PerceptionResult`]:
//!
//! - **Vision**: range check (reduced at night), view cone around the enemy's
//!   yaw, then a line-of-sight test against collidable terrain cylinders.
//! - **Hearing**: player movement noise against a distance-scaled threshold,
//!   plus a short memory of loud sounds such as gunfire.
//! - **Threat**: a 0-100 score from visibility, recency, audibility and
//!   player speed.

use std::collections::VecDeque;

use forest_core::{TerrainObstacle, Timestamp};
use forest_math::{angle_between, clamp, consts, Vec3};
use serde::{Deserialize, Serialize};

/// Hearing sensitivity restored by [`EnemyPerception::reset`]
pub const BASELINE_HEARING_SENSITIVITY: f32 = 1.0;

/// Upper bound for sensitivity boosts from loud sounds
pub const MAX_HEARING_SENSITIVITY: f32 = 2.0;

/// Sensor tuning for one enemy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerceptionConfig {
    /// Maximum sight distance in daylight
    pub vision_range: f32,
    /// Maximum angle (radians) between facing and the player.
    ///
    /// This is compared directly against the angle to the player, so the
    /// cone is twice as wide as this value.
    pub vision_angle: f32,
    /// Maximum hearing distance
    pub hearing_range: f32,
    /// Initial hearing sensitivity
    pub hearing_sensitivity: f32,
    /// Vision range multiplier at night
    pub night_vision_multiplier: f32,
    /// How long loud sounds are remembered (milliseconds)
    pub memory_duration_ms: u64,
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        Self {
            vision_range: 50.0,
            vision_angle: consts::FRAC_PI_2,
            hearing_range: 40.0,
            hearing_sensitivity: BASELINE_HEARING_SENSITIVITY,
            night_vision_multiplier: 0.7,
            memory_duration_ms: 5_000,
        }
    }
}

impl PerceptionConfig {
    pub fn with_vision(mut self, range: f32, angle: f32) -> Self {
        self.vision_range = range;
        self.vision_angle = angle;
        self
    }

    pub fn with_hearing(mut self, range: f32, sensitivity: f32) -> Self {
        self.hearing_range = range;
        self.hearing_sensitivity = sensitivity;
        self
    }
}

/// A remembered loud sound
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeardSound {
    pub position: Vec3,
    pub time: Timestamp,
}

/// What an enemy knows about the player this tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerceptionResult {
    pub can_see_player: bool,
    pub can_hear_player: bool,
    pub player_distance: f32,
    /// Unit vector from enemy to player
    pub player_direction: Vec3,
    /// 0-100
    pub threat_level: f32,
    pub last_seen_position: Option<Vec3>,
    /// Seconds, `f32::INFINITY` if the player was never seen
    pub time_since_last_seen: f32,
}

/// Per-enemy perception state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyPerception {
    config: PerceptionConfig,
    last_seen_position: Option<Vec3>,
    last_seen_time: Option<Timestamp>,
    hearing_memory: VecDeque<HeardSound>,
    hearing_sensitivity: f32,
}

impl Default for EnemyPerception {
    fn default() -> Self {
        Self::new(PerceptionConfig::default())
    }
}

impl EnemyPerception {
    pub fn new(config: PerceptionConfig) -> Self {
        Self {
            hearing_sensitivity: config.hearing_sensitivity,
            config,
            last_seen_position: None,
            last_seen_time: None,
            hearing_memory: VecDeque::new(),
        }
    }

    pub fn config(&self) -> &PerceptionConfig {
        &self.config
    }

    /// Run all sensors for this tick.
    ///
    /// Updates the last-seen record when the player is visible and prunes
    /// expired hearing memories before hearing is evaluated.
    #[allow(clippy::too_many_arguments)]
    pub fn perceive(
        &mut self,
        enemy_position: Vec3,
        enemy_rotation: f32,
        player_position: Vec3,
        player_velocity: Vec3,
        obstacles: &[TerrainObstacle],
        is_night: bool,
        now: Timestamp,
    ) -> PerceptionResult {
        let forward = Vec3::from_yaw(enemy_rotation);
        let player_direction = (player_position - enemy_position).normalize_or(forward);
        let player_distance = enemy_position.distance(player_position);

        let can_see = self.check_vision(
            enemy_position,
            enemy_rotation,
            player_position,
            player_distance,
            obstacles,
            is_night,
        );

        if can_see {
            self.last_seen_position = Some(player_position);
            self.last_seen_time = Some(now);
        }

        let time_since_last_seen = match self.last_seen_time {
            Some(seen) if self.last_seen_position.is_some() => now.secs_since(seen),
            _ => f32::INFINITY,
        };

        self.prune_memory(now);

        let can_hear = self.check_hearing(enemy_position, player_velocity, player_distance);

        let threat_level = assess_threat(
            can_see,
            can_hear,
            player_distance,
            time_since_last_seen,
            player_velocity,
        );

        PerceptionResult {
            can_see_player: can_see,
            can_hear_player: can_hear,
            player_distance,
            player_direction,
            threat_level,
            last_seen_position: self.last_seen_position,
            time_since_last_seen,
        }
    }

    fn check_vision(
        &self,
        enemy_position: Vec3,
        enemy_rotation: f32,
        player_position: Vec3,
        player_distance: f32,
        obstacles: &[TerrainObstacle],
        is_night: bool,
    ) -> bool {
        let effective_range = if is_night {
            self.config.vision_range * self.config.night_vision_multiplier
        } else {
            self.config.vision_range
        };

        if player_distance.is_nan() || player_distance > effective_range {
            return false;
        }

        if !self.is_in_field_of_view(enemy_position, enemy_rotation, player_position) {
            return false;
        }

        !is_line_blocked(enemy_position, player_position, obstacles)
    }

    fn check_hearing(&self, enemy_position: Vec3, player_velocity: Vec3, player_distance: f32) -> bool {
        let range = self.config.hearing_range;
        if range <= 0.0 || player_distance.is_nan() || player_distance > range {
            return false;
        }

        let movement_noise = player_velocity.length() * 10.0 * self.hearing_sensitivity;
        let threshold = (player_distance / range) * 100.0;

        let recent_sound = self
            .hearing_memory
            .iter()
            .any(|sound| sound.position.distance(enemy_position) < range);

        movement_noise > threshold || recent_sound
    }

    fn prune_memory(&mut self, now: Timestamp) {
        let duration = self.config.memory_duration_ms;
        self.hearing_memory
            .retain(|sound| now.millis_since(sound.time) < duration);
    }

    /// Remember a loud sound (gunshot, explosion).
    ///
    /// Also raises hearing sensitivity by `volume * 0.2`, up to 2.0. The boost
    /// does not wear off on its own; only [`EnemyPerception::reset`] restores
    /// the baseline.
    pub fn register_sound(&mut self, position: Vec3, volume: f32, now: Timestamp) {
        self.hearing_memory.push_back(HeardSound { position, time: now });

        let boost = if volume.is_finite() { volume.max(0.0) * 0.2 } else { 0.0 };
        self.hearing_sensitivity = (self.hearing_sensitivity + boost).min(MAX_HEARING_SENSITIVITY);
    }

    pub fn set_vision_parameters(&mut self, range: f32, angle: f32) {
        self.config.vision_range = range;
        self.config.vision_angle = angle;
    }

    pub fn set_hearing_parameters(&mut self, range: f32, sensitivity: f32) {
        self.config.hearing_range = range;
        self.hearing_sensitivity = sensitivity;
    }

    pub fn last_seen_position(&self) -> Option<Vec3> {
        self.last_seen_position
    }

    pub fn last_seen_time(&self) -> Option<Timestamp> {
        self.last_seen_time
    }

    pub fn hearing_sensitivity(&self) -> f32 {
        self.hearing_sensitivity
    }

    pub fn hearing_memory_len(&self) -> usize {
        self.hearing_memory.len()
    }

    /// Clear everything, for reuse after respawn
    pub fn reset(&mut self) {
        self.last_seen_position = None;
        self.last_seen_time = None;
        self.hearing_memory.clear();
        self.hearing_sensitivity = BASELINE_HEARING_SENSITIVITY;
    }

    /// View cone test without range or occlusion
    pub fn is_in_field_of_view(&self, enemy_position: Vec3, enemy_rotation: f32, point: Vec3) -> bool {
        let forward = Vec3::from_yaw(enemy_rotation);
        let to_point = (point - enemy_position).normalize_or(forward);
        angle_between(forward, to_point) <= self.config.vision_angle
    }
}

/// Whether the segment `start -> end` passes through any collidable obstacle.
///
/// Works on the ground plane: obstacles are infinite vertical cylinders.
pub fn is_line_blocked(start: Vec3, end: Vec3, obstacles: &[TerrainObstacle]) -> bool {
    let segment = (end - start).flatten();
    let length = segment.length();
    if length <= consts::EPSILON || !length.is_finite() {
        return false;
    }
    let direction = segment / length;

    obstacles.iter().filter(|o| o.collidable).any(|obstacle| {
        let to_obstacle = (obstacle.center() - start).flatten();
        let projection = to_obstacle.dot(direction);

        // Behind the viewer or beyond the target
        if projection < 0.0 || projection > length {
            return false;
        }

        let closest = start.flatten() + direction * projection;
        closest.planar_distance(obstacle.center()) < obstacle.radius
    })
}

fn assess_threat(
    can_see: bool,
    can_hear: bool,
    distance: f32,
    time_since_last_seen: f32,
    player_velocity: Vec3,
) -> f32 {
    let mut threat = 0.0;

    if can_see {
        threat += 60.0;
        threat += (30.0 * (1.0 - distance / 50.0)).max(0.0);
    } else if time_since_last_seen < 5.0 {
        threat += 40.0 * (1.0 - time_since_last_seen.max(0.0) / 5.0);
    }

    if can_hear {
        threat += 20.0;
    }

    threat += (player_velocity.length() * 5.0).min(10.0);

    clamp(threat, 0.0, 100.0)
}
