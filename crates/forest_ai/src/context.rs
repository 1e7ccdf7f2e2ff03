//! Decision inputs and outputs

use forest_core::EnemyKind;
use forest_math::Vec3;
use serde::{Deserialize, Serialize};

/// Behavior state selected by the decision engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiState {
    /// Before the first decision. Never re-entered.
    #[default]
    Idle,
    Patrol,
    Hunt,
    Attack,
    Retreat,
    Coordinate,
    /// Moving toward a remembered gunshot
    Investigate,
    /// Reserved, never selected
    Ambush,
}

impl AiState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Patrol => "patrol",
            Self::Hunt => "hunt",
            Self::Attack => "attack",
            Self::Retreat => "retreat",
            Self::Coordinate => "coordinate",
            Self::Investigate => "investigate",
            Self::Ambush => "ambush",
        }
    }
}

impl std::fmt::Display for AiState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only view of another enemy for group tactics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AllySnapshot {
    pub id: u64,
    pub position: Vec3,
    pub alive: bool,
}

/// Everything the decision engine may look at for one enemy this tick
#[derive(Debug, Clone, Copy)]
pub struct BehaviorContext<'a> {
    /// Id of the deciding enemy, matched against `allies`
    pub self_id: u64,
    pub enemy_position: Vec3,
    pub enemy_rotation: f32,
    pub player_position: Vec3,
    pub player_velocity: Vec3,
    pub distance_to_player: f32,
    pub health: f32,
    pub max_health: f32,
    pub kind: EnemyKind,
    /// All enemies in the world, the deciding one included
    pub allies: &'a [AllySnapshot],
    pub can_see_player: bool,
    pub hear_player_shooting: bool,
    /// Reserved
    pub is_in_cover: bool,
}

impl<'a> BehaviorContext<'a> {
    /// Context for a healthy, unaware enemy with no allies
    pub fn new(self_id: u64, enemy_position: Vec3, player_position: Vec3) -> Self {
        Self {
            self_id,
            enemy_position,
            enemy_rotation: 0.0,
            player_position,
            player_velocity: Vec3::ZERO,
            distance_to_player: enemy_position.distance(player_position),
            health: 100.0,
            max_health: 100.0,
            kind: EnemyKind::Normal,
            allies: &[],
            can_see_player: false,
            hear_player_shooting: false,
            is_in_cover: false,
        }
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.enemy_rotation = rotation;
        self
    }

    pub fn with_player_velocity(mut self, velocity: Vec3) -> Self {
        self.player_velocity = velocity;
        self
    }

    pub fn with_health(mut self, health: f32, max_health: f32) -> Self {
        self.health = health;
        self.max_health = max_health;
        self
    }

    pub fn with_kind(mut self, kind: EnemyKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_allies(mut self, allies: &'a [AllySnapshot]) -> Self {
        self.allies = allies;
        self
    }

    pub fn with_senses(mut self, can_see_player: bool, hear_player_shooting: bool) -> Self {
        self.can_see_player = can_see_player;
        self.hear_player_shooting = hear_player_shooting;
        self
    }

    /// Health as a fraction of max; a non-positive max counts as full health
    pub fn health_fraction(&self) -> f32 {
        if self.max_health > 0.0 {
            self.health / self.max_health
        } else {
            1.0
        }
    }
}

/// Decision output for one enemy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AiDecision {
    pub state: AiState,
    /// World point to move toward
    pub target_position: Vec3,
    pub should_attack: bool,
    /// Multiplier on the enemy's base speed
    pub move_speed: f32,
    /// Arbitration score, only meaningful inside the engine
    pub priority: u8,
}
