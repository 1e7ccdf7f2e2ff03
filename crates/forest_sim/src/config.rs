//! Simulation configuration
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Environment variable: `FOREST_SIM_CONFIG=/path/to/file.toml`
//! 2. Config file: `forest_sim.toml` in the working directory
//! 3. Built-in defaults
//!
//! `FOREST_DIFFICULTY=calm|moderate|intense|extreme` then overrides the
//! starting difficulty preset.
//!
//! # Example Config File
//!
//! ```toml
//! difficulty = "intense"
//!
//! [perception]
//! vision_range = 60.0
//! vision_angle = 1.2      # radians
//! memory_duration_ms = 5000
//!
//! [behavior]
//! decision_cooldown_ms = 200
//!
//! [combat]
//! base_damage = 10.0
//! overlap = { radius = 2.0, interval_ms = 800 }
//!
//! [world]
//! despawn_distance = 150.0
//! death_animation_secs = 1.0
//!
//! [enemies.boss]      # unset fields keep the boss defaults
//! health = 400.0
//! score = 150
//! ```

use std::path::Path;

use forest_ai::{BehaviorConfig, PerceptionConfig};
use forest_combat::OverlapRule;
use forest_core::EnemyKind;
use forest_difficulty::{BaseStats, DifficultyConfig, Intensity};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Env var naming a config file
pub const CONFIG_ENV: &str = "FOREST_SIM_CONFIG";

/// Env var naming a difficulty preset
pub const DIFFICULTY_ENV: &str = "FOREST_DIFFICULTY";

/// Config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "forest_sim.toml";

/// Melee tuning shared by every enemy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Damage of a normal enemy's strike at difficulty 1.0
    pub base_damage: f32,
    pub overlap: OverlapRule,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            base_damage: 10.0,
            overlap: OverlapRule::default(),
        }
    }
}

/// World housekeeping
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Enemies farther than this from the player are removed
    pub despawn_distance: f32,
    /// How long a dead enemy stays before removal
    pub death_animation_secs: f32,
    /// Enemies stop moving this close to their target
    pub arrival_radius: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            despawn_distance: 150.0,
            death_animation_secs: 1.0,
            arrival_radius: 0.25,
        }
    }
}

/// Base stats per enemy kind. In a file, each `[enemies.<kind>]` section
/// may set any subset of fields; the rest keep that kind's built-in values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "EnemyTableFile")]
pub struct EnemyTable {
    pub normal: BaseStats,
    pub fast: BaseStats,
    pub tank: BaseStats,
    pub boss: BaseStats,
}

impl Default for EnemyTable {
    fn default() -> Self {
        Self {
            normal: BaseStats::for_kind(EnemyKind::Normal),
            fast: BaseStats::for_kind(EnemyKind::Fast),
            tank: BaseStats::for_kind(EnemyKind::Tank),
            boss: BaseStats::for_kind(EnemyKind::Boss),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StatOverrides {
    health: Option<f32>,
    speed: Option<f32>,
    score: Option<u32>,
}

impl StatOverrides {
    fn over(self, kind: EnemyKind) -> BaseStats {
        let base = BaseStats::for_kind(kind);
        BaseStats {
            health: self.health.unwrap_or(base.health),
            speed: self.speed.unwrap_or(base.speed),
            score: self.score.unwrap_or(base.score),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EnemyTableFile {
    normal: StatOverrides,
    fast: StatOverrides,
    tank: StatOverrides,
    boss: StatOverrides,
}

impl From<EnemyTableFile> for EnemyTable {
    fn from(file: EnemyTableFile) -> Self {
        Self {
            normal: file.normal.over(EnemyKind::Normal),
            fast: file.fast.over(EnemyKind::Fast),
            tank: file.tank.over(EnemyKind::Tank),
            boss: file.boss.over(EnemyKind::Boss),
        }
    }
}

impl EnemyTable {
    pub fn get(&self, kind: EnemyKind) -> &BaseStats {
        match kind {
            EnemyKind::Normal => &self.normal,
            EnemyKind::Fast => &self.fast,
            EnemyKind::Tank => &self.tank,
            EnemyKind::Boss => &self.boss,
        }
    }
}

/// Complete simulation configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Starting difficulty preset, `moderate` if unset
    pub difficulty: Option<Intensity>,
    pub perception: PerceptionConfig,
    pub behavior: BehaviorConfig,
    pub combat: CombatConfig,
    pub world: WorldConfig,
    pub enemies: EnemyTable,
    /// Where this config was loaded from
    #[serde(skip)]
    pub config_path: Option<String>,
}

impl SimConfig {
    /// Load configuration from all sources, falling back to defaults
    pub fn load() -> Self {
        let mut config = Self::default();

        let explicit = std::env::var(CONFIG_ENV).ok().filter(|p| !p.is_empty());
        let path = explicit.clone().unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());

        if explicit.is_some() || Path::new(&path).exists() {
            match Self::load_from_file(&path) {
                Ok(loaded) => {
                    config = loaded;
                    config.config_path = Some(path.clone());
                    log::info!("Loaded sim config from {}", path);
                }
                Err(e) => log::warn!("Ignoring config {}: {}", path, e),
            }
        }

        if let Ok(name) = std::env::var(DIFFICULTY_ENV) {
            match name.parse::<Intensity>() {
                Ok(intensity) => {
                    config.difficulty = Some(intensity);
                    log::info!("Difficulty from env: {}", intensity);
                }
                Err(e) => log::warn!("{}", e),
            }
        }

        config
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn with_difficulty(mut self, intensity: Intensity) -> Self {
        self.difficulty = Some(intensity);
        self
    }

    pub fn with_perception(mut self, perception: PerceptionConfig) -> Self {
        self.perception = perception;
        self
    }

    pub fn with_world(mut self, world: WorldConfig) -> Self {
        self.world = world;
        self
    }

    /// Difficulty the world starts with
    pub fn starting_difficulty(&self) -> DifficultyConfig {
        DifficultyConfig::preset(self.difficulty.unwrap_or_default())
    }
}
