//! Difficulty configuration record
//!
//! A [`DifficultyConfig`] is replaced wholesale, never patched in place.
//! Every constructor path ends in [`DifficultyConfig::sanitized`] so that
//! consumers can rely on the documented ranges.

use std::fmt;
use std::str::FromStr;

use forest_core::EnemyKind;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::DifficultyError;

pub const SPAWN_RATE_RANGE: (f32, f32) = (0.5, 3.0);
pub const DIFFICULTY_RANGE: (f32, f32) = (0.5, 3.0);
pub const SPEED_RANGE: (f32, f32) = (0.5, 2.5);
pub const RAMP_RANGE: (f32, f32) = (0.1, 1.0);

/// Lighting preset chosen by the director
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    #[default]
    Day,
    Night,
    Dawn,
    Dusk,
    Bloodmoon,
}

impl TimeOfDay {
    pub const ALL: [TimeOfDay; 5] = [Self::Day, Self::Night, Self::Dawn, Self::Dusk, Self::Bloodmoon];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Night => "night",
            Self::Dawn => "dawn",
            Self::Dusk => "dusk",
            Self::Bloodmoon => "bloodmoon",
        }
    }

    /// Whether enemies see with the night penalty
    pub fn is_dark(self) -> bool {
        matches!(self, Self::Night | Self::Bloodmoon)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

/// Cosmetic weather preset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Atmosphere {
    #[default]
    Normal,
    Foggy,
    Stormy,
    Ethereal,
    Apocalyptic,
}

impl Atmosphere {
    pub const ALL: [Atmosphere; 5] = [
        Self::Normal,
        Self::Foggy,
        Self::Stormy,
        Self::Ethereal,
        Self::Apocalyptic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Foggy => "foggy",
            Self::Stormy => "stormy",
            Self::Ethereal => "ethereal",
            Self::Apocalyptic => "apocalyptic",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == name)
    }
}

/// Overall pacing label
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Calm,
    #[default]
    Moderate,
    Intense,
    Extreme,
}

impl Intensity {
    pub const ALL: [Intensity; 4] = [Self::Calm, Self::Moderate, Self::Intense, Self::Extreme];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Calm => "calm",
            Self::Moderate => "moderate",
            Self::Intense => "intense",
            Self::Extreme => "extreme",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|i| i.as_str() == name)
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intensity {
    type Err = DifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        Self::from_name(&name).ok_or(DifficultyError::UnknownIntensity(name))
    }
}

/// Spawn mix in percent per enemy kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnVariety {
    pub normal: f32,
    pub fast: f32,
    pub tank: f32,
    pub boss: f32,
}

impl Default for SpawnVariety {
    fn default() -> Self {
        Self {
            normal: 60.0,
            fast: 25.0,
            tank: 10.0,
            boss: 5.0,
        }
    }
}

impl SpawnVariety {
    pub fn new(normal: f32, fast: f32, tank: f32, boss: f32) -> Self {
        Self {
            normal,
            fast,
            tank,
            boss,
        }
    }

    pub fn weight(&self, kind: EnemyKind) -> f32 {
        match kind {
            EnemyKind::Normal => self.normal,
            EnemyKind::Fast => self.fast,
            EnemyKind::Tank => self.tank,
            EnemyKind::Boss => self.boss,
        }
    }

    pub fn total(&self) -> f32 {
        self.normal + self.fast + self.tank + self.boss
    }

    /// Clamp each share to 0-100 and rescale to whole percents summing to
    /// about 100. An all-zero mix falls back to the default.
    pub fn normalized(self) -> Self {
        let share = |v: f32| if v.is_nan() { 0.0 } else { v.clamp(0.0, 100.0) };
        let clamped = Self::new(share(self.normal), share(self.fast), share(self.tank), share(self.boss));

        let total = clamped.total();
        if total <= 0.0 {
            return Self::default();
        }

        let percent = |v: f32| (v / total * 100.0).round();
        Self::new(
            percent(clamped.normal),
            percent(clamped.fast),
            percent(clamped.tank),
            percent(clamped.boss),
        )
    }

    /// Weighted draw of an enemy kind
    pub fn pick<R: Rng>(&self, rng: &mut R) -> EnemyKind {
        let weights = EnemyKind::ALL.map(|kind| self.weight(kind).max(0.0));
        match WeightedIndex::new(weights) {
            Ok(dist) => EnemyKind::ALL[dist.sample(rng)],
            Err(_) => EnemyKind::Normal,
        }
    }
}

/// Multipliers and spawn mix consumed by the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DifficultyConfig {
    /// Read by the spawn scheduler
    pub enemy_spawn_rate: f32,
    /// Health and damage multiplier
    pub enemy_difficulty: f32,
    /// Movement speed multiplier
    pub enemy_speed: f32,
    pub spawn_variety: SpawnVariety,
    pub time_of_day: TimeOfDay,
    pub atmosphere: Atmosphere,
    pub intensity: Intensity,
    pub progressive_difficulty: bool,
    pub difficulty_ramp: f32,
    pub special_features: Vec<String>,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            enemy_spawn_rate: 1.0,
            enemy_difficulty: 1.0,
            enemy_speed: 1.0,
            spawn_variety: SpawnVariety::default(),
            time_of_day: TimeOfDay::Day,
            atmosphere: Atmosphere::Normal,
            intensity: Intensity::Moderate,
            progressive_difficulty: false,
            difficulty_ramp: 0.5,
            special_features: Vec::new(),
        }
    }
}

impl DifficultyConfig {
    /// Static preset for an intensity label
    pub fn preset(intensity: Intensity) -> Self {
        let base = Self {
            intensity,
            ..Self::default()
        };

        match intensity {
            Intensity::Calm => Self {
                enemy_spawn_rate: 0.7,
                enemy_difficulty: 0.7,
                enemy_speed: 0.8,
                spawn_variety: SpawnVariety::new(75.0, 20.0, 5.0, 0.0),
                difficulty_ramp: 0.2,
                ..base
            },
            Intensity::Moderate => base,
            Intensity::Intense => Self {
                enemy_spawn_rate: 1.6,
                enemy_difficulty: 1.5,
                enemy_speed: 1.3,
                spawn_variety: SpawnVariety::new(45.0, 30.0, 18.0, 7.0),
                time_of_day: TimeOfDay::Dusk,
                atmosphere: Atmosphere::Stormy,
                progressive_difficulty: true,
                difficulty_ramp: 0.6,
                ..base
            },
            Intensity::Extreme => Self {
                enemy_spawn_rate: 2.5,
                enemy_difficulty: 2.5,
                enemy_speed: 2.0,
                spawn_variety: SpawnVariety::new(30.0, 30.0, 25.0, 15.0),
                time_of_day: TimeOfDay::Bloodmoon,
                atmosphere: Atmosphere::Apocalyptic,
                progressive_difficulty: true,
                difficulty_ramp: 0.9,
                ..base
            },
        }
    }

    pub fn with_multipliers(mut self, difficulty: f32, speed: f32) -> Self {
        self.enemy_difficulty = difficulty;
        self.enemy_speed = speed;
        self
    }

    pub fn with_time_of_day(mut self, time_of_day: TimeOfDay) -> Self {
        self.time_of_day = time_of_day;
        self
    }

    pub fn with_spawn_variety(mut self, variety: SpawnVariety) -> Self {
        self.spawn_variety = variety;
        self
    }

    /// Clamp every numeric field into range and normalize the spawn mix
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        self.enemy_spawn_rate = clamp_or(self.enemy_spawn_rate, SPAWN_RATE_RANGE, defaults.enemy_spawn_rate);
        self.enemy_difficulty = clamp_or(self.enemy_difficulty, DIFFICULTY_RANGE, defaults.enemy_difficulty);
        self.enemy_speed = clamp_or(self.enemy_speed, SPEED_RANGE, defaults.enemy_speed);
        self.difficulty_ramp = clamp_or(self.difficulty_ramp, RAMP_RANGE, defaults.difficulty_ramp);
        self.spawn_variety = self.spawn_variety.normalized();
        self
    }

    /// Whether perception runs with the night penalty
    pub fn is_night(&self) -> bool {
        self.time_of_day.is_dark()
    }
}

/// Clamp into `range`, substituting `fallback` for NaN
pub(crate) fn clamp_or(value: f32, range: (f32, f32), fallback: f32) -> f32 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(range.0, range.1)
    }
}
