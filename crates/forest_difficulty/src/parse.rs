//! Director reply parsing
//!
//! The adaptive director answers in free text. A reply is either the token
//! `NO_CHANGE` or text containing a JSON object (possibly wrapped in a
//! markdown fence). Fields are validated one by one: missing, zero and
//! non-numeric scalars take their defaults, numbers are clamped, unknown
//! enum names fall back to the default variant.

use serde_json::{Map, Value};

use crate::config::{
    clamp_or, Atmosphere, DifficultyConfig, Intensity, SpawnVariety, TimeOfDay, DIFFICULTY_RANGE, RAMP_RANGE,
    SPAWN_RATE_RANGE, SPEED_RANGE,
};
use crate::error::{DifficultyError, Result};

/// Token a director sends to keep the current configuration
pub const NO_CHANGE: &str = "NO_CHANGE";

/// What a director reply asks for
#[derive(Debug, Clone, PartialEq)]
pub enum DirectorUpdate {
    NoChange,
    Replace(DifficultyConfig),
}

/// Parse one director reply
pub fn parse_director_reply(reply: &str) -> Result<DirectorUpdate> {
    if reply.contains(NO_CHANGE) {
        return Ok(DirectorUpdate::NoChange);
    }

    let json = extract_object(reply).ok_or(DifficultyError::NoJson)?;
    let value: Value = serde_json::from_str(json)?;
    let object = value.as_object().ok_or(DifficultyError::NotAnObject)?;

    Ok(DirectorUpdate::Replace(config_from_object(object)))
}

/// Outermost `{...}` span, from the first `{` to the last `}`
fn extract_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn config_from_object(object: &Map<String, Value>) -> DifficultyConfig {
    let defaults = DifficultyConfig::default();

    let scalar = |key: &str, range: (f32, f32), fallback: f32| {
        let value = object
            .get(key)
            .and_then(Value::as_f64)
            .map(|v| v as f32)
            .filter(|v| *v != 0.0 && v.is_finite())
            .unwrap_or(fallback);
        clamp_or(value, range, fallback)
    };

    let spawn_variety = match object.get("spawnVariety").and_then(Value::as_object) {
        Some(mix) => {
            let share = |key: &str| mix.get(key).and_then(Value::as_f64).map_or(0.0, |v| v as f32);
            SpawnVariety::new(share("normal"), share("fast"), share("tank"), share("boss")).normalized()
        }
        None => SpawnVariety::default(),
    };

    let name = |key: &str| object.get(key).and_then(Value::as_str).unwrap_or_default();

    let special_features = object
        .get("specialFeatures")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).map(str::to_owned).collect())
        .unwrap_or_default();

    DifficultyConfig {
        enemy_spawn_rate: scalar("enemySpawnRate", SPAWN_RATE_RANGE, defaults.enemy_spawn_rate),
        enemy_difficulty: scalar("enemyDifficulty", DIFFICULTY_RANGE, defaults.enemy_difficulty),
        enemy_speed: scalar("enemySpeed", SPEED_RANGE, defaults.enemy_speed),
        spawn_variety,
        time_of_day: TimeOfDay::from_name(name("timeOfDay")).unwrap_or_default(),
        atmosphere: Atmosphere::from_name(name("atmosphere")).unwrap_or_default(),
        intensity: Intensity::from_name(name("intensity")).unwrap_or_default(),
        progressive_difficulty: object.get("progressiveDifficulty").is_some_and(truthy),
        difficulty_ramp: scalar("difficultyRamp", RAMP_RANGE, defaults.difficulty_ramp),
        special_features,
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
