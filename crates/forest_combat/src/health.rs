//! Hit points shared by enemies and the player

use serde::{Deserialize, Serialize};

/// Result of one [`Health::apply_damage`] call
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DamageOutcome {
    /// Hit points actually removed
    pub dealt: f32,
    /// This hit took the last hit point
    pub killed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub current: f32,
    pub max: f32,
    pub is_dead: bool,
}

impl Health {
    /// Full health. Non-finite or negative maxima become 0 (dead on arrival).
    pub fn new(max: f32) -> Self {
        let max = if max.is_finite() { max.max(0.0) } else { 0.0 };
        Self {
            current: max,
            max,
            is_dead: max <= 0.0,
        }
    }

    /// Remove hit points, never below zero. Ignored once dead and for
    /// amounts that are NaN or not positive.
    pub fn apply_damage(&mut self, amount: f32) -> DamageOutcome {
        if self.is_dead || amount.is_nan() || amount <= 0.0 {
            return DamageOutcome::default();
        }

        let before = self.current;
        self.current = (before - amount).max(0.0);
        self.is_dead = self.current <= 0.0;

        DamageOutcome {
            dealt: before - self.current,
            killed: self.is_dead,
        }
    }

    /// Restore hit points up to max. Returns how much was restored.
    pub fn heal(&mut self, amount: f32) -> f32 {
        if self.is_dead || amount.is_nan() || amount <= 0.0 {
            return 0.0;
        }

        let before = self.current;
        self.current = (before + amount).min(self.max);
        self.current - before
    }

    /// 0.0 when dead, 1.0 at full health
    pub fn fraction(&self) -> f32 {
        if self.max > 0.0 {
            (self.current / self.max).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.is_dead
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_damage() {
        let mut health = Health::new(50.0);

        let outcome = health.apply_damage(30.0);
        assert_eq!(outcome, DamageOutcome { dealt: 30.0, killed: false });
        assert_eq!(health.current, 20.0);
        assert_eq!(health.fraction(), 0.4);
    }

    #[test]
    fn test_overkill_reports_remaining_health_once() {
        let mut health = Health::new(50.0);

        assert_eq!(health.apply_damage(100.0), DamageOutcome { dealt: 50.0, killed: true });
        assert!(!health.is_alive());
        assert_eq!(health.current, 0.0);
        assert_eq!(health.fraction(), 0.0);

        assert_eq!(health.apply_damage(10.0), DamageOutcome::default());
        assert_eq!(health.heal(10.0), 0.0);
    }

    #[test]
    fn test_heal_stops_at_max() {
        let mut health = Health::new(100.0);
        health.apply_damage(50.0);

        assert_eq!(health.heal(30.0), 30.0);
        assert_eq!(health.heal(50.0), 20.0);
        assert_eq!(health.current, 100.0);
    }

    #[test]
    fn test_bad_amounts_ignored() {
        let mut health = Health::new(100.0);
        assert_eq!(health.apply_damage(-5.0), DamageOutcome::default());
        assert_eq!(health.apply_damage(f32::NAN), DamageOutcome::default());
        assert_eq!(health.heal(f32::NAN), 0.0);
        assert_eq!(health.current, 100.0);

        assert!(!Health::new(f32::NAN).is_alive());
    }
}
