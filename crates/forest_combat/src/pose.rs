//! Attack pose curves for the renderer

use forest_math::consts;
use serde::{Deserialize, Serialize};

use crate::attack::{AttackConfig, AttackPhase, AttackResolver, AttackState, STRIKE_RATIO};

/// Arm pitch in radians, negative is raised
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ArmPose {
    pub left: f32,
    pub right: f32,
}

impl ArmPose {
    fn both(angle: f32) -> Self {
        Self {
            left: angle,
            right: angle,
        }
    }
}

/// Pull back during windup, swing through the strike, settle in recovery
pub fn arm_rotation(state: &AttackState, config: &AttackConfig) -> ArmPose {
    if !state.is_attacking {
        return ArmPose::default();
    }

    let progress = state.progress;
    let windup_ratio = config.windup_ratio();

    match state.phase {
        AttackPhase::Windup => {
            let amount = if windup_ratio > 0.0 {
                (progress / windup_ratio).min(1.0)
            } else {
                1.0
            };
            ArmPose::both(-consts::FRAC_PI_3 * amount)
        }
        AttackPhase::Strike => {
            let strike = ((progress - windup_ratio) / STRIKE_RATIO).clamp(0.0, 1.0);
            ArmPose::both(-consts::FRAC_PI_2 + (strike * consts::PI).sin() * consts::FRAC_PI_3)
        }
        AttackPhase::Recovery => {
            let recovered = (1.0 - (1.0 - progress) / STRIKE_RATIO).clamp(0.0, 1.0);
            ArmPose::both(-consts::PI / 6.0 * (1.0 - recovered))
        }
        AttackPhase::Idle => ArmPose::default(),
    }
}

/// Torso lean in radians
pub fn torso_rotation(state: &AttackState) -> f32 {
    if !state.is_attacking {
        return 0.0;
    }

    let progress = state.progress;
    match state.phase {
        AttackPhase::Windup => -0.2 * progress,
        AttackPhase::Strike => 0.3 * (progress * consts::PI).sin(),
        AttackPhase::Recovery => 0.1 * (1.0 - progress),
        AttackPhase::Idle => 0.0,
    }
}

impl AttackResolver {
    pub fn arm_rotation(&self) -> ArmPose {
        arm_rotation(&self.state(), self.cycle_config())
    }

    pub fn torso_rotation(&self) -> f32 {
        torso_rotation(&self.state())
    }
}
