//! # forest_math - Planar Math for the Enemy Simulation
//!
//! Small vector library shared by perception, decision and combat code.

pub mod vector;

pub use vector::*;

/// Common math constants
pub mod consts {
    pub const PI: f32 = core::f32::consts::PI;
    pub const TAU: f32 = PI * 2.0;
    pub const FRAC_PI_2: f32 = PI / 2.0;
    pub const FRAC_PI_3: f32 = PI / 3.0;
    pub const EPSILON: f32 = 1e-6;
}

/// Clamp value between min and max, mapping NaN to `min`
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    if value.is_nan() || value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

pub mod prelude {
    pub use crate::vector::{angle_between, Vec3};
    pub use crate::clamp;
}
