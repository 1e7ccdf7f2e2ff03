//! Terrain obstacles

use forest_math::Vec3;
use serde::{Deserialize, Serialize};

/// A tree, rock or bush on the forest floor, modelled as a vertical cylinder
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainObstacle {
    pub x: f32,
    pub z: f32,
    pub radius: f32,
    /// Non-collidable props (bushes) never block sight
    pub collidable: bool,
}

impl TerrainObstacle {
    /// A collidable obstacle
    pub fn new(x: f32, z: f32, radius: f32) -> Self {
        Self {
            x,
            z,
            radius,
            collidable: true,
        }
    }

    /// A decorative obstacle that does not block anything
    pub fn decorative(x: f32, z: f32, radius: f32) -> Self {
        Self {
            collidable: false,
            ..Self::new(x, z, radius)
        }
    }

    /// Center on the ground plane
    pub fn center(&self) -> Vec3 {
        Vec3::ground(self.x, self.z)
    }
}
