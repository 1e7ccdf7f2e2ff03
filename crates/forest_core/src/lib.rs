//! # forest_core - Core Simulation Primitives
//!
//! Types shared by every layer of the enemy simulation:
//!
//! - Generational handles for addressing enemies that may be removed
//! - Simulation time ([`Timestamp`], [`SimClock`])
//! - Closed enemy taxonomies ([`EnemyKind`], [`Personality`])
//! - Terrain obstacles used for occlusion

pub mod error;
pub mod handle;
pub mod kind;
pub mod terrain;
pub mod time;

pub use error::{CoreError, Result};
pub use handle::{Handle, HandleAllocator, HandleMap};
pub use kind::{EnemyKind, Personality};
pub use terrain::TerrainObstacle;
pub use time::{SimClock, Timestamp};

pub mod prelude {
    pub use crate::error::{CoreError, Result};
    pub use crate::handle::{Handle, HandleAllocator, HandleMap};
    pub use crate::kind::{EnemyKind, Personality};
    pub use crate::terrain::TerrainObstacle;
    pub use crate::time::{SimClock, Timestamp};
    pub use forest_math::prelude::*;
}
