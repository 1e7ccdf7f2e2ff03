//! Forest Difficulty - Difficulty Propagation
//!
//! Holds the difficulty record consumed by the simulation and everything
//! needed to produce it:
//!
//! - [`DifficultyConfig`] with clamped multipliers and a spawn mix
//! - Static presets per [`Intensity`]
//! - Parsing of adaptive director replies
//! - [`DirectorLink`], a channel drained at tick boundaries
//! - Stat scaling and weighted spawn picks

pub mod config;
pub mod director;
pub mod error;
pub mod parse;
pub mod scaling;

pub use config::{Atmosphere, DifficultyConfig, Intensity, SpawnVariety, TimeOfDay};
pub use director::{DirectorHandle, DirectorLink, DirectorReply};
pub use error::{DifficultyError, Result};
pub use parse::{parse_director_reply, DirectorUpdate, NO_CHANGE};
pub use scaling::{BaseStats, EnemyStats};

pub mod prelude {
    pub use crate::config::{Atmosphere, DifficultyConfig, Intensity, SpawnVariety, TimeOfDay};
    pub use crate::director::{DirectorHandle, DirectorLink, DirectorReply};
    pub use crate::error::{DifficultyError, Result};
    pub use crate::parse::{parse_director_reply, DirectorUpdate};
    pub use crate::scaling::{BaseStats, EnemyStats};
}
