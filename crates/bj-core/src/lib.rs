//! bj-core: level generation for Blind Jump
//!
//! Builds the tile map for a level transition (seeding, smoothing,
//! connectivity, enclave carving, decoration) and places the player, the
//! exit and every occupant. Everything is driven by one shared
//! [`LevelRng`](bj_rng::LevelRng) so that multiplayer peers holding the
//! same seed reproduce the same level draw for draw.

pub mod config;
pub mod dungeon;
pub mod map;
pub mod spawn;

mod consts;
mod error;

pub use consts::*;
pub use config::{Difficulty, GenConfig};
pub use dungeon::{GeneratedLevel, GenerationContext, LevelGenerator, ScratchArena};
pub use error::{ConfigError, GenError, PoolExhausted, PoolKind};

pub use bj_rng::{LevelRng, LinearGenerator};
