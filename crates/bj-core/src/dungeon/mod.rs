//! Level construction
//!
//! Seeding, smoothing, connectivity, enclave carving and decoration, plus
//! the generator that runs them in order and hands the finished map to the
//! spawn allocator.

mod arena;
mod automaton;
mod connectivity;
mod decoration;
mod enclave;
mod generator;
mod layouts;
mod level;
mod seed;
mod zone;

pub use arena::ScratchArena;
pub use automaton::{AutomatonRule, advance, smooth};
pub use connectivity::{enforce_connectivity, flood_fill};
pub use decoration::{DecorationPass, DecorationScope, decorate, passes};
pub use enclave::{Enclave, carve_enclave, enclave_gate};
pub use generator::{GeneratedLevel, GenerationContext, LevelGenerator};
pub use layouts::FixedLayout;
pub use level::{LevelRange, Zone, boss_index, is_boss_level};
pub use seed::{Seeding, fill_noise, is_small_map, seed_map, trim_border};
pub use zone::{PropScatter, ZoneDescriptor};
