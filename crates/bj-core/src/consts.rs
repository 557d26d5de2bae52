//! Level and map constants
//!
//! Dimensions and level indices are fixed by the handheld target the game
//! was designed for.

/// Map dimensions, in tiles
pub const MAP_WIDTH: i32 = 16;
pub const MAP_HEIGHT: i32 = 20;

/// World pixels per tile. The pitch is not square.
pub const TILE_PITCH_X: i32 = 32;
pub const TILE_PITCH_Y: i32 = 24;

/// Largest configurable map side. Keeps world coordinates and cell counts
/// well inside `i32`.
pub const MAX_MAP_DIMENSION: i32 = 1024;

/// Boss arenas, in order. Each closes a zone.
pub const BOSS_0_LEVEL: i32 = 8;
pub const BOSS_1_LEVEL: i32 = 19;
pub const BOSS_2_LEVEL: i32 = 28;
pub const BOSS_3_LEVEL: i32 = 36;
pub const BOSS_LEVELS: [i32; 4] = [BOSS_0_LEVEL, BOSS_1_LEVEL, BOSS_2_LEVEL, BOSS_3_LEVEL];

/// Story levels with authored maps
pub const INTRO_LEVEL: i32 = 0;
pub const MEMORIAL_LEVEL: i32 = BOSS_0_LEVEL + 1;

/// Seed forced whenever a run (re)starts at the intro level.
pub const INTRO_SEED: u32 = 9;

/// Fewest free slots a generated map may have.
pub const MIN_VIABLE_SLOTS: usize = 6;

/// Enclave search budget and halo radius (world pixels)
pub const ENCLAVE_ATTEMPTS: u32 = 1000;
pub const ENCLAVE_HALO: f32 = 40.0;

/// Entries in the enemy spawn menu
pub const ENEMY_MENU_SIZE: usize = 100;

/// Entries in the chest rarity table
pub const CHEST_TABLE_SIZE: usize = 300;

/// Attempts at finding a nook for a compactor before falling back
pub const COMPACTOR_TRIES: u32 = 512;

/// Random probes for edge tiles when dropping hearts into a boss arena
pub const BOSS_HEART_PROBES: u32 = 4096;
