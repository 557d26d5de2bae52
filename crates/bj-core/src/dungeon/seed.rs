//! Map seeding
//!
//! Boss arenas and story levels copy an authored bitmap. Every other level
//! is uniform noise over {NONE, PLATE} run through the automaton, reseeded
//! until at least one tile survives smoothing.

use bj_rng::LevelRng;
use tracing::debug;

use super::automaton::smooth;
use super::layouts::FixedLayout;
use super::level::is_boss_level;
use crate::config::GenConfig;
use crate::error::GenError;
use crate::map::{TileCode, TileGrid};

/// How the map was seeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seeding {
    Fixed(FixedLayout),
    Procedural { small_map: bool, attempts: u32 },
}

impl Seeding {
    pub fn fixed_layout(&self) -> Option<FixedLayout> {
        match self {
            Seeding::Fixed(layout) => Some(*layout),
            Seeding::Procedural { .. } => None,
        }
    }
}

/// Decide whether this level gets a small map.
///
/// The percentile draw is always taken. In single player, the levels right
/// after a boss and the first few levels are always small.
pub fn is_small_map(level: i32, multiplayer: bool, percent: u32, rng: &mut impl LevelRng) -> bool {
    let rolled = rng.choice(100) < percent;
    rolled
        || (!multiplayer
            && (is_boss_level(level - 1) || is_boss_level(level - 2) || level < 4))
}

/// Fill every tile with NONE or PLATE. Small maps keep an empty margin and
/// draw nothing for it.
pub fn fill_noise(grid: &mut TileGrid, small_map: bool, rng: &mut impl LevelRng) {
    let (width, height) = (grid.width(), grid.height());
    grid.for_each(|tile, x, y| {
        *tile = if small_map && (x < 2 || x > width - 2 || y < 3 || y > height - 3) {
            TileCode::NONE
        } else {
            TileCode(rng.choice(2) as u8)
        };
    });
}

/// Clear the outermost ring so nothing relies on tile wrap-around.
pub fn trim_border(grid: &mut TileGrid) {
    let (width, height) = (grid.width(), grid.height());
    grid.for_each(|tile, x, y| {
        if x == 0 || x == width - 1 || y == 0 || y == height - 1 {
            *tile = TileCode::NONE;
        }
    });
}

/// Seed `grid` for `level`.
pub fn seed_map(
    grid: &mut TileGrid,
    scratch: &mut TileGrid,
    level: i32,
    multiplayer: bool,
    config: &GenConfig,
    rng: &mut impl LevelRng,
) -> Result<Seeding, GenError> {
    if let Some(layout) = FixedLayout::for_level(level) {
        grid.stamp_layout(layout.columns(), TileCode::PLATE);
        return Ok(Seeding::Fixed(layout));
    }

    let small_map = is_small_map(level, multiplayer, config.small_map_percent, rng);
    let mut attempts = 0;
    loop {
        attempts += 1;
        fill_noise(grid, small_map, rng);
        smooth(grid, scratch, &config.automaton);
        if grid.filled_count() > 0 {
            return Ok(Seeding::Procedural {
                small_map,
                attempts,
            });
        }
        if config.max_regenerations.is_some_and(|limit| attempts > limit) {
            return Err(GenError::RegenerationLimit { level, attempts });
        }
        debug!(level, attempts, "seeded map smoothed away to nothing, reseeding");
    }
}
