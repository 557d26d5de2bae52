//! Enclave carving
//!
//! Some levels hide a small 3x3 room off the main map for a trader. The
//! room is carved into open space and joined to the nearest floor tile by a
//! two-leg corridor. Failing to find space is not an error; the level just
//! goes without.

use bj_rng::LevelRng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::level::is_boss_level;
use crate::map::{MapCoord, TileCode, TileGrid, WorldPosition};
use crate::spawn::ItemType;

/// A carved enclave and its host's wares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enclave {
    pub center: MapCoord,
    /// Where the host stands
    pub host_position: WorldPosition,
    pub stock: Vec<ItemType>,
}

/// Decide whether this level gets an enclave.
///
/// Early levels and boss arenas never do and draw nothing. Otherwise a 4 in
/// 6 roll is taken, and the level right after a boss always qualifies.
pub fn enclave_gate(level: i32, rng: &mut impl LevelRng) -> bool {
    level > 3 && !is_boss_level(level) && (rng.choice(6) > 1 || is_boss_level(level - 1))
}

fn is_clear(grid: &TileGrid, center: MapCoord) -> bool {
    (-2..=2).all(|dx| (-2..=2).all(|dy| !grid.is_filled(center.x + dx, center.y + dy)))
}

/// Walk from `from` toward `to`, one axis at a time, filling every tile
/// until the walk reaches the target column or row. The target itself is
/// left for the enclosure.
fn carve_corridor(grid: &mut TileGrid, from: MapCoord, to: MapCoord, x_first: bool) {
    let step_x = if to.x < from.x { -1 } else { 1 };
    let step_y = if to.y < from.y { -1 } else { 1 };
    let mut x = from.x;
    let mut y = from.y;

    if x_first {
        while x != to.x {
            grid.set(x, y, TileCode::PLATE);
            x += step_x;
        }
    }
    while y != to.y {
        grid.set(x, y, TileCode::PLATE);
        y += step_y;
    }
    if !x_first {
        while x != to.x {
            grid.set(x, y, TileCode::PLATE);
            x += step_x;
        }
    }
}

/// Try to carve an enclave into `grid`.
///
/// Samples up to `attempts` centres; a centre off the interior band or
/// without an empty 5x5 neighbourhood uses up an attempt. `floor` is
/// scratch storage for the candidate list.
pub fn carve_enclave(
    grid: &mut TileGrid,
    floor: &mut Vec<MapCoord>,
    attempts: u32,
    rng: &mut impl LevelRng,
) -> Option<Enclave> {
    let (width, height) = (grid.width(), grid.height());

    for _ in 0..attempts {
        let x = rng.choice(width as u32) as i32;
        let y = rng.choice(height as u32) as i32;
        let center = MapCoord::new(x, y);

        if !(x > 2 && x < width - 3 && y > 2 && y < height - 3) || !is_clear(grid, center) {
            continue;
        }

        floor.clear();
        floor.extend(grid.coords().filter(|&c| grid.is_filled(c.x, c.y)));
        // stable sort: ties keep column-major order
        floor.sort_by(|a, b| a.distance(center).total_cmp(&b.distance(center)));
        let nearest = *floor.first()?;

        let x_first = rng.choice(2) != 0;
        carve_corridor(grid, nearest, center, x_first);
        for dx in -1..=1 {
            for dy in -1..=1 {
                grid.set(x + dx, y + dy, TileCode::PLATE);
            }
        }

        return Some(Enclave {
            center,
            host_position: center.to_world().offset(16.0, 12.0),
            stock: Vec::new(),
        });
    }

    trace!(attempts, "no room for an enclave");
    None
}
