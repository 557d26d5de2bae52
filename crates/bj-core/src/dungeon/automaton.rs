//! Cellular automaton smoothing
//!
//! Turns uniform noise into rounded blobs. Each round counts the EMPTY
//! tiles among a tile's eight neighbours (tiles off the map count as empty)
//! and writes the next generation into a scratch grid before copying it
//! back. Empty tiles fill when few neighbours are empty; filled tiles erode
//! when many are. Keeping the two thresholds apart stops the pattern from
//! oscillating or flooding the map.

use serde::{Deserialize, Serialize};

use crate::map::{TileCode, TileGrid};

/// Thresholds and round count for one smoothing pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomatonRule {
    /// An empty tile fills when fewer than this many neighbours are empty.
    pub fill_threshold: u8,
    /// A filled tile empties when more than this many neighbours are empty.
    pub erode_threshold: u8,
    pub iterations: u32,
}

impl Default for AutomatonRule {
    fn default() -> Self {
        Self {
            fill_threshold: 4,
            erode_threshold: 5,
            iterations: 3,
        }
    }
}

const RING: [(i32, i32); 8] = [
    (-1, -1),
    (1, -1),
    (-1, 1),
    (1, 1),
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
];

fn empty_neighbors(grid: &TileGrid, x: i32, y: i32) -> u8 {
    RING.iter()
        .filter(|(dx, dy)| grid.get(x + dx, y + dy).is_none())
        .count() as u8
}

/// Run one generation of `rule` over `grid`, using `scratch` as the next
/// generation buffer. Filled output tiles are [`TileCode::PLATE`].
pub fn advance(grid: &mut TileGrid, scratch: &mut TileGrid, rule: &AutomatonRule) {
    for c in grid.coords() {
        let empty = empty_neighbors(grid, c.x, c.y);
        let filled = if grid.get_at(c).is_none() {
            empty < rule.fill_threshold
        } else {
            empty <= rule.erode_threshold
        };
        scratch.set_at(c, if filled { TileCode::PLATE } else { TileCode::NONE });
    }
    grid.copy_from(scratch);
}

/// Run `rule.iterations` generations.
pub fn smooth(grid: &mut TileGrid, scratch: &mut TileGrid, rule: &AutomatonRule) {
    for _ in 0..rule.iterations {
        advance(grid, scratch, rule);
    }
}
