//! Single-component enforcement
//!
//! Picks a random walkable tile, flood fills from it over 4-connected
//! walkable tiles, and clears everything the fill did not reach. The fill
//! uses an explicit stack drawn from scratch storage rather than recursion.

use bj_rng::LevelRng;

use crate::map::{MapCoord, Neighbors, TileCode, TileGrid, TileLegend};

const WALKABLE: TileCode = TileCode(1);
const VISITED: TileCode = TileCode(2);

/// Flood fill from `start` over tiles equal to the start tile, relabelling
/// them `replace`. Returns how many tiles were relabelled.
pub fn flood_fill(
    grid: &mut TileGrid,
    stack: &mut Vec<MapCoord>,
    start: MapCoord,
    replace: TileCode,
) -> usize {
    let target = grid.get_at(start);
    if target == replace || !grid.in_bounds(start.x, start.y) {
        return 0;
    }

    stack.clear();
    grid.set_at(start, replace);
    stack.push(start);
    let mut count = 1;

    while let Some(c) = stack.pop() {
        for (_, dx, dy) in Neighbors::OFFSETS {
            let n = c.offset(dx, dy);
            if grid.in_bounds(n.x, n.y) && grid.get_at(n) == target {
                grid.set_at(n, replace);
                stack.push(n);
                count += 1;
            }
        }
    }
    count
}

/// Reduce the walkable tiles of `grid` to the component containing one
/// randomly drawn walkable tile.
///
/// `mask` and `stack` are scratch storage. Draws x then y until a walkable
/// tile is hit. Returns the size of the kept component, 0 when the map has
/// no walkable tile at all (nothing is drawn in that case).
pub fn enforce_connectivity(
    grid: &mut TileGrid,
    mask: &mut TileGrid,
    stack: &mut Vec<MapCoord>,
    legend: &TileLegend,
    rng: &mut impl LevelRng,
) -> usize {
    for c in grid.coords() {
        let walkable = legend.is_walkable(grid.get_at(c));
        mask.set_at(c, if walkable { WALKABLE } else { TileCode::NONE });
    }
    if mask.filled_count() == 0 {
        return 0;
    }

    let start = loop {
        let x = rng.choice(grid.width() as u32) as i32;
        let y = rng.choice(grid.height() as u32) as i32;
        if mask.get(x, y) == WALKABLE {
            break MapCoord::new(x, y);
        }
    };

    let kept = flood_fill(mask, stack, start, VISITED);
    for c in grid.coords() {
        if mask.get_at(c) != VISITED {
            grid.set_at(c, TileCode::NONE);
        }
    }
    kept
}
