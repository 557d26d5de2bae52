//! Tile and world coordinates

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::{TILE_PITCH_X, TILE_PITCH_Y};

/// Integer tile coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MapCoord {
    pub x: i32,
    pub y: i32,
}

impl MapCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// World position of the tile's top-left corner.
    pub fn to_world(self) -> WorldPosition {
        WorldPosition::new(
            (self.x * TILE_PITCH_X) as f32,
            (self.y * TILE_PITCH_Y) as f32,
        )
    }

    /// Where an occupant standing on this tile is anchored: horizontally
    /// centred, at the tile's top edge.
    pub fn placement(self) -> WorldPosition {
        self.to_world().offset((TILE_PITCH_X / 2) as f32, 0.0)
    }

    pub fn manhattan(self, other: MapCoord) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    pub fn chebyshev(self, other: MapCoord) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// Euclidean distance in tile units
    pub fn distance(self, other: MapCoord) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Pixel position in the world
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPosition {
    pub x: f32,
    pub y: f32,
}

impl WorldPosition {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn distance(self, other: WorldPosition) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn manhattan(self, other: WorldPosition) -> f32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Tile containing this position.
    pub fn to_map_coord(self) -> MapCoord {
        MapCoord::new(
            (self.x / TILE_PITCH_X as f32).floor() as i32,
            (self.y / TILE_PITCH_Y as f32).floor() as i32,
        )
    }
}

bitflags! {
    /// Orthogonal neighbours, in autotile bit order.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Neighbors: u8 {
        const NORTH = 1;
        const EAST = 2;
        const SOUTH = 4;
        const WEST = 8;
    }
}

impl Neighbors {
    /// Offset of each neighbour, in bit order. North is `y - 1`.
    pub const OFFSETS: [(Neighbors, i32, i32); 4] = [
        (Neighbors::NORTH, 0, -1),
        (Neighbors::EAST, 1, 0),
        (Neighbors::SOUTH, 0, 1),
        (Neighbors::WEST, -1, 0),
    ];

    /// Collect the neighbours of `coord` for which `present` holds.
    pub fn around(coord: MapCoord, mut present: impl FnMut(MapCoord) -> bool) -> Self {
        let mut mask = Neighbors::empty();
        for (bit, dx, dy) in Self::OFFSETS {
            if present(coord.offset(dx, dy)) {
                mask |= bit;
            }
        }
        mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_pitch_is_asymmetric() {
        let c = MapCoord::new(3, 5);
        assert_eq!(c.to_world(), WorldPosition::new(96.0, 120.0));
        assert_eq!(c.placement(), WorldPosition::new(112.0, 120.0));
    }

    #[test]
    fn test_to_map_coord_inverts_placement() {
        for x in 0..16 {
            for y in 0..20 {
                let c = MapCoord::new(x, y);
                assert_eq!(c.placement().offset(0.1, 0.1).to_map_coord(), c);
            }
        }
    }

    #[test]
    fn test_distances() {
        let a = MapCoord::new(1, 1);
        let b = MapCoord::new(4, 5);
        assert_eq!(a.manhattan(b), 7);
        assert_eq!(a.chebyshev(b), 4);
        assert!((a.distance(b) - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_neighbors_around() {
        let mask = Neighbors::around(MapCoord::new(2, 2), |c| c.y == 1 || c.x == 1);
        assert_eq!(mask, Neighbors::NORTH | Neighbors::WEST);
        assert_eq!(mask.bits(), 9);
    }
}
