//! Map storage
//!
//! Tile codes, the bounds-safe grid, coordinates and tile classification.

mod coord;
mod grid;
mod tile;

pub use coord::{MapCoord, Neighbors, WorldPosition};
pub use grid::TileGrid;
pub use tile::{TileClass, TileCode, TileLegend, classify};
