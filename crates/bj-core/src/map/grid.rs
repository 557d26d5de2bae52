//! Bounds-safe tile storage

use serde::{Deserialize, Serialize};

use super::{MapCoord, TileCode};

/// A fixed-size grid of tile codes.
///
/// Reads outside the grid yield [`TileCode::NONE`] and writes outside it are
/// ignored, so neighbourhood scans never need their own bounds checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    width: i32,
    height: i32,
    tiles: Vec<TileCode>,
}

impl TileGrid {
    /// An all-empty grid. Negative dimensions are treated as zero.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            tiles: vec![TileCode::NONE; (width * height) as usize],
        }
    }

    /// Build a grid from an authored bitmap.
    ///
    /// `columns[x]` holds column `x` from the top row down; `'1'` or `'#'`
    /// marks a [`TileCode::PLATE`]. Short or missing columns read as empty.
    pub fn from_layout(width: i32, height: i32, columns: &[&str]) -> Self {
        let mut grid = Self::new(width, height);
        grid.stamp_layout(columns, TileCode::PLATE);
        grid
    }

    /// Overwrite the whole grid with an authored bitmap, writing `filled`
    /// for marked cells and NONE elsewhere.
    pub fn stamp_layout(&mut self, columns: &[&str], filled: TileCode) {
        self.fill(TileCode::NONE);
        for (x, column) in columns.iter().enumerate() {
            for (y, cell) in column.bytes().enumerate() {
                if cell == b'1' || cell == b'#' {
                    self.set(x as i32, y as i32, filled);
                }
            }
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.in_bounds(x, y)
            .then(|| (y * self.width + x) as usize)
    }

    /// Tile at (x, y), NONE outside the grid.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> TileCode {
        self.index(x, y)
            .map(|i| self.tiles[i])
            .unwrap_or(TileCode::NONE)
    }

    #[inline]
    pub fn get_at(&self, c: MapCoord) -> TileCode {
        self.get(c.x, c.y)
    }

    /// Write (x, y); a no-op outside the grid.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, code: TileCode) {
        if let Some(i) = self.index(x, y) {
            self.tiles[i] = code;
        }
    }

    #[inline]
    pub fn set_at(&mut self, c: MapCoord, code: TileCode) {
        self.set(c.x, c.y, code);
    }

    pub fn is_filled(&self, x: i32, y: i32) -> bool {
        !self.get(x, y).is_none()
    }

    /// Every coordinate in visiting order: columns outer, rows inner.
    ///
    /// Passes that write tiles while reading their neighbours iterate this
    /// and use `get`/`set`, so later tiles observe earlier writes.
    pub fn coords(&self) -> impl Iterator<Item = MapCoord> + use<> {
        let (width, height) = (self.width, self.height);
        (0..width).flat_map(move |x| (0..height).map(move |y| MapCoord::new(x, y)))
    }

    /// Visit every tile mutably, columns outer, rows inner.
    pub fn for_each(&mut self, mut visit: impl FnMut(&mut TileCode, i32, i32)) {
        for x in 0..self.width {
            for y in 0..self.height {
                let i = (y * self.width + x) as usize;
                visit(&mut self.tiles[i], x, y);
            }
        }
    }

    pub fn fill(&mut self, code: TileCode) {
        self.tiles.fill(code);
    }

    /// Copy `other` into this grid, cell by cell where both overlap.
    pub fn copy_from(&mut self, other: &TileGrid) {
        if self.width == other.width && self.height == other.height {
            self.tiles.copy_from_slice(&other.tiles);
        } else {
            for c in self.coords() {
                self.set_at(c, other.get_at(c));
            }
        }
    }

    pub fn count(&self, mut pred: impl FnMut(TileCode) -> bool) -> usize {
        self.tiles.iter().filter(|&&t| pred(t)).count()
    }

    pub fn filled_count(&self) -> usize {
        self.count(|t| !t.is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_reads_empty() {
        let mut grid = TileGrid::new(4, 3);
        grid.fill(TileCode::PLATE);
        assert_eq!(grid.get(-1, 0), TileCode::NONE);
        assert_eq!(grid.get(4, 0), TileCode::NONE);
        assert_eq!(grid.get(0, 3), TileCode::NONE);
        assert_eq!(grid.get(3, 2), TileCode::PLATE);
    }

    #[test]
    fn test_out_of_range_writes_ignored() {
        let mut grid = TileGrid::new(4, 3);
        grid.set(10, 10, TileCode::SAND);
        grid.set(-1, 1, TileCode::SAND);
        assert_eq!(grid.filled_count(), 0);
    }

    #[test]
    fn test_for_each_is_column_major() {
        let mut grid = TileGrid::new(2, 3);
        let mut order = Vec::new();
        grid.for_each(|_, x, y| order.push((x, y)));
        assert_eq!(order, [(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]);

        let coords: Vec<(i32, i32)> = grid.coords().map(|c| (c.x, c.y)).collect();
        assert_eq!(coords, order);
    }

    #[test]
    fn test_for_each_mutates() {
        let mut grid = TileGrid::new(3, 3);
        grid.for_each(|t, x, y| {
            if x == y {
                *t = TileCode::PLATE;
            }
        });
        assert_eq!(grid.filled_count(), 3);
        assert_eq!(grid.get(1, 1), TileCode::PLATE);
        assert_eq!(grid.get(0, 1), TileCode::NONE);
    }

    #[test]
    fn test_from_layout_columns() {
        let grid = TileGrid::from_layout(3, 4, &["", "0110", "1"]);
        assert_eq!(grid.get(0, 0), TileCode::NONE);
        assert_eq!(grid.get(1, 1), TileCode::PLATE);
        assert_eq!(grid.get(1, 2), TileCode::PLATE);
        assert_eq!(grid.get(1, 3), TileCode::NONE);
        assert_eq!(grid.get(2, 0), TileCode::PLATE);
        assert_eq!(grid.filled_count(), 3);
    }

    #[test]
    fn test_copy_from_mismatched_sizes() {
        let mut small = TileGrid::new(2, 2);
        let mut big = TileGrid::new(3, 3);
        big.fill(TileCode::SAND);
        small.copy_from(&big);
        assert_eq!(small.count(|t| t == TileCode::SAND), 4);
    }
}
