//! Scratch storage for one generation pass
//!
//! The generator draws every grid, stack and slot list from a caller-owned
//! arena with a fixed byte budget, mirroring the bulk scratch buffer the
//! handheld build allocates per level transition. Running out is fatal.

use std::mem::size_of;

use tracing::trace;

use crate::error::GenError;
use crate::map::TileGrid;

/// A byte budget that scratch allocations are charged against.
#[derive(Debug, Clone)]
pub struct ScratchArena {
    budget: usize,
    used: usize,
    high_water: usize,
}

impl ScratchArena {
    pub fn new(budget: usize) -> Self {
        Self {
            budget,
            used: 0,
            high_water: 0,
        }
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    pub fn used(&self) -> usize {
        self.used
    }

    pub fn remaining(&self) -> usize {
        self.budget - self.used
    }

    /// Most bytes ever in use at once
    pub fn high_water(&self) -> usize {
        self.high_water
    }

    fn charge(&mut self, bytes: usize) -> Result<(), GenError> {
        if bytes > self.remaining() {
            return Err(GenError::ScratchExhausted {
                requested: bytes,
                remaining: self.remaining(),
            });
        }
        self.used += bytes;
        self.high_water = self.high_water.max(self.used);
        Ok(())
    }

    /// An empty grid of the given size.
    pub fn alloc_grid(&mut self, width: i32, height: i32) -> Result<TileGrid, GenError> {
        let cells = (width.max(0) * height.max(0)) as usize;
        self.charge(cells)?;
        Ok(TileGrid::new(width, height))
    }

    /// An empty vector with room for `capacity` elements.
    pub fn alloc_vec<T>(&mut self, capacity: usize) -> Result<Vec<T>, GenError> {
        self.charge(capacity.saturating_mul(size_of::<T>()))?;
        Ok(Vec::with_capacity(capacity))
    }

    /// A vector of `len` default values.
    pub fn alloc_filled<T: Clone + Default>(&mut self, len: usize) -> Result<Vec<T>, GenError> {
        let mut v = self.alloc_vec(len)?;
        v.resize(len, T::default());
        Ok(v)
    }

    /// Return every charged byte. Storage handed out earlier stays valid;
    /// the arena only stops accounting for it.
    pub fn release(&mut self) {
        trace!(used = self.used, budget = self.budget, "scratch arena released");
        self.used = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::MapCoord;

    #[test]
    fn test_grid_charges_one_byte_per_tile() {
        let mut arena = ScratchArena::new(1000);
        let grid = arena.alloc_grid(16, 20).unwrap();
        assert_eq!(grid.width(), 16);
        assert_eq!(arena.used(), 320);
    }

    #[test]
    fn test_exhaustion_is_an_error() {
        let mut arena = ScratchArena::new(100);
        let err = arena.alloc_vec::<MapCoord>(20).unwrap_err();
        assert!(matches!(
            err,
            GenError::ScratchExhausted {
                requested: 160,
                remaining: 100
            }
        ));
        assert_eq!(arena.used(), 0);
    }

    #[test]
    fn test_release_keeps_high_water() {
        let mut arena = ScratchArena::new(1000);
        arena.alloc_grid(10, 10).unwrap();
        arena.alloc_filled::<u8>(50).unwrap();
        arena.release();
        assert_eq!(arena.used(), 0);
        assert_eq!(arena.high_water(), 150);
        assert!(arena.alloc_grid(30, 30).is_ok());
    }
}
