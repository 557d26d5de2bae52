//! Free placement slots
//!
//! The bag of walkable coordinates that nothing has claimed yet. Slots keep
//! their column-major collection order; removal preserves it, which keeps
//! index draws reproducible across peers.

use bj_rng::LevelRng;

use crate::map::{MapCoord, TileGrid, TileLegend, WorldPosition};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FreeSlotSet {
    slots: Vec<MapCoord>,
}

impl FreeSlotSet {
    /// Every walkable coordinate of `grid`, written into `storage`.
    pub fn collect(grid: &TileGrid, legend: &TileLegend, mut storage: Vec<MapCoord>) -> Self {
        storage.clear();
        storage.extend(grid.coords().filter(|&c| legend.is_walkable(grid.get_at(c))));
        Self { slots: storage }
    }

    pub fn from_slots(slots: Vec<MapCoord>) -> Self {
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, coord: MapCoord) -> bool {
        self.slots.contains(&coord)
    }

    pub fn get(&self, index: usize) -> Option<MapCoord> {
        self.slots.get(index).copied()
    }

    /// Remove slots within Chebyshev distance `< radius` of `center`.
    /// Returns how many were removed.
    pub fn reserve_radius(&mut self, center: MapCoord, radius: i32) -> usize {
        let before = self.slots.len();
        self.slots.retain(|c| c.chebyshev(center) >= radius);
        before - self.slots.len()
    }

    /// Remove slots whose world position lies closer than `radius` pixels
    /// to `position`.
    pub fn reserve_world_radius(&mut self, position: WorldPosition, radius: f32) -> usize {
        let before = self.slots.len();
        self.slots.retain(|c| c.to_world().distance(position) >= radius);
        before - self.slots.len()
    }

    /// Remove and return a uniformly drawn slot. Draws nothing when empty.
    pub fn take_random(&mut self, rng: &mut impl LevelRng) -> Option<MapCoord> {
        if self.slots.is_empty() {
            return None;
        }
        let index = rng.choice(self.slots.len() as u32) as usize;
        Some(self.slots.remove(index))
    }

    /// Remove `coord` if it is free.
    pub fn take(&mut self, coord: MapCoord) -> bool {
        match self.slots.iter().position(|&c| c == coord) {
            Some(index) => {
                self.slots.remove(index);
                true
            }
            None => false,
        }
    }

    /// The slot with the largest Manhattan distance to `from`; the first
    /// one wins ties.
    pub fn farthest_from(&self, from: MapCoord) -> Option<MapCoord> {
        let mut best: Option<MapCoord> = None;
        for &c in &self.slots {
            if best.is_none_or(|b| c.manhattan(from) > b.manhattan(from)) {
                best = Some(c);
            }
        }
        best
    }

    pub fn take_farthest_from(&mut self, from: MapCoord) -> Option<MapCoord> {
        let farthest = self.farthest_from(from)?;
        self.take(farthest);
        Some(farthest)
    }
}
