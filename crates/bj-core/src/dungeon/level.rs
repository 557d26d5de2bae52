//! Level indices, boss arenas and zones

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::{BOSS_0_LEVEL, BOSS_1_LEVEL, BOSS_2_LEVEL, BOSS_3_LEVEL, BOSS_LEVELS};

/// Check if a level is a boss arena
pub fn is_boss_level(level: i32) -> bool {
    BOSS_LEVELS.contains(&level)
}

/// Which boss (0..=3) guards this level, if any
pub fn boss_index(level: i32) -> Option<usize> {
    BOSS_LEVELS.iter().position(|&l| l == level)
}

/// Half-open level range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRange {
    pub start: i32,
    pub end: i32,
}

impl LevelRange {
    pub const ALL: LevelRange = LevelRange::new(i32::MIN, i32::MAX);

    pub const fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    pub const fn below(end: i32) -> Self {
        Self::new(i32::MIN, end)
    }

    pub const fn starting_at(start: i32) -> Self {
        Self::new(start, i32::MAX)
    }

    pub const fn contains(&self, level: i32) -> bool {
        level >= self.start && level < self.end
    }
}

/// Visual and gameplay zone. Each boss closes the zone before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Zone {
    One,
    Two,
    Three,
    Four,
    /// Past the last boss; no zone theming applies
    Beyond,
}

impl Zone {
    pub fn of_level(level: i32) -> Zone {
        if level > BOSS_3_LEVEL {
            Zone::Beyond
        } else if level > BOSS_2_LEVEL {
            Zone::Four
        } else if level > BOSS_1_LEVEL {
            Zone::Three
        } else if level > BOSS_0_LEVEL {
            Zone::Two
        } else {
            Zone::One
        }
    }
}
