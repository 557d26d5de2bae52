//! Hand-authored maps for boss arenas and story levels
//!
//! Each layout is a list of columns: `COLUMNS[x]` holds column `x` from
//! the top row down, `'1'` for floor. Missing rows are empty.

use serde::{Deserialize, Serialize};

use super::level::boss_index;
use crate::{INTRO_LEVEL, MEMORIAL_LEVEL};

type Layout = &'static [&'static str];

const INTRO: Layout = &[
    "",
    "000000000000000",
    "000000000001111",
    "000000000001111",
    "000000000001111",
    "000000000001111",
    "000000000001000",
    "000000000011000",
    "000000000010000",
    "000001110010000",
    "000011111110000",
    "000111111110000",
    "000111111000000",
    "000111110000000",
    "000111110000000",
    "000111110000000",
];

const MEMORIAL: Layout = &[
    "",
    "000000000000000",
    "000000000000000",
    "000000000000000",
    "000000000000000",
    "000000000000000",
    "000000000000000",
    "000111100000000",
    "000011111100000",
    "000111000110000",
    "000111000010000",
    "001110000011000",
    "001111000001100",
    "001110000011110",
    "001110000011110",
    "000000000011100",
];

const MEMORIAL_OVERLAY: Layout = &[
    "",
    "000000000000000",
    "000000000000000",
    "000000000000000",
    "000000000000000",
    "000000000000000",
    "000000000000000",
    "000000000000000",
    "000001100110000",
    "000111101111000",
    "000111000011000",
    "001110000010000",
    "001111100000000",
    "001010000000000",
    "001110000000000",
    "000000000000000",
];

const BOSS_0: Layout = &[
    "",
    "000000000000000",
    "000000000000000",
    "000000000000000",
    "000001111100000",
    "000011111100000",
    "000011111111000",
    "000011111111000",
    "000011111111000",
    "000011111111000",
    "000011111111000",
    "000000111111000",
    "000000111110000",
    "000000000000000",
    "000000000000000",
    "000000000000000",
];

const BOSS_1: Layout = &[
    "",
    "000000000000000",
    "000000000000000",
    "000000000000000",
    "000001111111000",
    "000011111111100",
    "000011111111100",
    "000011111111100",
    "000011111111100",
    "000011111111100",
    "000011111111100",
    "000011111111100",
    "000001111111000",
    "000000000000000",
    "000000000000000",
    "000000000000000",
];

const BOSS_2: Layout = &[
    "",
    "000000000000000",
    "000000000000000",
    "000000000000000",
    "000000000000000",
    "000000001111110",
    "000000011111111",
    "000000011111111",
    "000000011110111",
    "000000011101111",
    "000000011111111",
    "000000011111111",
    "000000001111110",
    "000000000000000",
    "000000000000000",
    "000000000000000",
];

const BOSS_2_OVERLAY: Layout = &[
    "00000000000000000000",
    "00000000000000000000",
    "00100000001010000000",
    "00100000000010100000",
    "01111000000000000000",
    "00111000000001111100",
    "00111000011101011111",
    "00011000111111111110",
    "00000011111111111111",
    "00011111111111111100",
    "00000111111111110000",
    "00010000000001110000",
    "00000000000000111100",
    "00000000000000011100",
    "00000000000000001000",
    "00000000000000000000",
];

const BOSS_3: Layout = &[
    "",
    "000000000000000",
    "000000000000000",
    "000000000000000",
    "000000011000110",
    "000000011111110",
    "000000111111111",
    "000000111111111",
    "000000111111111",
    "000000111111111",
    "000000011111110",
    "000000011000110",
    "000000000000000",
    "000000000000000",
    "000000000000000",
    "000000000000000",
];

/// A level whose map is authored rather than generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FixedLayout {
    Intro,
    Memorial,
    /// Boss arena 0..=3
    Boss(u8),
}

impl FixedLayout {
    pub fn for_level(level: i32) -> Option<FixedLayout> {
        if let Some(boss) = boss_index(level) {
            Some(FixedLayout::Boss(boss as u8))
        } else if level == INTRO_LEVEL {
            Some(FixedLayout::Intro)
        } else if level == MEMORIAL_LEVEL {
            Some(FixedLayout::Memorial)
        } else {
            None
        }
    }

    /// Floor bitmap
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            FixedLayout::Intro => INTRO,
            FixedLayout::Memorial => MEMORIAL,
            FixedLayout::Boss(0) => BOSS_0,
            FixedLayout::Boss(1) => BOSS_1,
            FixedLayout::Boss(2) => BOSS_2,
            FixedLayout::Boss(_) => BOSS_3,
        }
    }

    /// Authored decoration overlay replacing the generated one
    pub fn overlay(self) -> Option<&'static [&'static str]> {
        match self {
            FixedLayout::Memorial => Some(MEMORIAL_OVERLAY),
            FixedLayout::Boss(2) => Some(BOSS_2_OVERLAY),
            _ => None,
        }
    }

    pub fn is_story(self) -> bool {
        matches!(self, FixedLayout::Intro | FixedLayout::Memorial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{TileCode, TileGrid};
    use crate::{MAP_HEIGHT, MAP_WIDTH};

    #[test]
    fn test_layout_lookup() {
        assert_eq!(FixedLayout::for_level(0), Some(FixedLayout::Intro));
        assert_eq!(FixedLayout::for_level(9), Some(FixedLayout::Memorial));
        assert_eq!(FixedLayout::for_level(28), Some(FixedLayout::Boss(2)));
        assert_eq!(FixedLayout::for_level(10), None);
    }

    #[test]
    fn test_layouts_fit_the_map() {
        for layout in [
            FixedLayout::Intro,
            FixedLayout::Memorial,
            FixedLayout::Boss(0),
            FixedLayout::Boss(1),
            FixedLayout::Boss(2),
            FixedLayout::Boss(3),
        ] {
            let columns = layout.columns();
            assert_eq!(columns.len(), MAP_WIDTH as usize);
            assert!(columns.iter().all(|c| c.len() <= MAP_HEIGHT as usize));
            let grid = TileGrid::from_layout(MAP_WIDTH, MAP_HEIGHT, columns);
            assert!(grid.filled_count() > 0);
        }
    }

    #[test]
    fn test_boss_3_core_tiles_are_floor() {
        let grid = TileGrid::from_layout(MAP_WIDTH, MAP_HEIGHT, FixedLayout::Boss(3).columns());
        for (x, y) in [(10, 8), (5, 8), (10, 12), (5, 12), (8, 11)] {
            assert_eq!(grid.get(x, y), TileCode::PLATE, "({x}, {y})");
        }
    }
}
