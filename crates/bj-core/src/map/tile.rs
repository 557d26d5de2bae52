//! Tile codes and their classification

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// A tile code, shared by the primary map and the decoration overlay.
///
/// The primary map and the overlay interpret codes differently; the
/// associated constants below are grouped accordingly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileCode(pub u8);

impl TileCode {
    // Primary map codes read by generation
    pub const NONE: TileCode = TileCode(0);
    pub const PLATE: TileCode = TileCode(1);
    pub const SAND: TileCode = TileCode(2);
    pub const LEDGE: TileCode = TileCode(3);
    pub const DAMAGED_PLATE: TileCode = TileCode(4);
    pub const SAND_SPROUTED: TileCode = TileCode(6);

    // Primary map decoration payload
    pub const GRASS_LEDGE: TileCode = TileCode(8);
    pub const GRASS_LEDGE_VINES: TileCode = TileCode(9);
    pub const PLATE_LEFT: TileCode = TileCode(10);
    pub const PLATE_RIGHT: TileCode = TileCode(11);
    pub const PLATE_TOP: TileCode = TileCode(12);
    pub const PLATE_BOTTOM: TileCode = TileCode(13);
    pub const BEAM_UL: TileCode = TileCode(14);
    pub const BEAM_UR: TileCode = TileCode(15);
    pub const BEAM_BL: TileCode = TileCode(16);
    pub const BEAM_BR: TileCode = TileCode(17);
    pub const WALL_SIDE_LEFT: TileCode = TileCode(18);
    pub const WALL_SIDE_RIGHT: TileCode = TileCode(19);

    // Overlay codes. GRASS_START + mask gives the 16 connective variants.
    pub const GRASS_START: TileCode = TileCode(1);
    pub const GRASS_FULL: TileCode = TileCode(16);
    pub const WALL_LIP: TileCode = TileCode(17);
    pub const BEACON: TileCode = TileCode(19);
    pub const LEDGE_CAP_BOTH_DOWN: TileCode = TileCode(28);
    pub const LEDGE_CAP_LEFT_DOWN: TileCode = TileCode(29);
    pub const LEDGE_CAP_RIGHT_DOWN: TileCode = TileCode(30);
    pub const CORNER_BOTH: TileCode = TileCode(31);
    pub const LEDGE_CAP_BOTH: TileCode = TileCode(32);
    pub const LEDGE_CAP_RIGHT: TileCode = TileCode(33);
    pub const LEDGE_CAP_LEFT: TileCode = TileCode(34);
    pub const CORNER_LEFT: TileCode = TileCode(35);
    pub const CORNER_RIGHT: TileCode = TileCode(36);

    // Prop layer codes
    pub const PROP_VENT: TileCode = TileCode(17);
    pub const PROP_A: TileCode = TileCode(18);
    pub const PROP_B: TileCode = TileCode(19);

    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Overlay codes above the grass range count as decoration.
    pub const fn is_decoration(self) -> bool {
        self.0 > Self::GRASS_FULL.0
    }
}

impl From<u8> for TileCode {
    fn from(value: u8) -> Self {
        TileCode(value)
    }
}

/// Classification of a primary map tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum TileClass {
    /// Not walkable
    Wall,
    /// Walkable and backed by a wall
    Edge,
    /// Walkable interior
    Center,
}

/// Classify a code against wall and edge lists.
///
/// Wall membership wins; a code in neither list is interior floor.
pub fn classify(code: TileCode, walls: &[TileCode], edges: &[TileCode]) -> TileClass {
    if walls.contains(&code) {
        TileClass::Wall
    } else if edges.contains(&code) {
        TileClass::Edge
    } else {
        TileClass::Center
    }
}

/// The wall and edge code lists for a tileset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileLegend {
    pub walls: Vec<TileCode>,
    pub edges: Vec<TileCode>,
}

impl Default for TileLegend {
    fn default() -> Self {
        Self {
            walls: vec![
                TileCode::NONE,
                TileCode::LEDGE,
                TileCode::GRASS_LEDGE,
                TileCode::GRASS_LEDGE_VINES,
                TileCode::BEAM_UL,
                TileCode::BEAM_UR,
                TileCode::BEAM_BL,
                TileCode::BEAM_BR,
                TileCode::WALL_SIDE_LEFT,
                TileCode::WALL_SIDE_RIGHT,
            ],
            edges: vec![
                TileCode::PLATE,
                TileCode::DAMAGED_PLATE,
                TileCode::PLATE_LEFT,
                TileCode::PLATE_RIGHT,
                TileCode::PLATE_TOP,
                TileCode::PLATE_BOTTOM,
            ],
        }
    }
}

impl TileLegend {
    pub fn classify(&self, code: TileCode) -> TileClass {
        classify(code, &self.walls, &self.edges)
    }

    pub fn is_wall(&self, code: TileCode) -> bool {
        self.walls.contains(&code)
    }

    pub fn is_walkable(&self, code: TileCode) -> bool {
        !self.is_wall(code)
    }

    pub fn is_edge(&self, code: TileCode) -> bool {
        self.classify(code) == TileClass::Edge
    }

    pub fn is_center(&self, code: TileCode) -> bool {
        self.classify(code) == TileClass::Center
    }
}
