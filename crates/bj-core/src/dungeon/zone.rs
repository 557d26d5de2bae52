//! Zone theming descriptors

use bj_rng::LevelRng;

use super::level::Zone;
use crate::map::TileCode;

/// Scattered overlay props for a zone: with probability `1/one_in` a tile
/// gets one of `props`. `one_in == 0` disables the scatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropScatter {
    pub one_in: u32,
    pub props: &'static [TileCode],
}

impl PropScatter {
    pub const NONE: PropScatter = PropScatter {
        one_in: 0,
        props: &[],
    };

    /// Draw a prop for one tile, or NONE.
    pub fn roll(&self, rng: &mut impl LevelRng) -> TileCode {
        if self.one_in == 0 || self.props.is_empty() || rng.choice(self.one_in) != 0 {
            return TileCode::NONE;
        }
        match self.props {
            [only] => *only,
            many => many[rng.choice(many.len() as u32) as usize],
        }
    }
}

/// Per-zone decoration data consumed by the autotiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneDescriptor {
    pub zone: Zone,
    pub props: PropScatter,
}

impl ZoneDescriptor {
    pub fn for_zone(zone: Zone) -> ZoneDescriptor {
        let props = match zone {
            Zone::One => PropScatter {
                one_in: 7,
                props: &[TileCode::PROP_A],
            },
            Zone::Two => PropScatter {
                one_in: 16,
                props: &[TileCode::PROP_VENT],
            },
            Zone::Three => PropScatter {
                one_in: 14,
                props: &[TileCode::PROP_A, TileCode::PROP_B],
            },
            Zone::Four | Zone::Beyond => PropScatter::NONE,
        };
        ZoneDescriptor { zone, props }
    }

    pub fn for_level(level: i32) -> ZoneDescriptor {
        Self::for_zone(Zone::of_level(level))
    }
}
