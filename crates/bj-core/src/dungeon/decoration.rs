//! Decoration autotiling
//!
//! Decoration runs as an ordered table of passes, each guarded by a
//! predicate on the level being built. Zone-specific rules are table rows
//! rather than branches, so a new theme only adds rows.
//!
//! The passes work on two grids: the primary map, whose plates and empty
//! tiles get sand, ledges, beams and directional variants, and the overlay,
//! which carries grass patches (16 connective variants chosen from a 4-bit
//! neighbour mask), lips and caps. Zone props go to a third layer of their
//! own. Nothing here changes which tiles are walkable.

use bj_rng::LevelRng;

use super::automaton::smooth;
use super::layouts::FixedLayout;
use super::level::Zone;
use super::zone::ZoneDescriptor;
use crate::BOSS_0_LEVEL;
use crate::config::GenConfig;
use crate::map::{MapCoord, Neighbors, TileCode, TileGrid, TileLegend};

/// Everything a decoration pass may read or write.
pub struct DecorationScope<'a> {
    pub grid: &'a mut TileGrid,
    pub overlay: &'a mut TileGrid,
    /// Zone props, drawn under nothing else and never read back
    pub props: &'a mut TileGrid,
    /// Automaton double buffer for the overlay
    pub scratch: &'a mut TileGrid,
    /// Overlay neighbour masks, one per tile
    pub masks: &'a mut Vec<Neighbors>,
    pub legend: &'a TileLegend,
    pub config: &'a GenConfig,
    pub level: i32,
    pub zone: ZoneDescriptor,
    pub layout: Option<FixedLayout>,
}

impl DecorationScope<'_> {
    fn mask_index(&self, c: MapCoord) -> usize {
        (c.x * self.grid.height() + c.y) as usize
    }

    /// Neighbour mask computed by the bitmask pass.
    pub fn mask(&self, c: MapCoord) -> Neighbors {
        self.masks
            .get(self.mask_index(c))
            .copied()
            .unwrap_or_default()
    }
}

/// One row of the decoration table.
pub struct DecorationPass<R> {
    pub name: &'static str,
    pub applies: fn(&DecorationScope<'_>) -> bool,
    pub apply: fn(&mut DecorationScope<'_>, &mut R),
}

fn always(_: &DecorationScope<'_>) -> bool {
    true
}

fn in_zone_one(scope: &DecorationScope<'_>) -> bool {
    scope.zone.zone == Zone::One
}

fn in_zone_two(scope: &DecorationScope<'_>) -> bool {
    scope.zone.zone == Zone::Two
}

fn in_zone_three(scope: &DecorationScope<'_>) -> bool {
    scope.zone.zone == Zone::Three
}

fn in_zone_four(scope: &DecorationScope<'_>) -> bool {
    scope.zone.zone == Zone::Four
}

/// The decoration table, in execution order.
pub fn passes<R: LevelRng>() -> [DecorationPass<R>; 13] {
    [
        DecorationPass {
            name: "overlay_seed",
            applies: always,
            apply: seed_overlay,
        },
        DecorationPass {
            name: "interior_sand",
            applies: always,
            apply: |s, _| interior_sand(s.grid),
        },
        DecorationPass {
            name: "ledges",
            applies: always,
            apply: |s, _| ledges(s.grid),
        },
        DecorationPass {
            name: "crop_overlay",
            applies: always,
            apply: |s, _| crop_overlay(s.grid, s.overlay),
        },
        DecorationPass {
            name: "overlay_bitmask",
            applies: always,
            apply: |s, _| overlay_bitmask(s),
        },
        DecorationPass {
            name: "ledge_caps",
            applies: in_zone_four,
            apply: |s, _| ledge_caps(s.grid, s.overlay),
        },
        DecorationPass {
            name: "overlay_variants",
            applies: always,
            apply: overlay_variants,
        },
        DecorationPass {
            name: "pillars_and_beams",
            applies: in_zone_one,
            apply: |s, _| pillars_and_beams(s.grid, s.legend),
        },
        DecorationPass {
            name: "wall_lips",
            applies: in_zone_three,
            apply: |s, _| wall_lips(s.grid, s.overlay, s.legend),
        },
        DecorationPass {
            name: "directional_plates",
            applies: in_zone_one,
            apply: |s, _| directional_plates(s.grid, s.overlay, s.legend),
        },
        DecorationPass {
            name: "beacons",
            applies: in_zone_two,
            apply: beacons,
        },
        DecorationPass {
            name: "props",
            applies: always,
            apply: props,
        },
        DecorationPass {
            name: "weathering",
            applies: always,
            apply: weathering,
        },
    ]
}

/// Run every applicable pass in order.
pub fn decorate<R: LevelRng>(scope: &mut DecorationScope<'_>, rng: &mut R) {
    for pass in passes::<R>() {
        if (pass.applies)(scope) {
            (pass.apply)(scope, rng);
        }
    }
}

/// Seed the overlay with sparse noise past the first boss, smooth it, then
/// let an authored pattern override it.
fn seed_overlay<R: LevelRng>(scope: &mut DecorationScope<'_>, rng: &mut R) {
    let one_in = scope.config.decoration.overlay_fill_one_in;
    if scope.level > BOSS_0_LEVEL {
        scope.overlay.for_each(|tile, _, _| {
            *tile = if rng.choice(one_in) != 0 {
                TileCode::NONE
            } else {
                TileCode::PLATE
            };
        });
    } else {
        scope.overlay.fill(TileCode::NONE);
    }

    smooth(scope.overlay, scope.scratch, &scope.config.overlay_automaton);

    if let Some(pattern) = scope.layout.and_then(FixedLayout::overlay) {
        scope.overlay.stamp_layout(pattern, TileCode::PLATE);
    }
}

/// Plates surrounded on all four sides become sand.
fn interior_sand(grid: &mut TileGrid) {
    for c in grid.coords() {
        if grid.get_at(c) == TileCode::PLATE
            && Neighbors::around(c, |n| grid.is_filled(n.x, n.y)) == Neighbors::all()
        {
            grid.set_at(c, TileCode::SAND);
        }
    }
}

/// Empty tiles directly below a plate become ledges.
fn ledges(grid: &mut TileGrid) {
    for c in grid.coords() {
        let above = grid.get(c.x, c.y - 1);
        if grid.get_at(c).is_none()
            && (above == TileCode::PLATE || above == TileCode::DAMAGED_PLATE)
        {
            grid.set_at(c, TileCode::LEDGE);
        }
    }
}

/// Drop overlay tiles that hang over empty map.
fn crop_overlay(grid: &TileGrid, overlay: &mut TileGrid) {
    for c in grid.coords() {
        if grid.get_at(c).is_none() {
            overlay.set_at(c, TileCode::NONE);
        }
    }
}

/// Record, for every tile, which orthogonal overlay neighbours are filled.
fn overlay_bitmask(scope: &mut DecorationScope<'_>) {
    let height = scope.grid.height();
    let overlay = &*scope.overlay;
    let masks = &mut *scope.masks;
    masks.clear();
    masks.resize((scope.grid.width() * height) as usize, Neighbors::empty());
    for c in overlay.coords() {
        masks[(c.x * height + c.y) as usize] =
            Neighbors::around(c, |n| overlay.is_filled(n.x, n.y));
    }
}

/// Zone four draws caps where ledges and floor corners meet plates.
fn ledge_caps(grid: &TileGrid, overlay: &mut TileGrid) {
    let plate = |x: i32, y: i32| grid.get(x, y) == TileCode::PLATE;

    for c in grid.coords() {
        let (x, y) = (c.x, c.y);
        let tile = grid.get(x, y);

        if tile == TileCode::LEDGE {
            if plate(x + 1, y) {
                overlay.set(x, y, TileCode::LEDGE_CAP_RIGHT);
            }
            if plate(x - 1, y) {
                let code = if overlay.get(x, y) == TileCode::LEDGE_CAP_RIGHT {
                    TileCode::LEDGE_CAP_BOTH
                } else {
                    TileCode::LEDGE_CAP_LEFT
                };
                overlay.set(x, y, code);
            }
            if plate(x, y + 1) {
                let code = match overlay.get(x, y) {
                    TileCode::LEDGE_CAP_RIGHT => Some(TileCode::LEDGE_CAP_RIGHT_DOWN),
                    TileCode::LEDGE_CAP_LEFT => Some(TileCode::LEDGE_CAP_LEFT_DOWN),
                    TileCode::LEDGE_CAP_BOTH => Some(TileCode::LEDGE_CAP_BOTH_DOWN),
                    _ => None,
                };
                if let Some(code) = code {
                    overlay.set(x, y, code);
                }
            }
        }

        if tile.is_none() {
            if plate(x + 1, y) && plate(x, y + 1) {
                overlay.set(x, y, TileCode::CORNER_RIGHT);
            }
            if plate(x - 1, y) && plate(x, y + 1) {
                let code = if overlay.get(x, y) == TileCode::CORNER_RIGHT {
                    TileCode::CORNER_BOTH
                } else {
                    TileCode::CORNER_LEFT
                };
                overlay.set(x, y, code);
            }
        }

        if tile == TileCode::SAND {
            if overlay.is_filled(x, y) {
                continue;
            }
            if plate(x - 1, y) && plate(x, y - 1) && !plate(x - 1, y - 1) {
                overlay.set(x, y, TileCode::LEDGE_CAP_LEFT);
            }
            if plate(x + 1, y) && plate(x, y - 1) && !plate(x + 1, y - 1) {
                let code = if overlay.get(x, y) == TileCode::LEDGE_CAP_LEFT {
                    TileCode::LEDGE_CAP_BOTH
                } else {
                    TileCode::LEDGE_CAP_RIGHT
                };
                overlay.set(x, y, code);
            }
            if plate(x - 1, y) && plate(x, y + 1) && !plate(x - 1, y + 1) {
                let code = match overlay.get(x, y) {
                    TileCode::LEDGE_CAP_LEFT => TileCode::LEDGE_CAP_LEFT_DOWN,
                    TileCode::LEDGE_CAP_BOTH => TileCode::LEDGE_CAP_BOTH_DOWN,
                    _ => TileCode::CORNER_LEFT,
                };
                overlay.set(x, y, code);
            }
            if plate(x + 1, y) && plate(x, y + 1) && !plate(x + 1, y + 1) {
                let code = match overlay.get(x, y) {
                    TileCode::LEDGE_CAP_RIGHT => TileCode::LEDGE_CAP_RIGHT_DOWN,
                    TileCode::CORNER_LEFT => TileCode::CORNER_BOTH,
                    TileCode::LEDGE_CAP_LEFT_DOWN
                    | TileCode::LEDGE_CAP_BOTH_DOWN
                    | TileCode::LEDGE_CAP_BOTH
                    | TileCode::CORNER_BOTH => TileCode::LEDGE_CAP_BOTH_DOWN,
                    _ => TileCode::CORNER_RIGHT,
                };
                overlay.set(x, y, code);
            }
        }
    }
}

/// Grass over floor takes its connective variant; grass over a ledge turns
/// the ledge itself into a grassy one.
fn overlay_variants<R: LevelRng>(scope: &mut DecorationScope<'_>, rng: &mut R) {
    for c in scope.overlay.coords() {
        if scope.overlay.get_at(c) != TileCode::PLATE {
            continue;
        }
        match scope.grid.get_at(c) {
            TileCode::PLATE | TileCode::SAND => {
                let variant = TileCode(TileCode::GRASS_START.0 + scope.mask(c).bits());
                scope.overlay.set_at(c, variant);
            }
            TileCode::LEDGE => {
                let ledge = if rng.choice(2) != 0 {
                    TileCode::GRASS_LEDGE
                } else {
                    TileCode::GRASS_LEDGE_VINES
                };
                scope.grid.set_at(c, ledge);
                scope.overlay.set_at(c, TileCode::NONE);
            }
            _ => {}
        }
    }
}

/// Zone one: wall-side pillars beside floor, and beams where empty space
/// or a ledge meets a plate.
fn pillars_and_beams(grid: &mut TileGrid, legend: &TileLegend) {
    let open = |t: TileCode, side: TileCode| t.is_none() || t == side;

    for c in grid.coords() {
        let (x, y) = (c.x, c.y);
        let below = grid.get(x, y + 1);
        let above = grid.get(x, y - 1);
        let left = grid.get(x - 1, y);
        let right = grid.get(x + 1, y);

        if grid.get(x, y).is_none()
            && !legend.is_wall(left)
            && (open(below, TileCode::WALL_SIDE_LEFT) || open(above, TileCode::WALL_SIDE_LEFT))
            && open(grid.get(x - 2, y), TileCode::WALL_SIDE_RIGHT)
        {
            grid.set(x, y, TileCode::WALL_SIDE_LEFT);
        }
        if grid.get(x, y).is_none()
            && !legend.is_wall(right)
            && (open(below, TileCode::WALL_SIDE_RIGHT) || open(above, TileCode::WALL_SIDE_RIGHT))
            && open(grid.get(x + 2, y), TileCode::WALL_SIDE_LEFT)
        {
            grid.set(x, y, TileCode::WALL_SIDE_RIGHT);
        }
    }

    for c in grid.coords() {
        let (x, y) = (c.x, c.y);
        let tile = grid.get(x, y);
        let plate_right = grid.get(x + 1, y) == TileCode::PLATE;
        let plate_left = grid.get(x - 1, y) == TileCode::PLATE;

        if tile == TileCode::LEDGE {
            if plate_right {
                grid.set(x, y, TileCode::BEAM_BR);
            } else if plate_left {
                grid.set(x, y, TileCode::BEAM_BL);
            }
        } else if tile.is_none() && grid.get(x, y + 1) == TileCode::PLATE {
            if plate_right {
                grid.set(x, y, TileCode::BEAM_UR);
            } else if plate_left {
                grid.set(x, y, TileCode::BEAM_UL);
            }
        }
    }
}

/// Zone three: a lip in the overlay on every wall tile above open floor.
fn wall_lips(grid: &TileGrid, overlay: &mut TileGrid, legend: &TileLegend) {
    for c in grid.coords() {
        if legend.is_wall(grid.get_at(c)) && !legend.is_wall(grid.get(c.x, c.y + 1)) {
            overlay.set_at(c, TileCode::WALL_LIP);
        }
    }
}

/// Zone one: bare plates bordering interior floor on one axis get a
/// directional variant.
fn directional_plates(grid: &mut TileGrid, overlay: &TileGrid, legend: &TileLegend) {
    for c in grid.coords() {
        let (x, y) = (c.x, c.y);
        if grid.get(x, y) != TileCode::PLATE || overlay.is_filled(x, y) {
            continue;
        }
        let below = grid.get(x, y + 1);
        let above = grid.get(x, y - 1);
        let left = grid.get(x - 1, y);
        let right = grid.get(x + 1, y);

        let vertical_open = !legend.is_wall(below)
            && !legend.is_wall(above)
            && !(legend.is_center(below) && legend.is_center(above));
        let horizontal_open = !legend.is_wall(right)
            && !legend.is_wall(left)
            && !(legend.is_center(left) && legend.is_center(right));

        if legend.is_center(right) && vertical_open {
            grid.set(x, y, TileCode::PLATE_LEFT);
        }
        if legend.is_center(left) && vertical_open {
            grid.set(x, y, TileCode::PLATE_RIGHT);
        }
        if legend.is_center(below) && horizontal_open {
            grid.set(x, y, TileCode::PLATE_TOP);
        }
        if legend.is_center(above) && horizontal_open {
            grid.set(x, y, TileCode::PLATE_BOTTOM);
        }
    }
}

/// Zone two: half of the solid grass tiles become beacons.
fn beacons<R: LevelRng>(scope: &mut DecorationScope<'_>, rng: &mut R) {
    scope.overlay.for_each(|tile, _, _| {
        if *tile == TileCode::GRASS_FULL && rng.choice(2) != 0 {
            *tile = TileCode::BEACON;
        }
    });
}

/// Zone props on bare interior floor away from overlay decoration. Only
/// the overlay is checked for crowding; earlier props never block later
/// ones.
fn props<R: LevelRng>(scope: &mut DecorationScope<'_>, rng: &mut R) {
    let scatter = scope.zone.props;
    scope.props.fill(TileCode::NONE);
    for c in scope.overlay.coords() {
        if scope.overlay.is_filled(c.x, c.y) || !scope.legend.is_center(scope.grid.get_at(c)) {
            continue;
        }
        let crowded = (c.x - 1..=c.x)
            .any(|i| (c.y - 1..=c.y).any(|j| scope.overlay.get(i, j).is_decoration()));
        if !crowded {
            scope.props.set_at(c, scatter.roll(rng));
        }
    }
}

/// Cosmetic wear: some plates crack and some bare sand sprouts.
fn weathering<R: LevelRng>(scope: &mut DecorationScope<'_>, rng: &mut R) {
    let one_in = scope.config.decoration.weathering_one_in;
    for c in scope.grid.coords() {
        match scope.grid.get_at(c) {
            TileCode::PLATE => {
                if rng.choice(one_in) == 0 {
                    scope.grid.set_at(c, TileCode::DAMAGED_PLATE);
                }
            }
            TileCode::SAND => {
                if rng.choice(one_in) == 0 && scope.overlay.get_at(c).is_none() {
                    scope.grid.set_at(c, TileCode::SAND_SPROUTED);
                }
            }
            _ => {}
        }
    }
}
