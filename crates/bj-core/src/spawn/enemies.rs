//! Enemy roster selection
//!
//! Each level draws a fixed-size menu from the spawn table by rejection
//! sampling, then draws from the menu until the level's enemy target is
//! met. Entries may cap their instances per level or veto themselves on a
//! roll; a capped or vetoed draw places nothing.

use bj_rng::LevelRng;
use tracing::warn;

use super::occupant::EnemyKind;
use crate::config::EnemyConfig;
use crate::dungeon::LevelRange;
use crate::{BOSS_0_LEVEL, BOSS_1_LEVEL, BOSS_2_LEVEL, BOSS_3_LEVEL};

/// A level band in which an entry refuses to spawn unless `choice(one_in)`
/// comes up zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VetoBand {
    pub levels: LevelRange,
    pub one_in: u32,
}

/// One row of the enemy spawn table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnWeightEntry {
    pub kind: EnemyKind,
    /// Eligible when any range contains the level
    pub levels: &'static [LevelRange],
    /// Most instances per level
    pub cap: Option<u32>,
    /// Checked in order; the first band containing the level decides
    pub vetoes: &'static [VetoBand],
    /// Levels on which every spawn brings a second instance
    pub extra: Option<LevelRange>,
}

impl SpawnWeightEntry {
    pub fn eligible(&self, level: i32) -> bool {
        self.levels.iter().any(|r| r.contains(level))
    }

    /// Roll the first veto band that covers `level`. Draws nothing when no
    /// band applies.
    pub fn vetoed(&self, level: i32, rng: &mut impl LevelRng) -> bool {
        match self.vetoes.iter().find(|band| band.levels.contains(level)) {
            Some(band) => rng.choice(band.one_in) != 0,
            None => false,
        }
    }

    pub fn spawns_extra(&self, level: i32) -> bool {
        self.extra.is_some_and(|r| r.contains(level))
    }
}

pub static SPAWN_TABLE: [SpawnWeightEntry; 6] = [
    SpawnWeightEntry {
        kind: EnemyKind::Drone,
        levels: &[
            LevelRange::below(BOSS_0_LEVEL),
            LevelRange::starting_at(BOSS_1_LEVEL + 1),
        ],
        cap: None,
        vetoes: &[],
        extra: Some(LevelRange::new(7, BOSS_0_LEVEL)),
    },
    SpawnWeightEntry {
        kind: EnemyKind::Dasher,
        levels: &[LevelRange::starting_at(4)],
        cap: None,
        vetoes: &[],
        extra: None,
    },
    SpawnWeightEntry {
        kind: EnemyKind::SnakeHead,
        levels: &[LevelRange::new(6, BOSS_0_LEVEL)],
        cap: Some(1),
        vetoes: &[],
        extra: None,
    },
    SpawnWeightEntry {
        kind: EnemyKind::Turret,
        levels: &[LevelRange::starting_at(1)],
        cap: None,
        vetoes: &[],
        extra: None,
    },
    SpawnWeightEntry {
        kind: EnemyKind::Scarecrow,
        levels: &[LevelRange::new(BOSS_0_LEVEL + 1, BOSS_3_LEVEL)],
        cap: None,
        vetoes: &[],
        extra: None,
    },
    SpawnWeightEntry {
        kind: EnemyKind::Golem,
        levels: &[LevelRange::starting_at(BOSS_0_LEVEL + 5)],
        cap: Some(1),
        vetoes: &[
            VetoBand {
                levels: LevelRange::new(BOSS_0_LEVEL + 5, BOSS_1_LEVEL),
                one_in: 6,
            },
            VetoBand {
                levels: LevelRange::below(BOSS_2_LEVEL),
                one_in: 4,
            },
        ],
        extra: None,
    },
];

/// Enemies per free slot on `level`.
pub fn enemy_density(level: i32, config: &EnemyConfig) -> f32 {
    (config.min_density + level as f32 * config.density_step).min(config.max_density)
}

/// How many enemies a level with `free_slots` open tiles should get.
pub fn target_enemy_count(free_slots: usize, level: i32, config: &EnemyConfig) -> usize {
    let scaled = (free_slots as f32 * enemy_density(level, config)) as usize;
    scaled.min(config.max_enemies as usize).max(1)
}

/// Outcome of one menu draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuDraw {
    /// Place one instance, two when `extra` is set
    Spawn { kind: EnemyKind, extra: bool },
    /// The entry's cap was already used up
    Capped,
    /// The entry's veto roll fired; its cap is still charged
    Vetoed,
}

/// The rejection-sampled spawn menu for one level.
#[derive(Debug, Clone)]
pub struct EnemyMenu<'t> {
    table: &'t [SpawnWeightEntry],
    picks: Vec<usize>,
    remaining: Vec<Option<u32>>,
    level: i32,
}

impl<'t> EnemyMenu<'t> {
    /// Fill `picks` with `config.menu_size` eligible table indices. Gives
    /// up with a warning after `config.max_draws` rejected draws. `caps`
    /// backs the per-entry instance counters.
    pub fn build(
        table: &'t [SpawnWeightEntry],
        level: i32,
        config: &EnemyConfig,
        mut picks: Vec<usize>,
        mut caps: Vec<Option<u32>>,
        rng: &mut impl LevelRng,
    ) -> Self {
        picks.clear();
        caps.clear();
        caps.extend(table.iter().map(|e| e.cap));
        let mut rejected = 0;
        while picks.len() < config.menu_size && !table.is_empty() {
            let index = rng.choice(table.len() as u32) as usize;
            if table[index].eligible(level) {
                picks.push(index);
                continue;
            }
            rejected += 1;
            if rejected >= config.max_draws {
                warn!(level, filled = picks.len(), "enemy menu draw bound reached");
                break;
            }
        }

        Self {
            table,
            picks,
            remaining: caps,
            level,
        }
    }

    pub fn len(&self) -> usize {
        self.picks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }

    pub fn picks(&self) -> impl Iterator<Item = EnemyKind> + '_ {
        self.picks.iter().map(|&i| self.table[i].kind)
    }

    /// Draw one menu entry and settle its cap and veto.
    pub fn draw(&mut self, rng: &mut impl LevelRng) -> Option<MenuDraw> {
        if self.picks.is_empty() {
            return None;
        }
        let index = self.picks[rng.choice(self.picks.len() as u32) as usize];
        let entry = &self.table[index];

        if let Some(left) = self.remaining[index].as_mut() {
            if *left == 0 {
                return Some(MenuDraw::Capped);
            }
            *left -= 1;
        }
        if entry.vetoed(self.level, rng) {
            return Some(MenuDraw::Vetoed);
        }
        Some(MenuDraw::Spawn {
            kind: entry.kind,
            extra: entry.spawns_extra(self.level),
        })
    }
}
