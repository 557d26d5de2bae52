//! Spawn allocation
//!
//! Consumes the free slot set in a fixed order: player, exit, loot chest,
//! enemies, hazards, ambient scatter, then the heart cap. The order is a
//! priority; anything placed earlier can never be displaced by something
//! placed later, and every draw happens in the same sequence on every peer.
//!
//! Boss arenas place the player and the boss roster only. Story levels use
//! authored positions and draw nothing.

use bj_rng::LevelRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::enemies::{EnemyMenu, MenuDraw, SPAWN_TABLE, target_enemy_count};
use super::item::{Inventory, ItemType, draw_chest_item};
use super::occupant::{EnemyKind, Population, SceneryKind};
use super::slots::FreeSlotSet;
use crate::config::{Difficulty, GenConfig};
use crate::dungeon::{FixedLayout, ScratchArena, boss_index};
use crate::error::GenError;
use crate::map::{MapCoord, Neighbors, TileCode, TileGrid, TileLegend, WorldPosition};
use crate::{BOSS_0_LEVEL, BOSS_2_LEVEL, BOSS_HEART_PROBES, CHEST_TABLE_SIZE};

/// Player-start radius (Chebyshev, tiles) kept clear of other spawns
const PLAYER_CLEARANCE: i32 = 2;
/// Exit jitter per axis, pixels
const EXIT_JITTER: u32 = 3;
/// Edge pickups keep this Manhattan distance (pixels) from other pickups
const EDGE_SCATTER_SPACING: f32 = 64.0;
/// Center hearts keep this distance (pixels) from every occupant
const CENTER_SCATTER_SPACING: f32 = 132.0;
/// Chests appear on every map with more free slots than this
const CHEST_GUARANTEE_SLOTS: usize = 25;
/// Hearts dropped into a boss arena before the difficulty cap
const BOSS_ARENA_HEARTS: usize = 2;

/// A tile and the world position placed on it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub tile: MapCoord,
    pub position: WorldPosition,
}

impl Placement {
    pub fn at(position: WorldPosition) -> Self {
        Self {
            tile: position.to_map_coord(),
            position,
        }
    }
}

/// What spawn allocation produced for one level.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnOutcome {
    pub player: Placement,
    /// `None` while a boss arena is sealed
    pub exit: Option<Placement>,
    pub population: Population,
}

/// Places everything on one level.
pub struct SpawnAllocator<'a> {
    pub legend: &'a TileLegend,
    pub config: &'a GenConfig,
    pub level: i32,
    pub difficulty: Difficulty,
    pub multiplayer: bool,
    pub inventory: &'a Inventory,
}

impl SpawnAllocator<'_> {
    /// Authored spawns for the intro and memorial levels.
    pub fn story(&self, layout: FixedLayout, grid: &mut TileGrid) -> SpawnOutcome {
        let mut population = Population::new(&self.config.pools);
        let (player, exit) = match layout {
            FixedLayout::Intro => {
                self.place_scenery(&mut population, SceneryKind::Lander, WorldPosition::new(409.0, 112.0));
                self.place_scenery(
                    &mut population,
                    SceneryKind::LanderSignpost,
                    WorldPosition::new(403.0, 112.0),
                );
                if let Err(full) =
                    population.spawn_chest(ItemType::ExplosiveRounds2, WorldPosition::new(348.0, 154.0))
                {
                    warn!(%full, "intro chest skipped");
                }
                self.place_enemy(&mut population, EnemyKind::Drone, WorldPosition::new(159.0, 275.0));
                if self.difficulty < Difficulty::Hard {
                    self.place_item(&mut population, ItemType::Heart, WorldPosition::new(80.0, 332.0));
                }
                grid.set(12, 4, TileCode::NONE);
                (
                    WorldPosition::new(409.1, 167.2),
                    WorldPosition::new(110.0, 306.0),
                )
            }
            _ => {
                self.place_scenery(
                    &mut population,
                    SceneryKind::MemorialSignpost,
                    WorldPosition::new(430.0, 100.0),
                );
                (
                    WorldPosition::new(380.1, 100.2),
                    WorldPosition::new(431.0, 277.0),
                )
            }
        };
        SpawnOutcome {
            player: Placement::at(player),
            exit: Some(Placement::at(exit)),
            population,
        }
    }

    /// Populate a procedural level or a boss arena.
    ///
    /// Returns `Ok(None)` when the map has no room for the player or the
    /// exit; the caller treats that as an unviable map. The chest table and
    /// the enemy menu are carved from `arena`.
    pub fn populate<R: LevelRng>(
        &self,
        grid: &TileGrid,
        slots: &mut FreeSlotSet,
        arena: &mut ScratchArena,
        rng: &mut R,
    ) -> Result<Option<SpawnOutcome>, GenError> {
        let initial_free = slots.len();
        let Some(start) = slots.take_random(rng) else {
            return Ok(None);
        };
        let mut player = Placement {
            tile: start,
            position: start.placement().offset(0.1, 0.1),
        };
        slots.reserve_radius(start, PLAYER_CLEARANCE);

        let mut population = Population::new(&self.config.pools);

        if let Some(boss) = boss_index(self.level) {
            self.boss_arena(boss, grid, slots, &mut player, &mut population, rng);
            return Ok(Some(SpawnOutcome {
                player,
                exit: None,
                population,
            }));
        }

        let Some(exit_tile) = slots.take_farthest_from(start) else {
            return Ok(None);
        };
        let anchor = exit_tile.placement().offset(0.0, 16.0);
        let x = rng.sample(anchor.x, EXIT_JITTER);
        let y = rng.sample(anchor.y, EXIT_JITTER);
        let exit = Placement {
            tile: exit_tile,
            position: WorldPosition::new(x, y),
        };

        if rng.choice(2) != 0 || initial_free > CHEST_GUARANTEE_SLOTS {
            let table = arena.alloc_vec(CHEST_TABLE_SIZE)?;
            self.chest(slots, &mut population, table, rng);
        }
        let menu = arena.alloc_vec(self.config.enemies.menu_size)?;
        let caps = arena.alloc_vec(SPAWN_TABLE.len())?;
        self.enemies(slots, &mut population, menu, caps, rng);
        self.compactors(grid, slots, &mut population, rng);
        self.edge_scatter(grid, slots, &mut population, rng);
        self.center_scatter(grid, slots, &mut population, exit.position, rng);
        self.cap_hearts(&mut population, rng);

        Ok(Some(SpawnOutcome {
            player,
            exit: Some(exit),
            population,
        }))
    }

    fn boss_arena<R: LevelRng>(
        &self,
        boss: usize,
        grid: &TileGrid,
        slots: &mut FreeSlotSet,
        player: &mut Placement,
        population: &mut Population,
        rng: &mut R,
    ) {
        let roster = match boss {
            0 => Some(EnemyKind::Wanderer),
            1 => Some(EnemyKind::Gatekeeper),
            2 => Some(EnemyKind::Twin),
            _ => None,
        };
        match roster {
            Some(kind) => match slots.take_farthest_from(player.tile) {
                Some(lair) => {
                    self.place_enemy(population, kind, lair.placement());
                    if kind == EnemyKind::Twin {
                        match slots.farthest_from(player.tile) {
                            Some(second) => self.place_enemy(population, kind, second.placement()),
                            None => warn!(level = self.level, "no slot for the second twin"),
                        }
                    }
                }
                None => warn!(level = self.level, boss = %kind, "no slot for the boss"),
            },
            None => {
                for (x, y) in [(10, 8), (5, 8), (10, 12), (5, 12)] {
                    self.place_enemy(population, EnemyKind::InfestedCore, MapCoord::new(x, y).to_world());
                }
                let tile = MapCoord::new(8, 11);
                *player = Placement {
                    tile,
                    position: tile.to_world().offset(-0.1, -0.1),
                };
            }
        }

        let mut hearts = if self.difficulty == Difficulty::Hard {
            0
        } else {
            BOSS_ARENA_HEARTS.min(self.config.heart_caps.for_difficulty(self.difficulty))
        };
        let mut probes = 0;
        while hearts > 0 {
            if probes == BOSS_HEART_PROBES {
                warn!(level = self.level, hearts, "no edge tile found for arena hearts");
                break;
            }
            probes += 1;
            let x = rng.choice(grid.width() as u32) as i32;
            let y = rng.choice(grid.height() as u32) as i32;
            if self.legend.is_edge(grid.get(x, y)) {
                let position = MapCoord::new(x, y).to_world().offset(16.0, 0.0);
                self.place_item(population, ItemType::Heart, position);
                hearts -= 1;
            }
        }
    }

    fn chest<R: LevelRng>(
        &self,
        slots: &mut FreeSlotSet,
        population: &mut Population,
        table: Vec<ItemType>,
        rng: &mut R,
    ) {
        let Some(item) = draw_chest_item(self.level, self.inventory, self.multiplayer, table, rng)
        else {
            return;
        };
        match slots.take_random(rng) {
            Some(tile) => {
                if let Err(full) = population.spawn_chest(item, tile.placement()) {
                    warn!(%full, %item, "chest skipped");
                }
            }
            None => warn!(%item, "chest skipped: out of free slots"),
        }
    }

    fn enemies<R: LevelRng>(
        &self,
        slots: &mut FreeSlotSet,
        population: &mut Population,
        picks: Vec<usize>,
        caps: Vec<Option<u32>>,
        rng: &mut R,
    ) {
        let config = &self.config.enemies;
        let target = target_enemy_count(slots.len(), self.level, config);
        let mut menu = EnemyMenu::build(&SPAWN_TABLE, self.level, config, picks, caps, rng);

        let mut placed = 0;
        let mut draws = 0;
        while placed < target {
            if draws == config.max_draws {
                warn!(level = self.level, placed, target, "enemy draw bound reached");
                break;
            }
            draws += 1;
            match menu.draw(rng) {
                Some(MenuDraw::Spawn { kind, extra }) => {
                    self.spawn_enemy(slots, population, kind, rng);
                    if extra {
                        self.spawn_enemy(slots, population, kind, rng);
                    }
                    placed += 1;
                }
                Some(MenuDraw::Capped | MenuDraw::Vetoed) => {}
                None => {
                    warn!(level = self.level, "enemy menu is empty");
                    break;
                }
            }
        }
        debug!(level = self.level, placed, target, draws, "enemies placed");
    }

    /// Compactors favour nooks: edge tiles walled in on three or four
    /// sides. When no nook turns up, one random tile is tried instead and
    /// kept only if it is a free edge tile.
    fn compactors<R: LevelRng>(
        &self,
        grid: &TileGrid,
        slots: &mut FreeSlotSet,
        population: &mut Population,
        rng: &mut R,
    ) {
        if self.level <= BOSS_0_LEVEL + 4 || self.level >= BOSS_2_LEVEL {
            return;
        }
        let per_map = if slots.len() < 65 { 2 } else { 3 };
        let count = per_map.min(slots.len() / 25);

        for _ in 0..count {
            if slots.is_empty() {
                break;
            }
            if rng.choice(2) == 0 {
                continue;
            }

            let mut placed = false;
            for _ in 0..self.config.hazards.tries {
                let Some(tile) = slots.get(rng.choice(slots.len() as u32) as usize) else {
                    break;
                };
                if self.legend.is_edge(grid.get_at(tile)) && self.edge_neighbours(grid, tile) > 2 {
                    self.place_enemy(population, EnemyKind::Compactor, tile.placement());
                    slots.take(tile);
                    placed = true;
                    break;
                }
            }

            if !placed {
                let x = rng.choice(grid.width() as u32) as i32;
                let y = rng.choice(grid.height() as u32) as i32;
                let tile = MapCoord::new(x, y);
                if self.legend.is_edge(grid.get_at(tile)) && slots.take(tile) {
                    self.place_enemy(population, EnemyKind::Compactor, tile.placement());
                }
            }
        }
    }

    /// Pickups tucked into edge tiles away from open floor.
    fn edge_scatter<R: LevelRng>(
        &self,
        grid: &TileGrid,
        slots: &mut FreeSlotSet,
        population: &mut Population,
        rng: &mut R,
    ) {
        let heart_chance = if self.difficulty == Difficulty::Hard {
            1
        } else {
            3 + ((self.level - 4).max(0) as f32 * 0.2) as u32
        };

        for tile in grid.coords() {
            if !self.legend.is_edge(grid.get_at(tile)) || !slots.contains(tile) {
                continue;
            }
            let open_nearby = (-1..=1).any(|dx| {
                (-1..=1).any(|dy| self.legend.is_center(grid.get(tile.x + dx, tile.y + dy)))
            });
            if open_nearby {
                continue;
            }
            let origin = tile.to_world();
            let crowded = population
                .items
                .iter()
                .map(|p| p.position)
                .chain(population.chests.iter().map(|c| c.position))
                .any(|p| p.manhattan(origin) < EDGE_SCATTER_SPACING);
            if crowded {
                continue;
            }

            let edges = self.edge_neighbours(grid, tile);
            if rng.choice(1 + edges * edges) != 0 {
                continue;
            }
            let item = if rng.choice(heart_chance) != 0 {
                ItemType::Coin
            } else {
                ItemType::Heart
            };
            if self.place_item(population, item, tile.placement()) {
                slots.take(tile);
            }
        }
    }

    /// Hearts on open floor that nothing else is close to.
    fn center_scatter<R: LevelRng>(
        &self,
        grid: &TileGrid,
        slots: &mut FreeSlotSet,
        population: &mut Population,
        exit: WorldPosition,
        rng: &mut R,
    ) {
        for tile in grid.coords() {
            if !self.legend.is_center(grid.get_at(tile)) || !slots.contains(tile) {
                continue;
            }
            let origin = tile.to_world();
            let near = |p: WorldPosition| p.distance(origin) < CENTER_SCATTER_SPACING;
            let occupied = near(exit)
                || population.enemies.iter().any(|e| near(e.position))
                || population.items.iter().any(|p| near(p.position))
                || population.chests.iter().any(|c| near(c.position));
            if occupied {
                continue;
            }

            let open = Neighbors::around(tile, |n| self.legend.is_center(grid.get(n.x, n.y)))
                .bits()
                .count_ones();
            let place = match open {
                0 => true,
                1 | 2 => rng.choice(3) == 0,
                _ => rng.choice(5) == 0,
            };
            if place && self.place_item(population, ItemType::Heart, origin.offset(16.0, 0.0)) {
                slots.take(tile);
            }
        }
    }

    /// Turn random hearts into coins until the difficulty's cap holds.
    fn cap_hearts<R: LevelRng>(&self, population: &mut Population, rng: &mut R) {
        let cap = self.config.heart_caps.for_difficulty(self.difficulty);
        let mut hearts = population.count_items(ItemType::Heart);
        let len = population.items.len() as u32;
        while hearts > cap {
            let pick = &mut population.items[rng.choice(len) as usize];
            if pick.item == ItemType::Heart {
                pick.item = ItemType::Coin;
                hearts -= 1;
            }
        }
    }

    fn edge_neighbours(&self, grid: &TileGrid, tile: MapCoord) -> u32 {
        Neighbors::around(tile, |n| self.legend.is_edge(grid.get(n.x, n.y)))
            .bits()
            .count_ones()
    }

    fn spawn_enemy<R: LevelRng>(
        &self,
        slots: &mut FreeSlotSet,
        population: &mut Population,
        kind: EnemyKind,
        rng: &mut R,
    ) {
        match slots.take_random(rng) {
            Some(tile) => self.place_enemy(population, kind, tile.placement()),
            None => warn!(enemy = %kind, "spawn skipped: out of free slots"),
        }
    }

    fn place_enemy(&self, population: &mut Population, kind: EnemyKind, position: WorldPosition) {
        if let Err(full) = population.spawn_enemy(kind, position) {
            warn!(%full, enemy = %kind, "spawn skipped");
        }
    }

    /// Place a pickup, dropping a piece of scenery to make room if the
    /// details pool is full.
    fn place_item(&self, population: &mut Population, item: ItemType, position: WorldPosition) -> bool {
        let Err(full) = population.spawn_item(item, position) else {
            return true;
        };
        if let Some(evicted) = population.evict_scenery() {
            if population.spawn_item(item, position).is_ok() {
                debug!(scenery = %evicted.kind, %item, "evicted scenery for a pickup");
                return true;
            }
        }
        warn!(%full, %item, "pickup skipped");
        false
    }

    fn place_scenery(&self, population: &mut Population, kind: SceneryKind, position: WorldPosition) {
        if let Err(full) = population.spawn_scenery(kind, position) {
            warn!(%full, scenery = %kind, "scenery skipped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bj_rng::{LinearGenerator, ScriptedRng};
    use crate::config::PoolConfig;

    fn allocator<'a>(
        level: i32,
        difficulty: Difficulty,
        config: &'a GenConfig,
        inventory: &'a Inventory,
    ) -> SpawnAllocator<'a> {
        SpawnAllocator {
            legend: &config.legend,
            config,
            level,
            difficulty,
            multiplayer: false,
            inventory,
        }
    }

    /// A sand field ringed by plates
    fn field() -> TileGrid {
        let mut grid = TileGrid::new(16, 20);
        for x in 2..14 {
            for y in 2..18 {
                let edge = x == 2 || x == 13 || y == 2 || y == 17;
                grid.set(x, y, if edge { TileCode::PLATE } else { TileCode::SAND });
            }
        }
        grid
    }

    fn arena() -> ScratchArena {
        ScratchArena::new(GenConfig::default().scratch_budget)
    }

    fn slots_of(grid: &TileGrid, config: &GenConfig) -> FreeSlotSet {
        FreeSlotSet::collect(grid, &config.legend, Vec::new())
    }

    #[test]
    fn test_player_and_exit_are_distinct_and_walkable() {
        let config = GenConfig::default();
        let inventory = Inventory::new();
        let grid = field();
        for seed in 0..20 {
            let mut slots = slots_of(&grid, &config);
            let mut rng = LinearGenerator::new(seed);
            let outcome = allocator(12, Difficulty::Normal, &config, &inventory)
                .populate(&grid, &mut slots, &mut arena(), &mut rng)
                .unwrap()
                .unwrap();
            let exit = outcome.exit.unwrap();
            assert_ne!(outcome.player.tile, exit.tile);
            assert!(config.legend.is_walkable(grid.get_at(outcome.player.tile)));
            assert!(config.legend.is_walkable(grid.get_at(exit.tile)));
            assert!(!slots.contains(exit.tile));
            assert!((exit.position.x - exit.tile.placement().x).abs() < 3.0);
        }
    }

    #[test]
    fn test_nothing_spawns_next_to_the_player() {
        let config = GenConfig::default();
        let inventory = Inventory::new();
        let grid = field();
        for seed in 0..20 {
            let mut slots = slots_of(&grid, &config);
            let mut rng = LinearGenerator::new(seed);
            let outcome = allocator(6, Difficulty::Easy, &config, &inventory)
                .populate(&grid, &mut slots, &mut arena(), &mut rng)
                .unwrap()
                .unwrap();
            let start = outcome.player.tile;
            for enemy in &outcome.population.enemies {
                assert!(enemy.position.to_map_coord().chebyshev(start) >= PLAYER_CLEARANCE);
            }
        }
    }

    #[test]
    fn test_heart_cap_holds_for_every_difficulty() {
        use strum::IntoEnumIterator;
        let config = GenConfig::default();
        let inventory = Inventory::new();
        let grid = field();
        for difficulty in Difficulty::iter() {
            for seed in 0..10 {
                let mut slots = slots_of(&grid, &config);
                let mut rng = LinearGenerator::new(seed);
                let outcome = allocator(6, difficulty, &config, &inventory)
                    .populate(&grid, &mut slots, &mut arena(), &mut rng)
                    .unwrap()
                    .unwrap();
                let hearts = outcome.population.count_items(ItemType::Heart);
                assert!(hearts <= config.heart_caps.for_difficulty(difficulty));
            }
        }
    }

    #[test]
    fn test_enemy_count_matches_target() {
        let config = GenConfig::default();
        let inventory = Inventory::new();
        let grid = field();
        let mut slots = slots_of(&grid, &config);
        let mut rng = LinearGenerator::new(3);
        let outcome = allocator(3, Difficulty::Normal, &config, &inventory)
            .populate(&grid, &mut slots, &mut arena(), &mut rng)
            .unwrap()
            .unwrap();
        // level 3 fields only drones and turrets, neither capped nor vetoed
        assert!(!outcome.population.enemies.is_empty());
        assert!(outcome.population.enemies.len() <= config.enemies.max_enemies as usize);
    }

    #[test]
    fn test_boss_arena_is_sealed() {
        let config = GenConfig::default();
        let inventory = Inventory::new();
        let grid = field();
        let mut slots = slots_of(&grid, &config);
        let mut rng = LinearGenerator::new(8);
        let outcome = allocator(BOSS_0_LEVEL, Difficulty::Normal, &config, &inventory)
            .populate(&grid, &mut slots, &mut arena(), &mut rng)
            .unwrap()
            .unwrap();
        assert!(outcome.exit.is_none());
        assert_eq!(outcome.population.count_enemies(EnemyKind::Wanderer), 1);
        assert_eq!(outcome.population.count_items(ItemType::Heart), 2);
    }

    #[test]
    fn test_survival_arena_has_no_hearts() {
        let config = GenConfig::default();
        let inventory = Inventory::new();
        let grid = field();
        for seed in 0..10 {
            let mut slots = slots_of(&grid, &config);
            let mut rng = LinearGenerator::new(seed);
            let outcome = allocator(BOSS_0_LEVEL, Difficulty::Survival, &config, &inventory)
                .populate(&grid, &mut slots, &mut arena(), &mut rng)
                .unwrap()
                .unwrap();
            assert_eq!(outcome.population.count_items(ItemType::Heart), 0);
        }
    }

    #[test]
    fn test_arena_hearts_follow_a_lowered_cap() {
        let mut config = GenConfig::default();
        config.heart_caps.easy = 1;
        let inventory = Inventory::new();
        let grid = field();
        let mut slots = slots_of(&grid, &config);
        let mut rng = LinearGenerator::new(8);
        let outcome = allocator(BOSS_0_LEVEL, Difficulty::Easy, &config, &inventory)
            .populate(&grid, &mut slots, &mut arena(), &mut rng)
            .unwrap()
            .unwrap();
        assert_eq!(outcome.population.count_items(ItemType::Heart), 1);
    }

    #[test]
    fn test_compactors_only_take_free_slots() {
        let config = GenConfig::default();
        let inventory = Inventory::new();
        let grid = field();
        for level in (13..=27).filter(|&l| boss_index(l).is_none()) {
            for seed in 0..40 {
                let mut slots = slots_of(&grid, &config);
                let mut rng = LinearGenerator::new(seed);
                let outcome = allocator(level, Difficulty::Normal, &config, &inventory)
                    .populate(&grid, &mut slots, &mut arena(), &mut rng)
                    .unwrap()
                    .unwrap();
                let start = outcome.player.tile;
                let exit = outcome.exit.unwrap().tile;
                let mut taken = Vec::new();
                for enemy in &outcome.population.enemies {
                    let tile = enemy.position.to_map_coord();
                    assert_ne!(tile, exit, "level {level} seed {seed}: {} on the exit", enemy.kind);
                    assert!(tile.chebyshev(start) >= PLAYER_CLEARANCE, "level {level} seed {seed}");
                    assert!(!taken.contains(&tile), "level {level} seed {seed}: shared {tile:?}");
                    taken.push(tile);
                }
            }
        }
    }

    #[test]
    fn test_spawn_tables_are_charged_to_the_arena() {
        let config = GenConfig::default();
        let inventory = Inventory::new();
        let grid = field();
        let mut slots = slots_of(&grid, &config);
        let mut rng = LinearGenerator::new(3);
        let mut tiny = ScratchArena::new(8);
        let err = allocator(12, Difficulty::Normal, &config, &inventory)
            .populate(&grid, &mut slots, &mut tiny, &mut rng)
            .unwrap_err();
        assert!(matches!(err, GenError::ScratchExhausted { .. }));
    }

    #[test]
    fn test_spawn_tables_show_in_arena_usage() {
        let config = GenConfig::default();
        let inventory = Inventory::new();
        let grid = field();
        let mut slots = slots_of(&grid, &config);
        let mut rng = LinearGenerator::new(3);
        let mut scratch = arena();
        allocator(12, Difficulty::Normal, &config, &inventory)
            .populate(&grid, &mut slots, &mut scratch, &mut rng)
            .unwrap()
            .unwrap();
        assert!(scratch.used() >= config.enemies.menu_size * std::mem::size_of::<usize>());
    }

    #[test]
    fn test_twins_take_distinct_slots() {
        let config = GenConfig::default();
        let inventory = Inventory::new();
        let grid = field();
        let mut slots = slots_of(&grid, &config);
        let mut rng = LinearGenerator::new(28);
        let outcome = allocator(BOSS_2_LEVEL, Difficulty::Hard, &config, &inventory)
            .populate(&grid, &mut slots, &mut arena(), &mut rng)
            .unwrap()
            .unwrap();
        let twins = &outcome.population.enemies;
        assert_eq!(twins.len(), 2);
        assert_ne!(twins[0].position, twins[1].position);
        assert!(outcome.population.items.is_empty());
    }

    #[test]
    fn test_final_arena_uses_fixed_positions() {
        let config = GenConfig::default();
        let inventory = Inventory::new();
        let grid = field();
        let mut slots = slots_of(&grid, &config);
        let mut rng = LinearGenerator::new(36);
        let outcome = allocator(36, Difficulty::Normal, &config, &inventory)
            .populate(&grid, &mut slots, &mut arena(), &mut rng)
            .unwrap()
            .unwrap();
        assert_eq!(outcome.population.count_enemies(EnemyKind::InfestedCore), 4);
        assert_eq!(outcome.player.tile, MapCoord::new(8, 11));
        assert_eq!(outcome.player.position, WorldPosition::new(255.9, 263.9));
    }

    #[test]
    fn test_no_room_for_exit_is_unviable() {
        let config = GenConfig::default();
        let inventory = Inventory::new();
        let mut grid = TileGrid::new(16, 20);
        grid.set(5, 5, TileCode::SAND);
        grid.set(5, 6, TileCode::SAND);
        let mut slots = slots_of(&grid, &config);
        let mut rng = ScriptedRng::default();
        let outcome = allocator(12, Difficulty::Normal, &config, &inventory)
            .populate(&grid, &mut slots, &mut arena(), &mut rng)
            .unwrap();
        assert!(outcome.is_none());
    }

    #[test]
    fn test_intro_story_spawns() {
        let config = GenConfig::default();
        let inventory = Inventory::new();
        let mut grid = TileGrid::new(16, 20);
        grid.set(12, 4, TileCode::PLATE);
        let outcome = allocator(0, Difficulty::Normal, &config, &inventory).story(FixedLayout::Intro, &mut grid);
        assert_eq!(grid.get(12, 4), TileCode::NONE);
        assert_eq!(outcome.player.position, WorldPosition::new(409.1, 167.2));
        assert_eq!(outcome.exit.unwrap().position, WorldPosition::new(110.0, 306.0));
        assert_eq!(outcome.population.scenery.len(), 2);
        assert_eq!(outcome.population.chests[0].item, ItemType::ExplosiveRounds2);
        assert_eq!(outcome.population.count_items(ItemType::Heart), 1);

        let hard = allocator(0, Difficulty::Hard, &config, &inventory).story(FixedLayout::Intro, &mut grid);
        assert_eq!(hard.population.count_items(ItemType::Heart), 0);
    }

    #[test]
    fn test_full_details_pool_evicts_scenery() {
        let config = GenConfig {
            pools: PoolConfig {
                enemies: 4,
                details: 2,
            },
            ..GenConfig::default()
        };
        let inventory = Inventory::new();
        let mut grid = TileGrid::new(16, 20);
        let outcome = allocator(0, Difficulty::Easy, &config, &inventory).story(FixedLayout::Intro, &mut grid);
        // lander and signpost fill the pool; the chest is dropped, the heart
        // evicts the signpost
        assert!(outcome.population.chests.is_empty());
        assert_eq!(outcome.population.scenery.len(), 1);
        assert_eq!(outcome.population.count_items(ItemType::Heart), 1);
    }
}
