//! Level generator
//!
//! Runs one level transition end to end: seed, trim, connect, carve the
//! enclave, decorate, stock the enclave, then hand the map to the spawn
//! allocator. A map that turns out unviable (no walkable tile, too few free
//! slots, no room for the exit) is thrown away and the pass restarts from
//! seeding, continuing the same random sequence.

use bj_rng::LevelRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::arena::ScratchArena;
use super::connectivity::enforce_connectivity;
use super::decoration::{DecorationScope, decorate};
use super::enclave::{Enclave, carve_enclave, enclave_gate};
use super::seed::{seed_map, trim_border};
use super::zone::ZoneDescriptor;
use crate::config::{Difficulty, GenConfig};
use crate::error::GenError;
use crate::map::{MapCoord, Neighbors, TileClass, TileCode, TileGrid, TileLegend};
use crate::spawn::{
    FreeSlotSet, Inventory, Placement, Population, SpawnAllocator, enclave_stock,
};
use crate::{INTRO_LEVEL, INTRO_SEED};

/// Who the level is being generated for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationContext {
    pub level: i32,
    pub difficulty: Difficulty,
    pub multiplayer: bool,
    pub inventory: Inventory,
}

impl GenerationContext {
    pub fn new(level: i32) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }
}

/// A finished level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedLevel {
    pub level: i32,
    pub grid: TileGrid,
    /// Decoration layer drawn over the map
    pub overlay: TileGrid,
    /// Zone props
    pub props: TileGrid,
    pub player: Placement,
    /// `None` while a boss arena is sealed
    pub exit: Option<Placement>,
    pub enclave: Option<Enclave>,
    pub population: Population,
    /// How many maps were thrown away before this one
    pub regenerations: u32,
}

impl GeneratedLevel {
    /// Collapse the map to the three codes movement code cares about:
    /// NONE for walls, PLATE for edges, SAND for open floor.
    pub fn collision_grid(&self, legend: &TileLegend) -> TileGrid {
        let mut collision = self.grid.clone();
        collision.for_each(|tile, _, _| {
            *tile = match legend.classify(*tile) {
                TileClass::Wall => TileCode::NONE,
                TileClass::Edge => TileCode::PLATE,
                TileClass::Center => TileCode::SAND,
            };
        });
        collision
    }

    /// Walkable tiles
    pub fn floor_count(&self, legend: &TileLegend) -> usize {
        self.grid.count(|t| legend.is_walkable(t))
    }
}

/// Builds levels from one validated configuration.
#[derive(Debug, Clone)]
pub struct LevelGenerator {
    config: GenConfig,
}

impl LevelGenerator {
    pub fn new(config: GenConfig) -> Result<Self, GenError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GenConfig {
        &self.config
    }

    /// Generate the level described by `ctx`.
    ///
    /// Every scratch buffer comes from `arena`, which is released between
    /// attempts and once more before returning. Level 0 always starts from
    /// the intro seed.
    pub fn generate<R: LevelRng>(
        &self,
        ctx: &GenerationContext,
        rng: &mut R,
        arena: &mut ScratchArena,
    ) -> Result<GeneratedLevel, GenError> {
        if ctx.level == INTRO_LEVEL {
            rng.set_state(INTRO_SEED);
        }

        let mut regenerations = 0;
        loop {
            let attempt = self.attempt(ctx, rng, arena);
            arena.release();
            if let Some(mut level) = attempt? {
                level.regenerations = regenerations;
                info!(
                    level = ctx.level,
                    floor = level.floor_count(&self.config.legend),
                    enemies = level.population.enemies.len(),
                    bosses = level.population.enemies.iter().filter(|e| e.kind.is_boss()).count(),
                    items = level.population.items.len(),
                    chests = level.population.chests.len(),
                    enclave = level.enclave.is_some(),
                    regenerations,
                    scratch_high_water = arena.high_water(),
                    "level generated"
                );
                return Ok(level);
            }

            regenerations += 1;
            if self
                .config
                .max_regenerations
                .is_some_and(|limit| regenerations > limit)
            {
                return Err(GenError::RegenerationLimit {
                    level: ctx.level,
                    attempts: regenerations,
                });
            }
            debug!(level = ctx.level, regenerations, "map unviable, regenerating");
        }
    }

    /// One pass from seeding to spawns. `Ok(None)` means the map was
    /// unviable.
    fn attempt<R: LevelRng>(
        &self,
        ctx: &GenerationContext,
        rng: &mut R,
        arena: &mut ScratchArena,
    ) -> Result<Option<GeneratedLevel>, GenError> {
        let config = &self.config;
        let legend = &config.legend;
        let (width, height) = (config.width, config.height);
        let cells = (width * height) as usize;

        let mut grid = arena.alloc_grid(width, height)?;
        let mut scratch = arena.alloc_grid(width, height)?;

        let seeding = seed_map(&mut grid, &mut scratch, ctx.level, ctx.multiplayer, config, rng)?;
        trim_border(&mut grid);

        if seeding.fixed_layout().is_none() {
            let mut mask = arena.alloc_grid(width, height)?;
            let mut stack = arena.alloc_vec::<MapCoord>(cells)?;
            if enforce_connectivity(&mut grid, &mut mask, &mut stack, legend, rng) == 0 {
                return Ok(None);
            }
        }

        let mut enclave = None;
        if enclave_gate(ctx.level, rng) {
            let mut floor = arena.alloc_vec::<MapCoord>(cells)?;
            enclave = carve_enclave(&mut grid, &mut floor, config.enclave.attempts, rng);
        }

        let mut overlay = arena.alloc_grid(width, height)?;
        let mut props = arena.alloc_grid(width, height)?;
        let mut masks = arena.alloc_filled::<Neighbors>(cells)?;
        decorate(
            &mut DecorationScope {
                grid: &mut grid,
                overlay: &mut overlay,
                props: &mut props,
                scratch: &mut scratch,
                masks: &mut masks,
                legend,
                config,
                level: ctx.level,
                zone: ZoneDescriptor::for_level(ctx.level),
                layout: seeding.fixed_layout(),
            },
            rng,
        );

        if let Some(enclave) = enclave.as_mut() {
            enclave.stock = enclave_stock(ctx.level, rng);
        }

        let allocator = SpawnAllocator {
            legend,
            config,
            level: ctx.level,
            difficulty: ctx.difficulty,
            multiplayer: ctx.multiplayer,
            inventory: &ctx.inventory,
        };

        let outcome = match seeding.fixed_layout().filter(|layout| layout.is_story()) {
            Some(layout) => allocator.story(layout, &mut grid),
            None => {
                let mut slots = FreeSlotSet::collect(&grid, legend, arena.alloc_vec(cells)?);
                if let Some(enclave) = &enclave {
                    slots.reserve_world_radius(enclave.host_position, config.enclave.halo);
                }
                if slots.len() < config.min_viable_slots {
                    debug!(
                        level = ctx.level,
                        free = slots.len(),
                        min = config.min_viable_slots,
                        "too few free slots"
                    );
                    return Ok(None);
                }
                match allocator.populate(&grid, &mut slots, arena, rng)? {
                    Some(outcome) => outcome,
                    None => return Ok(None),
                }
            }
        };

        Ok(Some(GeneratedLevel {
            level: ctx.level,
            grid,
            overlay,
            props,
            player: outcome.player,
            exit: outcome.exit,
            enclave,
            population: outcome.population,
            regenerations: 0,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bj_rng::LinearGenerator;
    use crate::{BOSS_0_LEVEL, MEMORIAL_LEVEL};

    fn generator() -> LevelGenerator {
        LevelGenerator::new(GenConfig::default()).unwrap()
    }

    fn arena() -> ScratchArena {
        ScratchArena::new(GenConfig::default().scratch_budget)
    }

    #[test]
    fn test_intro_ignores_incoming_seed() {
        let builder = generator();
        let ctx = GenerationContext::new(0);
        let a = builder.generate(&ctx, &mut LinearGenerator::new(1), &mut arena()).unwrap();
        let b = builder.generate(&ctx, &mut LinearGenerator::new(99), &mut arena()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.grid.get(12, 4), TileCode::NONE);
    }

    #[test]
    fn test_memorial_uses_authored_positions() {
        let level = generator()
            .generate(
                &GenerationContext::new(MEMORIAL_LEVEL),
                &mut LinearGenerator::new(5),
                &mut arena(),
            )
            .unwrap();
        assert_eq!(level.player.tile, MapCoord::new(11, 4));
        assert!(level.exit.is_some());
        assert!(level.population.enemies.is_empty());
    }

    #[test]
    fn test_boss_arena_has_no_exit() {
        let level = generator()
            .generate(
                &GenerationContext::new(BOSS_0_LEVEL),
                &mut LinearGenerator::new(5),
                &mut arena(),
            )
            .unwrap();
        assert!(level.exit.is_none());
        assert!(level.enclave.is_none());
    }

    #[test]
    fn test_collision_grid_has_three_codes() {
        let builder = generator();
        let level = builder
            .generate(&GenerationContext::new(14), &mut LinearGenerator::new(3), &mut arena())
            .unwrap();
        let collision = level.collision_grid(&builder.config().legend);
        for c in collision.coords() {
            let code = collision.get_at(c);
            assert!(matches!(code, TileCode::NONE | TileCode::PLATE | TileCode::SAND));
            assert_eq!(
                code.is_none(),
                builder.config().legend.is_wall(level.grid.get_at(c))
            );
        }
    }

    #[test]
    fn test_scratch_exhaustion_is_fatal() {
        let mut tiny = ScratchArena::new(500);
        let err = generator()
            .generate(&GenerationContext::new(12), &mut LinearGenerator::new(1), &mut tiny)
            .unwrap_err();
        assert!(matches!(err, GenError::ScratchExhausted { .. }));
    }

    #[test]
    fn test_regeneration_ceiling() {
        let config = GenConfig {
            min_viable_slots: 10_000,
            max_regenerations: Some(2),
            ..GenConfig::default()
        };
        let err = LevelGenerator::new(config)
            .unwrap()
            .generate(&GenerationContext::new(12), &mut LinearGenerator::new(1), &mut arena())
            .unwrap_err();
        assert!(matches!(
            err,
            GenError::RegenerationLimit {
                level: 12,
                attempts: 3
            }
        ));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = GenConfig {
            width: 3,
            ..GenConfig::default()
        };
        assert!(matches!(
            LevelGenerator::new(config),
            Err(GenError::Config(_))
        ));
    }

    #[test]
    fn test_arena_is_released() {
        let mut arena = arena();
        generator()
            .generate(&GenerationContext::new(12), &mut LinearGenerator::new(8), &mut arena)
            .unwrap();
        assert_eq!(arena.used(), 0);
        assert!(arena.high_water() > 0);
    }
}
