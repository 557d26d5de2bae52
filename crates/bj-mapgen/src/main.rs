//! Blind Jump level generator
//!
//! Generates consecutive levels from one seed, the way a run carries the
//! generator state from each level transition to the next, and prints them.

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use strum::IntoEnumIterator;

use bj_core::map::{MapCoord, TileClass};
use bj_core::spawn::{Inventory, ItemType};
use bj_core::{
    Difficulty, GenConfig, GeneratedLevel, GenerationContext, LevelGenerator, LevelRng,
    LinearGenerator, ScratchArena,
};

/// Blind Jump level generator
#[derive(Parser, Debug)]
#[command(name = "bj-mapgen")]
#[command(author, version, about = "Generate Blind Jump levels from a seed", long_about = None)]
struct Args {
    /// Generator state before the first level; random when omitted
    #[arg(short = 's', long = "seed")]
    seed: Option<u32>,

    /// First level to generate
    #[arg(short = 'l', long = "level", default_value_t = 1)]
    level: i32,

    /// Number of consecutive levels
    #[arg(short = 'n', long = "count", default_value_t = 1)]
    count: u32,

    /// Difficulty (easy/normal/hard/survival)
    #[arg(short = 'd', long = "difficulty", default_value_t = Difficulty::Normal)]
    difficulty: Difficulty,

    /// Generate for a two-player session
    #[arg(short = 'm', long = "multiplayer")]
    multiplayer: bool,

    /// Items already owned, e.g. `--owned blaster,lethargy`
    #[arg(short = 'o', long = "owned", value_delimiter = ',')]
    owned: Vec<ItemType>,

    /// JSON configuration file; missing fields take defaults
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Print levels as JSON instead of ASCII
    #[arg(long = "json")]
    json: bool,

    /// Print the default configuration and exit
    #[arg(long = "dump-config")]
    dump_config: bool,

    /// List item names accepted by --owned and exit
    #[arg(long = "list-items")]
    list_items: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    seed: u32,
    /// Generator state after the last level
    final_state: u32,
    levels: &'a [GeneratedLevel],
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("bj-mapgen: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    if args.dump_config {
        println!("{}", GenConfig::default().to_json_string()?);
        return Ok(());
    }
    if args.list_items {
        for item in ItemType::iter() {
            println!("{item}");
        }
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => GenConfig::load_from_file(path)?,
        None => GenConfig::default(),
    };
    let generator = LevelGenerator::new(config)?;
    let mut arena = ScratchArena::new(generator.config().scratch_budget);
    let mut rng = match args.seed {
        Some(seed) => LinearGenerator::new(seed),
        None => LinearGenerator::from_entropy(),
    };
    let seed = rng.state();
    let inventory: Inventory = args.owned.iter().copied().collect();

    let mut levels = Vec::with_capacity(args.count as usize);
    for level in (args.level..).take(args.count as usize) {
        let ctx = GenerationContext {
            level,
            difficulty: args.difficulty,
            multiplayer: args.multiplayer,
            inventory: inventory.clone(),
        };
        levels.push(generator.generate(&ctx, &mut rng, &mut arena)?);
    }

    if args.json {
        let report = Report {
            seed,
            final_state: rng.state(),
            levels: &levels,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for level in &levels {
        print_level(level, generator.config());
        println!();
    }
    println!("seed: {seed}, final state: {}", rng.state());
    Ok(())
}

/// Glyph for whatever stands on `tile`, if anything.
fn occupant_glyph(level: &GeneratedLevel, tile: MapCoord) -> Option<char> {
    if level.player.tile == tile {
        return Some('@');
    }
    if level.exit.is_some_and(|exit| exit.tile == tile) {
        return Some('>');
    }
    if level.enclave.as_ref().is_some_and(|e| e.center == tile) {
        return Some('T');
    }
    let population = &level.population;
    let at = |position: bj_core::map::WorldPosition| position.to_map_coord() == tile;
    if population.enemies.iter().any(|e| at(e.position)) {
        Some('e')
    } else if population.chests.iter().any(|c| at(c.position)) {
        Some('$')
    } else if population.items.iter().any(|i| at(i.position)) {
        Some('*')
    } else if population.scenery.iter().any(|s| at(s.position)) {
        Some('&')
    } else {
        None
    }
}

fn print_level(level: &GeneratedLevel, config: &GenConfig) {
    let grid = &level.grid;
    println!(
        "level {} ({} floor tiles, {} enemies, {} items, {} chests{})",
        level.level,
        level.floor_count(&config.legend),
        level.population.enemies.len(),
        level.population.items.len(),
        level.population.chests.len(),
        if level.regenerations > 0 {
            format!(", {} regenerations", level.regenerations)
        } else {
            String::new()
        }
    );
    if let Some(enclave) = &level.enclave {
        let stock: Vec<String> = enclave.stock.iter().map(ToString::to_string).collect();
        println!("enclave at {},{}: {}", enclave.center.x, enclave.center.y, stock.join(", "));
    }

    for y in 0..grid.height() {
        let row: String = (0..grid.width())
            .map(|x| {
                let tile = MapCoord::new(x, y);
                occupant_glyph(level, tile).unwrap_or_else(|| {
                    match config.legend.classify(grid.get_at(tile)) {
                        TileClass::Wall => ' ',
                        TileClass::Edge => '+',
                        TileClass::Center => '.',
                    }
                })
            })
            .collect();
        println!("{}", row.trim_end());
    }
}
