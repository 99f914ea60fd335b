#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that replays scripted taps against a Tile Blast level.

mod script;

use std::{fs, path::Path, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tile_blast_core::{Event, LevelDescriptor, PieceColor, Rules};
use tile_blast_rendering::{render_text, GridLayout, Scene};
use tile_blast_system_spawning::Config as SpawningConfig;
use tile_blast_system_turn::{Session, TurnOutcome};
use tile_blast_world::{query, World};

use crate::script::{parse_tap, Tap};

/// Replays taps against a Tile Blast level and prints each settled frame.
#[derive(Debug, Parser)]
#[command(
    name = "tile-blast",
    version,
    about = "Replays scripted taps against a Tile Blast level and prints the grid after each turn."
)]
struct Args {
    /// Level JSON file with `grid_width`, `grid_height` and a row-major `grid` of cell codes.
    #[arg(short, long, value_name = "FILE")]
    level: PathBuf,

    /// TOML file overriding `match_threshold`, `rocket_threshold` and `hint_threshold`.
    #[arg(short, long, value_name = "FILE")]
    rules: Option<PathBuf>,

    /// Seed for random piece colors and rocket axes.
    #[arg(short, long, default_value = "0")]
    seed: u64,

    /// Tap to replay, `column,row` for a cell or `@x,y` for a world-space point. Repeatable.
    #[arg(short, long = "tap", value_name = "TAP", value_parser = parse_tap)]
    taps: Vec<Tap>,

    /// Number of piece colors used when refilling, drawn from red, green, blue, yellow.
    #[arg(short, long, default_value = "4", value_parser = clap::value_parser!(u8).range(1..=4))]
    colors: u8,

    /// Padding around the grid when sizing the background panel in the JSON scene.
    #[arg(long, default_value = "20", value_name = "UNITS")]
    padding: f32,

    /// Print a JSON summary with the final scene instead of text frames.
    #[arg(long)]
    json: bool,
}

/// Aggregate results printed with `--json`.
#[derive(Debug, Default, Serialize)]
struct Summary {
    seed: u64,
    taps: usize,
    cleared_pieces: usize,
    rockets_created: usize,
    rockets_triggered: usize,
    ignored: usize,
    rejected: usize,
    missed: usize,
    frame: Vec<String>,
    scene: SceneDump,
}

/// World-space description of the final grid.
#[derive(Debug, Default, Serialize)]
struct SceneDump {
    background: [f32; 2],
    tiles: Vec<TileDump>,
}

#[derive(Debug, Serialize)]
struct TileDump {
    id: u32,
    kind: String,
    position: [f32; 2],
    rgba: [f32; 4],
    hinted: bool,
}

impl SceneDump {
    fn capture(scene: &Scene, padding: f32) -> Self {
        let background = scene.layout.background_size(padding);
        let tiles = scene
            .tiles
            .iter()
            .map(|tile| TileDump {
                id: tile.tile.get(),
                kind: format!("{:?}", tile.kind),
                position: tile.position.to_array(),
                rgba: [
                    tile.color.red,
                    tile.color.green,
                    tile.color.blue,
                    tile.color.alpha,
                ],
                hinted: tile.hinted,
            })
            .collect();
        Self {
            background: background.to_array(),
            tiles,
        }
    }
}

impl Summary {
    fn record(&mut self, outcome: TurnOutcome) {
        match outcome {
            TurnOutcome::Ignored(_) => self.ignored += 1,
            TurnOutcome::Cleared { removed, rocket } => {
                self.cleared_pieces += removed;
                self.rockets_created += usize::from(rocket.is_some());
            }
            TurnOutcome::RocketTriggered => self.rockets_triggered += 1,
        }
    }
}

/// Entry point for the Tile Blast command-line interface.
fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let level = load_level(&args.level)?;
    let rules = match args.rules.as_deref() {
        Some(path) => load_rules(path)?,
        None => Rules::default(),
    };

    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut events = Vec::new();
    let world = World::from_level(&level, &mut rng, &mut events)
        .with_context(|| format!("level {} is malformed", args.level.display()))?;
    let palette: &'static [PieceColor] = &PieceColor::ALL;
    let mut session = Session::new(world, rules, rng, &mut events)
        .context("invalid rules")?
        .with_spawning(SpawningConfig::new(&palette[..usize::from(args.colors)]));
    log_events(&mut events);

    let layout = GridLayout::with_defaults(level.grid_width, level.grid_height);
    let mut summary = Summary {
        seed: args.seed,
        taps: args.taps.len(),
        ..Summary::default()
    };

    if !args.json {
        print_frame("initial", session.world());
    }

    for tap in &args.taps {
        let Some(cell) = tap.resolve(&layout) else {
            warn!("tap {tap} misses the grid");
            summary.missed += 1;
            continue;
        };

        match session.trigger(cell, &mut events) {
            Ok(outcome) => {
                info!("tap {tap}: {outcome:?}");
                summary.record(outcome);
            }
            Err(error) => {
                warn!("tap {tap}: {error}");
                summary.rejected += 1;
            }
        }

        let steps = session.settle(&mut events);
        debug!("settled after {steps} rocket steps");
        log_events(&mut events);

        if !args.json {
            print_frame(&format!("tap {tap}"), session.world());
        }
    }

    let world = session.teardown();
    if args.json {
        let view = query::grid_view(&world);
        summary.frame = render_text(&view).lines().map(str::to_owned).collect();
        summary.scene = SceneDump::capture(&Scene::from_view(&view, layout), args.padding);
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("failed to encode summary")?
        );
    }

    Ok(())
}

fn load_level(path: &Path) -> Result<LevelDescriptor> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read level file {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse level json {}", path.display()))
}

fn load_rules(path: &Path) -> Result<Rules> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read rules file {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("failed to parse rules toml {}", path.display()))
}

fn log_events(events: &mut Vec<Event>) {
    for event in events.drain(..) {
        debug!("{event:?}");
    }
}

fn print_frame(label: &str, world: &World) {
    println!("== {label}");
    print!("{}", render_text(&query::grid_view(world)));
}
