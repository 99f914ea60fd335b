use std::collections::BTreeSet;

use proptest::prelude::*;
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
use tile_blast_core::{
    CellCoord, Command, Event, LevelDescriptor, RocketAxis, TileId, TileSnapshot,
};
use tile_blast_system_rockets::Rockets;
use tile_blast_world::{self as world, query, World};

fn world_from(width: u32, height: u32, codes: &[&str]) -> World {
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let mut events = Vec::new();
    let level = LevelDescriptor {
        grid_width: width,
        grid_height: height,
        grid: codes.iter().map(|code| (*code).to_owned()).collect(),
    };
    World::from_level(&level, &mut rng, &mut events).expect("level")
}

/// Splits a rocket at `cell` and flies its halves to completion, spawning a
/// fresh piece into every emptied cell after each step.
fn fly(world: &mut World, cell: CellCoord, axis: RocketAxis) -> (TileSnapshot, Vec<(CellCoord, TileId)>) {
    let mut events = Vec::new();
    if let Some(tile) = query::tile_at(world, cell) {
        world::apply(
            world,
            Command::RemoveTile {
                cell,
                tile: tile.id,
                cause: tile_blast_core::RemovalCause::Matched,
            },
            &mut events,
        );
    }
    world::apply(world, Command::CreateRocket { cell, axis }, &mut events);
    events.clear();
    world::apply(world, Command::SplitRocket { cell }, &mut events);

    let snapshot = events
        .iter()
        .find_map(|event| match event {
            Event::RocketSplit { snapshot, .. } => Some(snapshot.clone()),
            _ => None,
        })
        .expect("split event");

    let mut rockets = Rockets::new();
    let mut launched = Vec::new();
    rockets.handle(&events, &mut launched);

    let mut detonations = Vec::new();
    while !rockets.is_idle() {
        let mut commands = Vec::new();
        let mut step_events = Vec::new();
        let _ = rockets.advance(&query::grid_view(world), &mut commands, &mut step_events);
        for event in &step_events {
            if let Event::RocketHalfAdvanced {
                to,
                detonated: Some(tile),
                ..
            } = event
            {
                detonations.push((*to, *tile));
            }
        }
        let mut applied = Vec::new();
        for command in commands {
            world::apply(world, command, &mut applied);
        }
        for applied_event in applied {
            if let Event::TileRemoved { cell, .. } = applied_event {
                let mut spawned = Vec::new();
                world::apply(
                    world,
                    Command::SpawnPiece {
                        cell,
                        color: tile_blast_core::PieceColor::Red,
                    },
                    &mut spawned,
                );
            }
        }
    }

    (snapshot, detonations)
}

#[test]
fn halves_sweep_the_whole_row() {
    let mut world = world_from(5, 1, &["r", "g", "x", "bo", "s"]);
    let (_, detonations) = fly(&mut world, CellCoord::new(2, 0), RocketAxis::Horizontal);

    let cells: BTreeSet<CellCoord> = detonations.iter().map(|(cell, _)| *cell).collect();
    let expected: BTreeSet<CellCoord> = [0, 1, 3, 4]
        .into_iter()
        .map(|column| CellCoord::new(column, 0))
        .collect();
    assert_eq!(cells, expected);
}

#[test]
fn both_halves_share_one_snapshot() {
    let mut world = world_from(3, 1, &["r", "x", "r"]);
    let cell = CellCoord::new(1, 0);
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::CreateRocket {
            cell,
            axis: RocketAxis::Vertical,
        },
        &mut events,
    );
    events.clear();
    world::apply(&mut world, Command::SplitRocket { cell }, &mut events);

    let mut rockets = Rockets::new();
    let mut launched = Vec::new();
    rockets.handle(&events, &mut launched);

    assert_eq!(launched.len(), 2);
    let halves = rockets.halves();
    assert_eq!(halves.len(), 2);
    assert_eq!(halves[0].origin(), cell);
    assert_eq!(halves[0].direction(), halves[1].direction().opposite());
    assert!(halves[0].snapshot().shares_allocation(halves[1].snapshot()));
    assert_eq!(halves[0].snapshot().len(), 3);
}

proptest! {
    #[test]
    fn detonations_are_unique_and_within_snapshot(
        width in 1u32..8,
        height in 1u32..8,
        codes in proptest::collection::vec(
            prop_oneof![Just("r"), Just("g"), Just("x"), Just("bo"), Just("s"), Just("v")],
            49,
        ),
        column in 0u32..8,
        row in 0u32..8,
        vertical in any::<bool>(),
    ) {
        let count = (width * height) as usize;
        let mut world = world_from(width, height, &codes[..count]);
        let cell = CellCoord::new(column % width, row % height);
        let axis = if vertical { RocketAxis::Vertical } else { RocketAxis::Horizontal };

        let (snapshot, detonations) = fly(&mut world, cell, axis);

        let mut seen = BTreeSet::new();
        for (cell, tile) in &detonations {
            prop_assert!(seen.insert(*cell), "cell {:?} detonated twice", cell);
            prop_assert!(snapshot.contains(*tile));
        }
    }
}
