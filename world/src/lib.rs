#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative grid state for Tile Blast.
//!
//! The world owns every tile and is the only place tiles are created, moved,
//! damaged or removed. Mutations arrive as [`Command`] values through
//! [`apply`]; every observable change is reported as an [`Event`].

use log::{debug, trace, warn};
use rand::Rng;
use tile_blast_core::{
    CellCode, CellCoord, Command, Event, GridView, LevelDescriptor, LevelError, PieceColor,
    RemovalCause, SpecialKind, Tile, TileId, TileKind,
};

/// Represents the authoritative Tile Blast world state.
#[derive(Debug)]
pub struct World {
    grid: TileGrid,
    next_tile_id: u32,
}

impl World {
    /// Builds a world from a level descriptor.
    ///
    /// `rand` cells draw their color from `rng`. A [`Event::TileSpawned`] is
    /// emitted for every placed tile in row-major order.
    pub fn from_level<R>(
        descriptor: &LevelDescriptor,
        rng: &mut R,
        out_events: &mut Vec<Event>,
    ) -> Result<Self, LevelError>
    where
        R: Rng + ?Sized,
    {
        descriptor.validate()?;

        let mut world = Self {
            grid: TileGrid::new(descriptor.grid_width, descriptor.grid_height),
            next_tile_id: 0,
        };

        for (cell, code) in descriptor.cells() {
            let kind = match code {
                CellCode::Piece(color) => TileKind::Piece { color },
                CellCode::RandomPiece => TileKind::Piece {
                    color: random_color(rng),
                },
                CellCode::Box => TileKind::Box,
                CellCode::Stone => TileKind::Stone,
                CellCode::Vase => TileKind::Vase,
                CellCode::Empty => continue,
            };
            let tile = world.place(cell, kind);
            out_events.push(Event::TileSpawned {
                tile: tile.id,
                cell,
                kind,
            });
        }

        debug!(
            "loaded {}x{} level with {} tiles",
            descriptor.grid_width, descriptor.grid_height, world.next_tile_id
        );
        Ok(world)
    }

    fn allocate_id(&mut self) -> TileId {
        let id = TileId::new(self.next_tile_id);
        self.next_tile_id = self.next_tile_id.wrapping_add(1);
        id
    }

    fn place(&mut self, cell: CellCoord, kind: TileKind) -> Tile {
        let tile = Tile::new(self.allocate_id(), kind);
        self.grid.set(cell, Some(tile));
        tile
    }

    /// Takes the tile at `cell` when it matches `expected`.
    fn take_expected(&mut self, cell: CellCoord, expected: TileId) -> Option<Tile> {
        match self.grid.get(cell) {
            Some(tile) if tile.id == expected => self.grid.take(cell),
            other => {
                warn!(
                    "ignoring stale command for tile {} at {:?}: cell holds {:?}",
                    expected.get(),
                    cell,
                    other.map(|tile| tile.id)
                );
                None
            }
        }
    }
}

/// Draws a uniformly random piece color.
pub fn random_color<R>(rng: &mut R) -> PieceColor
where
    R: Rng + ?Sized,
{
    PieceColor::from_index(rng.gen_range(0..PieceColor::ALL.len()))
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    trace!("applying {command:?}");
    match command {
        Command::RemoveTile { cell, tile, cause } => {
            if let Some(removed) = world.take_expected(cell, tile) {
                trace!("removed tile {} at {:?} ({:?})", tile.get(), cell, cause);
                out_events.push(Event::TileRemoved {
                    tile,
                    cell,
                    kind: removed.kind,
                    cause,
                });
            }
        }
        Command::DamageTile { cell, tile, source } => {
            let Some(mut target) = world.grid.get(cell).filter(|current| current.id == tile) else {
                warn!(
                    "ignoring damage for tile {} at {:?}: tile is gone",
                    tile.get(),
                    cell
                );
                return;
            };

            if !target.kind.capabilities().damage.accepts(source) {
                trace!("tile {} at {:?} ignores {:?}", tile.get(), cell, source);
                return;
            }

            target.health = target.health.saturating_sub(1);
            if target.health == 0 {
                let _ = world.grid.take(cell);
                out_events.push(Event::TileRemoved {
                    tile,
                    cell,
                    kind: target.kind,
                    cause: RemovalCause::Damaged { source },
                });
            } else {
                world.grid.set(cell, Some(target));
                out_events.push(Event::TileDamaged {
                    tile,
                    cell,
                    health: target.health,
                });
            }
        }
        Command::MoveTile { tile, from, to } => {
            let Some(moving) = world.grid.get(from).filter(|current| current.id == tile) else {
                warn!("ignoring move of tile {}: not at {:?}", tile.get(), from);
                return;
            };
            if !moving.can_fall() {
                warn!("ignoring move of immovable tile {} at {:?}", tile.get(), from);
                return;
            }
            if !world.grid.is_vacant(to) {
                warn!("ignoring move of tile {} into unavailable {:?}", tile.get(), to);
                return;
            }

            let _ = world.grid.take(from);
            world.grid.set(to, Some(moving));
            out_events.push(Event::TileMoved { tile, from, to });
        }
        Command::SpawnPiece { cell, color } => {
            if !world.grid.is_vacant(cell) {
                warn!("ignoring spawn into unavailable {:?}", cell);
                return;
            }
            let kind = TileKind::Piece { color };
            let tile = world.place(cell, kind);
            out_events.push(Event::TileSpawned {
                tile: tile.id,
                cell,
                kind,
            });
        }
        Command::CreateRocket { cell, axis } => {
            if !world.grid.is_vacant(cell) {
                warn!("ignoring rocket creation into unavailable {:?}", cell);
                return;
            }
            let tile = world.place(cell, TileKind::Rocket { axis });
            debug!("created {:?} rocket {} at {:?}", axis, tile.id.get(), cell);
            out_events.push(Event::SpecialItemCreated {
                tile: tile.id,
                kind: SpecialKind::Rocket,
                cell,
                axis,
            });
        }
        Command::SplitRocket { cell } => {
            let Some(rocket) = world.grid.get(cell) else {
                warn!("ignoring split of empty {:?}", cell);
                return;
            };
            let TileKind::Rocket { axis } = rocket.kind else {
                warn!("ignoring split of non-rocket tile {} at {:?}", rocket.id.get(), cell);
                return;
            };

            let snapshot = world.grid.view().snapshot();
            let _ = world.grid.take(cell);
            debug!(
                "rocket {} split at {:?} with {} tiles in snapshot",
                rocket.id.get(),
                cell,
                snapshot.len()
            );
            out_events.push(Event::TileRemoved {
                tile: rocket.id,
                cell,
                kind: rocket.kind,
                cause: RemovalCause::Split,
            });
            out_events.push(Event::RocketSplit {
                tile: rocket.id,
                cell,
                axis,
                directions: axis.directions(),
                snapshot,
            });
        }
        Command::SetHints { mut tiles } => {
            tiles.sort_unstable();
            let mut changed = false;
            let mut hinted = Vec::new();
            for slot in world.grid.cells.iter_mut() {
                let Some(tile) = slot.as_mut() else {
                    continue;
                };
                let wanted = tile.kind.capabilities().matchable && tiles.binary_search(&tile.id).is_ok();
                if tile.hinted != wanted {
                    tile.hinted = wanted;
                    changed = true;
                }
                if wanted {
                    hinted.push(tile.id);
                }
            }

            if changed {
                hinted.sort_unstable();
                out_events.push(Event::HintsChanged { hinted });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use tile_blast_core::{CellCoord, GridView, Tile};

    /// Exposes a read-only view of the dense tile grid.
    #[must_use]
    pub fn grid_view(world: &World) -> GridView<'_> {
        world.grid.view()
    }

    /// Returns the tile occupying the provided cell, if any.
    #[must_use]
    pub fn tile_at(world: &World, cell: CellCoord) -> Option<Tile> {
        world.grid.get(cell)
    }

    /// Provides the grid dimensions as `(columns, rows)`.
    #[must_use]
    pub fn dimensions(world: &World) -> (u32, u32) {
        (world.grid.columns, world.grid.rows)
    }

    /// Reports whether the coordinate lies inside the grid.
    #[must_use]
    pub fn in_bounds(world: &World, cell: CellCoord) -> bool {
        world.grid.index(cell).is_some()
    }
}

#[derive(Clone, Debug)]
struct TileGrid {
    columns: u32,
    rows: u32,
    cells: Vec<Option<Tile>>,
}

impl TileGrid {
    fn new(columns: u32, rows: u32) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows,
            cells: vec![None; capacity],
        }
    }

    fn view(&self) -> GridView<'_> {
        GridView::new(&self.cells, self.columns, self.rows)
    }

    fn get(&self, cell: CellCoord) -> Option<Tile> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied().flatten())
    }

    fn set(&mut self, cell: CellCoord, tile: Option<Tile>) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = tile;
            }
        }
    }

    fn take(&mut self, cell: CellCoord) -> Option<Tile> {
        self.index(cell)
            .and_then(|index| self.cells.get_mut(index))
            .and_then(Option::take)
    }

    fn is_vacant(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .and_then(|index| self.cells.get(index))
            .map_or(false, Option::is_none)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use tile_blast_core::{DamageSource, RocketAxis};

    fn level(width: u32, height: u32, codes: &[&str]) -> LevelDescriptor {
        LevelDescriptor {
            grid_width: width,
            grid_height: height,
            grid: codes.iter().map(|code| (*code).to_owned()).collect(),
        }
    }

    fn load(width: u32, height: u32, codes: &[&str]) -> World {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut events = Vec::new();
        World::from_level(&level(width, height, codes), &mut rng, &mut events).expect("level")
    }

    #[test]
    fn from_level_places_tiles_row_major_from_the_bottom() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut events = Vec::new();
        let world = World::from_level(
            &level(2, 2, &["r", "bo", "x", "v"]),
            &mut rng,
            &mut events,
        )
        .expect("level");

        assert_eq!(events.len(), 3);
        assert_eq!(
            query::tile_at(&world, CellCoord::new(0, 0)).map(|tile| tile.kind),
            Some(TileKind::Piece {
                color: PieceColor::Red
            })
        );
        assert_eq!(
            query::tile_at(&world, CellCoord::new(1, 0)).map(|tile| tile.kind),
            Some(TileKind::Box)
        );
        assert!(query::tile_at(&world, CellCoord::new(0, 1)).is_none());
        assert_eq!(
            query::tile_at(&world, CellCoord::new(1, 1)).map(|tile| tile.health),
            Some(2)
        );
    }

    #[test]
    fn from_level_rejects_bad_descriptors() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut events = Vec::new();
        let result = World::from_level(&level(2, 2, &["r"]), &mut rng, &mut events);
        assert!(matches!(result, Err(LevelError::CellCountMismatch { .. })));
        assert!(events.is_empty());
    }

    #[test]
    fn random_pieces_follow_the_seed() {
        let codes = ["rand"; 9];
        let first = load(3, 3, &codes);
        let second = load(3, 3, &codes);
        let kinds = |world: &World| -> Vec<TileKind> {
            query::grid_view(world).tiles().map(|(_, tile)| tile.kind).collect()
        };
        assert_eq!(kinds(&first), kinds(&second));
    }

    #[test]
    fn stone_ignores_blast_damage() {
        let mut world = load(1, 1, &["s"]);
        let stone = query::tile_at(&world, CellCoord::new(0, 0)).expect("stone");
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::DamageTile {
                cell: CellCoord::new(0, 0),
                tile: stone.id,
                source: DamageSource::Blast,
            },
            &mut events,
        );

        assert!(events.is_empty());
        assert!(query::tile_at(&world, CellCoord::new(0, 0)).is_some());
    }

    #[test]
    fn vase_cracks_then_breaks() {
        let mut world = load(1, 1, &["v"]);
        let cell = CellCoord::new(0, 0);
        let vase = query::tile_at(&world, cell).expect("vase");
        let mut events = Vec::new();
        let hit = Command::DamageTile {
            cell,
            tile: vase.id,
            source: DamageSource::Blast,
        };

        apply(&mut world, hit.clone(), &mut events);
        assert_eq!(
            events,
            vec![Event::TileDamaged {
                tile: vase.id,
                cell,
                health: 1
            }]
        );
        assert!(query::tile_at(&world, cell).map_or(false, |tile| tile.is_cracked()));

        events.clear();
        apply(&mut world, hit, &mut events);
        assert_eq!(
            events,
            vec![Event::TileRemoved {
                tile: vase.id,
                cell,
                kind: TileKind::Vase,
                cause: RemovalCause::Damaged {
                    source: DamageSource::Blast
                },
            }]
        );
        assert!(query::tile_at(&world, cell).is_none());
    }

    #[test]
    fn stale_commands_are_ignored() {
        let mut world = load(1, 1, &["r"]);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::RemoveTile {
                cell: CellCoord::new(0, 0),
                tile: TileId::new(99),
                cause: RemovalCause::Matched,
            },
            &mut events,
        );
        assert!(events.is_empty());
        assert!(query::tile_at(&world, CellCoord::new(0, 0)).is_some());
    }

    #[test]
    fn out_of_bounds_commands_do_nothing() {
        let mut world = load(1, 1, &["x"]);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnPiece {
                cell: CellCoord::new(4, 4),
                color: PieceColor::Blue,
            },
            &mut events,
        );
        assert!(events.is_empty());
        assert!(!query::in_bounds(&world, CellCoord::new(4, 4)));
        assert_eq!(query::grid_view(&world).empty_count(), 1);
    }

    #[test]
    fn immovable_tiles_refuse_to_move() {
        let mut world = load(1, 2, &["x", "bo"]);
        let crate_tile = query::tile_at(&world, CellCoord::new(0, 1)).expect("box");
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::MoveTile {
                tile: crate_tile.id,
                from: CellCoord::new(0, 1),
                to: CellCoord::new(0, 0),
            },
            &mut events,
        );
        assert!(events.is_empty());
        assert!(query::tile_at(&world, CellCoord::new(0, 0)).is_none());
    }

    #[test]
    fn split_snapshots_tiles_before_removing_the_rocket() {
        let mut world = load(2, 1, &["x", "g"]);
        let cell = CellCoord::new(0, 0);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::CreateRocket {
                cell,
                axis: RocketAxis::Horizontal,
            },
            &mut events,
        );
        let rocket = query::tile_at(&world, cell).expect("rocket");
        events.clear();

        apply(&mut world, Command::SplitRocket { cell }, &mut events);

        assert!(query::tile_at(&world, cell).is_none());
        let Some(Event::RocketSplit {
            snapshot,
            directions,
            ..
        }) = events.last()
        else {
            panic!("expected a split event, got {events:?}");
        };
        assert!(snapshot.contains(rocket.id));
        assert_eq!(snapshot.len(), 2);
        assert_eq!(directions, &RocketAxis::Horizontal.directions());
    }

    #[test]
    fn hints_only_report_changes() {
        let mut world = load(2, 1, &["r", "r"]);
        let ids: Vec<TileId> = query::grid_view(&world)
            .tiles()
            .map(|(_, tile)| tile.id)
            .collect();
        let mut events = Vec::new();

        apply(&mut world, Command::SetHints { tiles: ids.clone() }, &mut events);
        assert_eq!(events, vec![Event::HintsChanged { hinted: ids.clone() }]);

        events.clear();
        apply(&mut world, Command::SetHints { tiles: ids }, &mut events);
        assert!(events.is_empty());

        apply(&mut world, Command::SetHints { tiles: Vec::new() }, &mut events);
        assert_eq!(events, vec![Event::HintsChanged { hinted: Vec::new() }]);
        assert!(query::grid_view(&world).tiles().all(|(_, tile)| !tile.hinted));
    }
}
