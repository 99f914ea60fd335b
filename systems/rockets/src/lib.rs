#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Rocket creation and rocket-half propagation.
//!
//! Rockets are created in place of large cleared groups and split into two
//! halves when tapped. Halves are projectiles owned by this system rather than
//! grid tiles: each step moves a half one cell along its direction and, when
//! the new cell holds a tile captured in the split snapshot, emits a single
//! rocket hit against it. A half is destroyed once it leaves the grid.

use std::collections::BTreeSet;

use log::{debug, trace};
use rand::Rng;
use tile_blast_core::{
    CellCoord, Command, DamagePolicy, DamageSource, Direction, Event, GridView, HalfId,
    RocketAxis, Rules, TileId, TileSnapshot,
};

/// Returns the rocket creation command for a cleared group, if it qualifies.
///
/// Groups of at least `rules.rocket_threshold` pieces create a rocket at the
/// tapped cell with an axis chosen uniformly at random.
pub fn creation_command<R>(
    group_size: usize,
    tapped: CellCoord,
    rules: &Rules,
    rng: &mut R,
) -> Option<Command>
where
    R: Rng + ?Sized,
{
    if group_size < rules.rocket_threshold {
        return None;
    }

    let axis = if rng.gen_bool(0.5) {
        RocketAxis::Vertical
    } else {
        RocketAxis::Horizontal
    };
    Some(Command::CreateRocket { cell: tapped, axis })
}

/// Outcome of advancing a single half by one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HalfStep {
    /// The half moved to a new in-bounds cell.
    Moved {
        /// Cell occupied before the step.
        from: CellCoord,
        /// Cell occupied after the step.
        to: CellCoord,
        /// Snapshot tile found at the new cell that is eligible for a hit.
        target: Option<TileId>,
    },
    /// The next cell lies outside the grid; the half is finished.
    Exited {
        /// Last in-bounds cell the half visited.
        last: CellCoord,
    },
}

/// One of the two projectiles produced by a rocket split.
#[derive(Clone, Debug)]
pub struct RocketHalf {
    id: HalfId,
    explosion: u32,
    origin: CellCoord,
    position: CellCoord,
    direction: Direction,
    snapshot: TileSnapshot,
}

impl RocketHalf {
    /// Identifier of the half.
    #[must_use]
    pub const fn id(&self) -> HalfId {
        self.id
    }

    /// Cell the rocket split from.
    #[must_use]
    pub const fn origin(&self) -> CellCoord {
        self.origin
    }

    /// Cell the half currently occupies.
    #[must_use]
    pub const fn position(&self) -> CellCoord {
        self.position
    }

    /// Direction of travel.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Tiles present when the rocket split.
    #[must_use]
    pub fn snapshot(&self) -> &TileSnapshot {
        &self.snapshot
    }

    /// Moves the half one cell along its direction.
    ///
    /// Tiles that were not present when the rocket split are passed over, as
    /// are tiles that can never take damage.
    pub fn advance(&mut self, view: &GridView<'_>) -> HalfStep {
        let next = self
            .position
            .step(self.direction)
            .filter(|cell| view.in_bounds(*cell));
        let Some(next) = next else {
            return HalfStep::Exited {
                last: self.position,
            };
        };

        let from = self.position;
        self.position = next;
        let target = view
            .tile(next)
            .filter(|tile| self.snapshot.contains(tile.id))
            .filter(|tile| tile.kind.capabilities().damage != DamagePolicy::Immune)
            .map(|tile| tile.id);

        HalfStep::Moved {
            from,
            to: next,
            target,
        }
    }
}

/// Tracks every rocket half currently travelling across the grid.
#[derive(Debug, Default)]
pub struct Rockets {
    halves: Vec<RocketHalf>,
    detonated: BTreeSet<(u32, CellCoord)>,
    next_half: u32,
    next_explosion: u32,
}

impl Rockets {
    /// Creates a rocket system with no halves in flight.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Launches halves for every [`Event::RocketSplit`] in `events`.
    ///
    /// Both halves of one split share the snapshot carried by the event.
    pub fn handle(&mut self, events: &[Event], out_events: &mut Vec<Event>) {
        for event in events {
            let Event::RocketSplit {
                cell,
                directions,
                snapshot,
                ..
            } = event
            else {
                continue;
            };

            let explosion = self.next_explosion;
            self.next_explosion = self.next_explosion.wrapping_add(1);
            for direction in directions {
                let id = HalfId::new(self.next_half);
                self.next_half = self.next_half.wrapping_add(1);
                self.halves.push(RocketHalf {
                    id,
                    explosion,
                    origin: *cell,
                    position: *cell,
                    direction: *direction,
                    snapshot: snapshot.clone(),
                });
                out_events.push(Event::RocketHalfLaunched {
                    half: id,
                    origin: *cell,
                    direction: *direction,
                });
            }
            debug!(
                "launched rocket halves from {:?} along {:?}",
                cell, directions
            );
        }
    }

    /// Steps every half in flight by one cell.
    ///
    /// Emits a [`DamageSource::Rocket`] hit for each newly reached snapshot
    /// tile, at most once per cell per explosion, and retires halves that
    /// leave the grid. Returns the number of halves still in flight.
    pub fn advance(
        &mut self,
        view: &GridView<'_>,
        out_commands: &mut Vec<Command>,
        out_events: &mut Vec<Event>,
    ) -> usize {
        let mut index = 0;
        while index < self.halves.len() {
            let half = &mut self.halves[index];
            match half.advance(view) {
                HalfStep::Moved { from, to, target } => {
                    let detonated = target.filter(|_| self.detonated.insert((half.explosion, to)));
                    if let Some(tile) = detonated {
                        trace!("half {} detonates tile {} at {:?}", half.id.get(), tile.get(), to);
                        out_commands.push(Command::DamageTile {
                            cell: to,
                            tile,
                            source: DamageSource::Rocket,
                        });
                    }
                    out_events.push(Event::RocketHalfAdvanced {
                        half: half.id,
                        from,
                        to,
                        detonated,
                    });
                    index += 1;
                }
                HalfStep::Exited { last } => {
                    out_events.push(Event::RocketHalfExited { half: half.id, last });
                    let _ = self.halves.remove(index);
                }
            }
        }

        self.forget_finished_explosions();
        self.halves.len()
    }

    /// Number of halves in flight.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.halves.len()
    }

    /// Reports whether no halves are travelling.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.halves.is_empty()
    }

    /// Halves currently in flight in launch order.
    #[must_use]
    pub fn halves(&self) -> &[RocketHalf] {
        &self.halves
    }

    /// Drops every half in flight without further effects.
    ///
    /// Returns the number of halves cancelled.
    pub fn cancel(&mut self) -> usize {
        let cancelled = self.halves.len();
        self.halves.clear();
        self.detonated.clear();
        cancelled
    }

    fn forget_finished_explosions(&mut self) {
        let halves = &self.halves;
        self.detonated
            .retain(|(explosion, _)| halves.iter().any(|half| half.explosion == *explosion));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
    use tile_blast_core::{PieceColor, Tile, TileKind};

    fn split_event(cell: CellCoord, axis: RocketAxis, snapshot: TileSnapshot) -> Event {
        Event::RocketSplit {
            tile: TileId::new(100),
            cell,
            axis,
            directions: axis.directions(),
            snapshot,
        }
    }

    #[test]
    fn small_groups_create_no_rocket() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let rules = Rules::default();
        assert!(creation_command(3, CellCoord::new(0, 0), &rules, &mut rng).is_none());
        assert!(matches!(
            creation_command(4, CellCoord::new(0, 0), &rules, &mut rng),
            Some(Command::CreateRocket { .. })
        ));
    }

    #[test]
    fn creation_draws_both_axes() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let rules = Rules::default();
        let axes: Vec<RocketAxis> = (0..64)
            .filter_map(|_| creation_command(5, CellCoord::new(1, 1), &rules, &mut rng))
            .filter_map(|command| match command {
                Command::CreateRocket { axis, .. } => Some(axis),
                _ => None,
            })
            .collect();
        assert!(axes.contains(&RocketAxis::Vertical));
        assert!(axes.contains(&RocketAxis::Horizontal));
    }

    #[test]
    fn halves_skip_tiles_missing_from_the_snapshot() {
        let known = Tile::new(
            TileId::new(1),
            TileKind::Piece {
                color: PieceColor::Red,
            },
        );
        let newcomer = Tile::new(TileId::new(2), TileKind::Box);
        let cells = vec![None, Some(newcomer), Some(known)];
        let view = GridView::new(&cells, 3, 1);

        let mut rockets = Rockets::new();
        let mut events = Vec::new();
        rockets.handle(
            &[split_event(
                CellCoord::new(0, 0),
                RocketAxis::Horizontal,
                TileSnapshot::from_ids([known.id]),
            )],
            &mut events,
        );
        assert_eq!(events.len(), 2);
        assert_eq!(rockets.in_flight(), 2);

        let mut commands = Vec::new();
        events.clear();
        assert_eq!(rockets.advance(&view, &mut commands, &mut events), 1);
        assert!(commands.is_empty());

        assert_eq!(rockets.advance(&view, &mut commands, &mut events), 1);
        assert_eq!(
            commands,
            vec![Command::DamageTile {
                cell: CellCoord::new(2, 0),
                tile: known.id,
                source: DamageSource::Rocket,
            }]
        );

        assert_eq!(rockets.advance(&view, &mut commands, &mut events), 0);
        assert!(rockets.is_idle());
    }

    #[test]
    fn rockets_in_the_path_are_not_detonated() {
        let other = Tile::new(
            TileId::new(1),
            TileKind::Rocket {
                axis: RocketAxis::Vertical,
            },
        );
        let cells = vec![None, Some(other)];
        let view = GridView::new(&cells, 1, 2);
        let mut rockets = Rockets::new();
        let mut events = Vec::new();
        rockets.handle(
            &[split_event(
                CellCoord::new(0, 0),
                RocketAxis::Vertical,
                TileSnapshot::from_ids([other.id]),
            )],
            &mut events,
        );
        let mut commands = Vec::new();
        let _ = rockets.advance(&view, &mut commands, &mut events);
        assert!(commands.is_empty());
    }

    #[test]
    fn cancel_drops_halves() {
        let mut rockets = Rockets::new();
        let mut events = Vec::new();
        rockets.handle(
            &[split_event(
                CellCoord::new(0, 0),
                RocketAxis::Vertical,
                TileSnapshot::default(),
            )],
            &mut events,
        );
        assert_eq!(rockets.cancel(), 2);
        assert!(rockets.is_idle());
    }
}
