#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn controller that sequences a player tap through the resolve cycle.
//!
//! A [`Session`] owns the world, every pure system and the random source. It
//! accepts taps only while [`TurnState::Idle`], routes them to matching or the
//! rocket system, then cascades gravity, refill and hint recomputation before
//! returning to idle. Every event produced along the way is appended to the
//! caller's buffer in the order it happened.

use log::{debug, warn};
use rand::Rng;
use thiserror::Error;
use tile_blast_core::{
    CellCoord, Command, Event, RocketAxis, Rules, RulesError, TileKind, TurnState,
};
use tile_blast_system_gravity::Gravity;
use tile_blast_system_hints::Hints;
use tile_blast_system_matching::{plan_blast, MatchFinder};
use tile_blast_system_rockets::{creation_command, Rockets};
use tile_blast_system_spawning::{Config as SpawningConfig, Spawning};
use tile_blast_world::{self as world, query, World};

/// Errors reported when a tap cannot be accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum TurnError {
    /// A tap arrived while the previous turn was still resolving.
    #[error("cannot accept a tap while {state:?}")]
    IllegalTransition {
        /// Phase that rejected the tap.
        state: TurnState,
    },
}

/// Why a tap was accepted but changed nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The cell was empty or outside the grid.
    EmptyCell,
    /// The cell holds an obstacle.
    NotTappable,
    /// The tapped group is below the match threshold.
    GroupTooSmall {
        /// Size of the tapped group.
        size: usize,
    },
}

/// Result of an accepted tap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Nothing happened.
    Ignored(IgnoreReason),
    /// A group was cleared and the grid settled.
    Cleared {
        /// Number of pieces removed.
        removed: usize,
        /// Axis of the rocket created at the tapped cell, if any.
        rocket: Option<RocketAxis>,
    },
    /// A rocket split; its halves are in flight until [`Session::advance`]
    /// retires them.
    RocketTriggered,
}

/// Owns the world and drives every system through one player action at a time.
#[derive(Debug)]
pub struct Session<R> {
    world: World,
    rules: Rules,
    rng: R,
    state: TurnState,
    matcher: MatchFinder,
    gravity: Gravity,
    spawning: Spawning,
    rockets: Rockets,
    hints: Hints,
    commands: Vec<Command>,
}

impl<R> Session<R>
where
    R: Rng,
{
    /// Starts a session over `world` and computes the initial hints.
    pub fn new(
        world: World,
        rules: Rules,
        rng: R,
        out_events: &mut Vec<Event>,
    ) -> Result<Self, RulesError> {
        rules.validate()?;

        let mut session = Self {
            world,
            rules,
            rng,
            state: TurnState::Idle,
            matcher: MatchFinder::new(),
            gravity: Gravity::new(),
            spawning: Spawning::default(),
            rockets: Rockets::new(),
            hints: Hints::new(),
            commands: Vec::new(),
        };
        session.refresh_hints(out_events);
        Ok(session)
    }

    /// Replaces the refill palette.
    #[must_use]
    pub fn with_spawning(mut self, config: SpawningConfig) -> Self {
        self.spawning = Spawning::new(config);
        self
    }

    /// Read-only access to the world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Current phase of the turn state machine.
    #[must_use]
    pub fn state(&self) -> TurnState {
        self.state
    }

    /// Thresholds in effect for the session.
    #[must_use]
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Number of rocket halves still travelling.
    #[must_use]
    pub fn halves_in_flight(&self) -> usize {
        self.rockets.in_flight()
    }

    /// Handles a player tap on `cell`.
    ///
    /// Piece taps resolve synchronously and return with the session idle.
    /// Rocket taps leave the session cascading with halves in flight.
    pub fn trigger(
        &mut self,
        cell: CellCoord,
        out_events: &mut Vec<Event>,
    ) -> Result<TurnOutcome, TurnError> {
        if self.state != TurnState::Idle {
            warn!("rejecting tap at {:?} while {:?}", cell, self.state);
            out_events.push(Event::TriggerRejected {
                cell,
                state: self.state,
            });
            return Err(TurnError::IllegalTransition { state: self.state });
        }

        let Some(tile) = query::tile_at(&self.world, cell) else {
            return Ok(TurnOutcome::Ignored(IgnoreReason::EmptyCell));
        };

        match tile.kind {
            TileKind::Piece { .. } => Ok(self.resolve_piece(cell, out_events)),
            TileKind::Rocket { .. } => {
                self.transition(TurnState::Resolving, out_events);
                self.commands.push(Command::SplitRocket { cell });
                let first = out_events.len();
                self.pump(out_events);

                let mut launched = Vec::new();
                self.rockets.handle(&out_events[first..], &mut launched);
                out_events.extend(launched);

                self.transition(TurnState::Cascading, out_events);
                if self.rockets.is_idle() {
                    self.cascade(out_events);
                }
                Ok(TurnOutcome::RocketTriggered)
            }
            TileKind::Box | TileKind::Stone | TileKind::Vase => {
                Ok(TurnOutcome::Ignored(IgnoreReason::NotTappable))
            }
        }
    }

    /// Advances every travelling half by one cell.
    ///
    /// When the last half leaves the grid the cascade runs and the session
    /// returns to idle. Does nothing unless halves are in flight.
    pub fn advance(&mut self, out_events: &mut Vec<Event>) -> TurnState {
        if self.state != TurnState::Cascading || self.rockets.is_idle() {
            return self.state;
        }

        let view = query::grid_view(&self.world);
        let _ = self.rockets.advance(&view, &mut self.commands, out_events);
        self.pump(out_events);

        if self.rockets.is_idle() {
            self.cascade(out_events);
        }
        self.state
    }

    /// Advances until the session is idle, returning the number of steps taken.
    pub fn settle(&mut self, out_events: &mut Vec<Event>) -> usize {
        let mut steps = 0;
        while self.state != TurnState::Idle && !self.rockets.is_idle() {
            let _ = self.advance(out_events);
            steps += 1;
        }
        steps
    }

    /// Ends the session, dropping in-flight halves without touching the grid.
    #[must_use]
    pub fn teardown(mut self) -> World {
        let cancelled = self.rockets.cancel();
        if cancelled > 0 {
            debug!("teardown cancelled {cancelled} rocket halves");
        }
        self.world
    }

    fn resolve_piece(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) -> TurnOutcome {
        let view = query::grid_view(&self.world);
        let Some(group) = self.matcher.group_at(&view, cell) else {
            return TurnOutcome::Ignored(IgnoreReason::EmptyCell);
        };
        if group.len() < self.rules.match_threshold {
            return TurnOutcome::Ignored(IgnoreReason::GroupTooSmall { size: group.len() });
        }

        self.transition(TurnState::Resolving, out_events);
        let view = query::grid_view(&self.world);
        plan_blast(&view, &group, &mut self.commands);
        let creation = creation_command(group.len(), cell, &self.rules, &mut self.rng);
        let rocket = match creation {
            Some(Command::CreateRocket { axis, .. }) => Some(axis),
            _ => None,
        };
        self.commands.extend(creation);
        debug!(
            "clearing {} {:?} pieces from {:?}",
            group.len(),
            group.color(),
            cell
        );
        self.pump(out_events);

        self.transition(TurnState::Cascading, out_events);
        self.cascade(out_events);
        TurnOutcome::Cleared {
            removed: group.len(),
            rocket,
        }
    }

    fn cascade(&mut self, out_events: &mut Vec<Event>) {
        let view = query::grid_view(&self.world);
        self.gravity.handle(&view, &mut self.commands);
        self.pump(out_events);

        let view = query::grid_view(&self.world);
        self.spawning
            .handle(&view, &mut self.rng, &mut self.commands);
        self.pump(out_events);

        self.refresh_hints(out_events);
        self.transition(TurnState::Idle, out_events);
    }

    fn refresh_hints(&mut self, out_events: &mut Vec<Event>) {
        let view = query::grid_view(&self.world);
        self.hints
            .handle(&view, self.rules.hint_threshold, &mut self.commands);
        self.pump(out_events);
    }

    fn pump(&mut self, out_events: &mut Vec<Event>) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, out_events);
        }
    }

    fn transition(&mut self, to: TurnState, out_events: &mut Vec<Event>) {
        if self.state == to {
            return;
        }
        debug!("turn state {:?} -> {:?}", self.state, to);
        out_events.push(Event::TurnStateChanged {
            from: self.state,
            to,
        });
        self.state = to;
    }
}
