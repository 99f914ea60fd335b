#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tile Blast engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Systems read a [`GridView`] and
//! submit [`Command`] values describing desired mutations, the world executes
//! those commands via its `apply` entry point, and then broadcasts [`Event`]
//! values that presentation layers observe. Nothing in the core depends on
//! wall-clock time: every mutation is final the instant `apply` returns.

use std::{collections::BTreeSet, sync::Arc};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Health assigned to a freshly placed vase.
pub const VASE_HEALTH: u8 = 2;

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Row zero is the bottom row; gravity pulls tiles towards lower rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell, counted from the bottom.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Returns the neighbouring coordinate in the provided direction.
    ///
    /// Yields `None` when the step would underflow below column or row zero.
    /// Upper bounds are not checked here; views treat those cells as empty.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<Self> {
        match direction {
            Direction::Up => self.row.checked_add(1).map(|row| Self::new(self.column, row)),
            Direction::Down => self.row.checked_sub(1).map(|row| Self::new(self.column, row)),
            Direction::Left => self
                .column
                .checked_sub(1)
                .map(|column| Self::new(column, self.row)),
            Direction::Right => self
                .column
                .checked_add(1)
                .map(|column| Self::new(column, self.row)),
        }
    }

    /// Iterates the four orthogonal neighbours that do not underflow.
    pub fn neighbors(self) -> impl Iterator<Item = CellCoord> {
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| self.step(direction))
    }
}

/// Unit directions along the grid axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward increasing row indices.
    Up,
    /// Movement toward decreasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// All four directions in a stable order.
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// The four symbolic colors a piece may carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PieceColor {
    /// Level code `r`.
    Red,
    /// Level code `g`.
    Green,
    /// Level code `b`.
    Blue,
    /// Level code `y`.
    Yellow,
}

impl PieceColor {
    /// Every color in palette order. Random draws index into this array.
    pub const ALL: [PieceColor; 4] = [Self::Red, Self::Green, Self::Blue, Self::Yellow];

    /// Maps a palette index back onto a color, wrapping out-of-range values.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }
}

/// Axis along which a rocket propagates once triggered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RocketAxis {
    /// Splits into halves travelling up and down.
    Vertical,
    /// Splits into halves travelling left and right.
    Horizontal,
}

impl RocketAxis {
    /// The two opposite travel directions produced by a split.
    #[must_use]
    pub const fn directions(self) -> [Direction; 2] {
        match self {
            Self::Vertical => [Direction::Up, Direction::Down],
            Self::Horizontal => [Direction::Left, Direction::Right],
        }
    }
}

/// Unique identifier assigned to a tile by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(u32);

impl TileId {
    /// Creates a new tile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a travelling rocket half.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HalfId(u32);

impl HalfId {
    /// Creates a new half identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Origin of a single hit applied to a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageSource {
    /// A plain group clear next to the tile.
    Blast,
    /// A travelling rocket half passing over the tile.
    Rocket,
}

impl DamageSource {
    /// Mirrors the `isFromRocket` flag used by damage policies.
    #[must_use]
    pub const fn is_from_rocket(self) -> bool {
        matches!(self, Self::Rocket)
    }
}

/// Which damage sources a tile reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamagePolicy {
    /// Any hit costs one health point.
    AnySource,
    /// Only rocket hits cost health; blasts are ignored.
    RocketOnly,
    /// The tile never loses health.
    Immune,
}

impl DamagePolicy {
    /// Reports whether a hit from `source` affects the tile.
    #[must_use]
    pub const fn accepts(self, source: DamageSource) -> bool {
        match self {
            Self::AnySource => true,
            Self::RocketOnly => source.is_from_rocket(),
            Self::Immune => false,
        }
    }
}

/// Capability record resolved from a [`TileKind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capabilities {
    /// Whether gravity may move the tile.
    pub can_fall: bool,
    /// Whether a player tap triggers the tile.
    pub tappable: bool,
    /// Whether the tile joins same-color groups.
    pub matchable: bool,
    /// How the tile reacts to hits.
    pub damage: DamagePolicy,
    /// Health assigned on creation.
    pub max_health: u8,
}

/// Every occupant variant a grid cell may hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Matchable colored piece.
    Piece {
        /// Color used for group membership.
        color: PieceColor,
    },
    /// Immovable crate broken by adjacent clears or rockets.
    Box,
    /// Immovable block that only rockets can break.
    Stone,
    /// Falling obstacle that cracks on the first hit and breaks on the second.
    Vase,
    /// Special item that splits into two halves when tapped.
    Rocket {
        /// Axis the halves travel along.
        axis: RocketAxis,
    },
}

impl TileKind {
    /// Resolves the capability table entry for the variant.
    #[must_use]
    pub const fn capabilities(self) -> Capabilities {
        match self {
            Self::Piece { .. } => Capabilities {
                can_fall: true,
                tappable: true,
                matchable: true,
                damage: DamagePolicy::AnySource,
                max_health: 1,
            },
            Self::Box => Capabilities {
                can_fall: false,
                tappable: false,
                matchable: false,
                damage: DamagePolicy::AnySource,
                max_health: 1,
            },
            Self::Stone => Capabilities {
                can_fall: false,
                tappable: false,
                matchable: false,
                damage: DamagePolicy::RocketOnly,
                max_health: 1,
            },
            Self::Vase => Capabilities {
                can_fall: true,
                tappable: false,
                matchable: false,
                damage: DamagePolicy::AnySource,
                max_health: VASE_HEALTH,
            },
            Self::Rocket { .. } => Capabilities {
                can_fall: true,
                tappable: true,
                matchable: false,
                damage: DamagePolicy::Immune,
                max_health: 1,
            },
        }
    }

    /// Color of the tile when it is a piece.
    #[must_use]
    pub const fn color(self) -> Option<PieceColor> {
        match self {
            Self::Piece { color } => Some(color),
            _ => None,
        }
    }

    /// Reports whether the tile is an obstacle (box, stone or vase).
    #[must_use]
    pub const fn is_obstacle(self) -> bool {
        matches!(self, Self::Box | Self::Stone | Self::Vase)
    }

    /// Reports whether the tile is a rocket.
    #[must_use]
    pub const fn is_rocket(self) -> bool {
        matches!(self, Self::Rocket { .. })
    }
}

/// Special items that may be created by large clears.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialKind {
    /// A line-clearing rocket.
    Rocket,
}

/// Live occupant of a grid cell. The cell itself is owned by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    /// Identifier allocated by the world.
    pub id: TileId,
    /// Variant of the tile.
    pub kind: TileKind,
    /// Remaining health points.
    pub health: u8,
    /// Transient display flag set by hint recomputation.
    pub hinted: bool,
}

impl Tile {
    /// Creates a tile at full health with the hint flag cleared.
    #[must_use]
    pub const fn new(id: TileId, kind: TileKind) -> Self {
        Self {
            id,
            kind,
            health: kind.capabilities().max_health,
            hinted: false,
        }
    }

    /// Shortcut for the `can_fall` capability.
    #[must_use]
    pub const fn can_fall(&self) -> bool {
        self.kind.capabilities().can_fall
    }

    /// Reports whether the tile has taken a hit without breaking.
    #[must_use]
    pub const fn is_cracked(&self) -> bool {
        self.health < self.kind.capabilities().max_health
    }
}

/// Frozen set of tiles captured when a rocket splits.
///
/// Both halves of one split share the same allocation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TileSnapshot {
    tiles: Arc<BTreeSet<TileId>>,
}

impl TileSnapshot {
    /// Captures a snapshot from the provided identifiers.
    #[must_use]
    pub fn from_ids<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = TileId>,
    {
        Self {
            tiles: Arc::new(ids.into_iter().collect()),
        }
    }

    /// Reports whether the tile existed when the snapshot was taken.
    #[must_use]
    pub fn contains(&self, tile: TileId) -> bool {
        self.tiles.contains(&tile)
    }

    /// Number of tiles captured.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Reports whether the snapshot captured no tiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Iterates the captured identifiers in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = TileId> + '_ {
        self.tiles.iter().copied()
    }

    /// Reports whether two snapshots share the same allocation.
    #[must_use]
    pub fn shares_allocation(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.tiles, &other.tiles)
    }
}

/// Read-only view into the dense occupancy grid.
///
/// Cells are stored row-major with row zero at the bottom. Out-of-bounds
/// lookups behave like empty cells so callers may probe edges freely.
#[derive(Clone, Copy, Debug)]
pub struct GridView<'a> {
    cells: &'a [Option<Tile>],
    columns: u32,
    rows: u32,
}

impl<'a> GridView<'a> {
    /// Captures a new view backed by the provided cell slice.
    #[must_use]
    pub fn new(cells: &'a [Option<Tile>], columns: u32, rows: u32) -> Self {
        Self {
            cells,
            columns,
            rows,
        }
    }

    /// Provides the dimensions of the underlying grid as `(columns, rows)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Reports whether the coordinate lies inside the grid.
    #[must_use]
    pub const fn in_bounds(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Returns the tile occupying the provided cell, if any.
    #[must_use]
    pub fn tile(&self, cell: CellCoord) -> Option<Tile> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied().flatten())
    }

    /// Reports whether an in-bounds cell holds no tile.
    #[must_use]
    pub fn is_empty(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .map_or(false, |index| self.cells.get(index).map_or(false, Option::is_none))
    }

    /// Iterates every coordinate in row-major order, bottom row first.
    pub fn coords(&self) -> impl Iterator<Item = CellCoord> {
        let columns = self.columns;
        (0..self.rows).flat_map(move |row| (0..columns).map(move |column| CellCoord::new(column, row)))
    }

    /// Iterates every occupied cell together with its tile.
    pub fn tiles(&self) -> impl Iterator<Item = (CellCoord, Tile)> + 'a {
        let columns = self.columns;
        let cells: &'a [Option<Tile>] = self.cells;
        cells
            .iter()
            .enumerate()
            .filter_map(move |(index, slot)| {
                let tile = (*slot)?;
                let index = u32::try_from(index).ok()?;
                Some((CellCoord::new(index % columns, index / columns), tile))
            })
    }

    /// Number of in-bounds cells that hold no tile.
    #[must_use]
    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|slot| slot.is_none()).count()
    }

    /// Captures the identifiers of every tile currently in the grid.
    #[must_use]
    pub fn snapshot(&self) -> TileSnapshot {
        TileSnapshot::from_ids(self.tiles().map(|(_, tile)| tile.id))
    }

    /// Converts a coordinate into a dense slice index.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.in_bounds(cell) {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Why a tile left the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemovalCause {
    /// The tile belonged to a cleared group.
    Matched,
    /// The tile ran out of health after a hit.
    Damaged {
        /// Origin of the final hit.
        source: DamageSource,
    },
    /// A rocket was consumed by its own split.
    Split,
}

/// Phases of the turn state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnState {
    /// Awaiting a tap.
    Idle,
    /// Resolving the tapped tile into clears or a split.
    Resolving,
    /// Running rocket travel, gravity, refill and hint recomputation.
    Cascading,
}

/// Commands that express all permissible grid mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Removes a tile outright.
    RemoveTile {
        /// Cell expected to hold the tile.
        cell: CellCoord,
        /// Tile expected at the cell; stale commands are ignored.
        tile: TileId,
        /// Reason reported to observers.
        cause: RemovalCause,
    },
    /// Applies a single hit to a tile according to its damage policy.
    DamageTile {
        /// Cell expected to hold the tile.
        cell: CellCoord,
        /// Tile expected at the cell; stale commands are ignored.
        tile: TileId,
        /// Origin of the hit.
        source: DamageSource,
    },
    /// Moves a falling tile into an empty cell.
    MoveTile {
        /// Tile being moved.
        tile: TileId,
        /// Cell currently holding the tile.
        from: CellCoord,
        /// Empty destination cell.
        to: CellCoord,
    },
    /// Places a new piece into an empty cell.
    SpawnPiece {
        /// Empty destination cell.
        cell: CellCoord,
        /// Color of the new piece.
        color: PieceColor,
    },
    /// Places a new rocket into an empty cell.
    CreateRocket {
        /// Empty destination cell.
        cell: CellCoord,
        /// Axis of the new rocket.
        axis: RocketAxis,
    },
    /// Consumes the rocket at the cell and announces its split.
    SplitRocket {
        /// Cell holding the rocket.
        cell: CellCoord,
    },
    /// Replaces the set of hinted pieces.
    SetHints {
        /// Pieces that belong to a matchable group, sorted ascending.
        tiles: Vec<TileId>,
    },
}

/// Events broadcast after processing commands or advancing projectiles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A tile entered the grid through level load or refill.
    TileSpawned {
        /// Identifier allocated to the tile.
        tile: TileId,
        /// Cell the tile occupies.
        cell: CellCoord,
        /// Variant of the new tile.
        kind: TileKind,
    },
    /// A tile fell from one cell to another.
    TileMoved {
        /// Tile that moved.
        tile: TileId,
        /// Cell occupied before the move.
        from: CellCoord,
        /// Cell occupied after the move.
        to: CellCoord,
    },
    /// A tile lost health without breaking.
    TileDamaged {
        /// Tile that was hit.
        tile: TileId,
        /// Cell the tile occupies.
        cell: CellCoord,
        /// Health remaining after the hit.
        health: u8,
    },
    /// A tile left the grid.
    TileRemoved {
        /// Tile that was removed.
        tile: TileId,
        /// Cell the tile occupied.
        cell: CellCoord,
        /// Variant of the removed tile.
        kind: TileKind,
        /// Reason for the removal.
        cause: RemovalCause,
    },
    /// A special item was created in place of a cleared group.
    SpecialItemCreated {
        /// Identifier allocated to the item.
        tile: TileId,
        /// Kind of special item.
        kind: SpecialKind,
        /// Cell the item occupies.
        cell: CellCoord,
        /// Axis of the rocket.
        axis: RocketAxis,
    },
    /// A rocket split into two halves.
    RocketSplit {
        /// Rocket that was consumed.
        tile: TileId,
        /// Cell the halves start from.
        cell: CellCoord,
        /// Axis of the consumed rocket.
        axis: RocketAxis,
        /// Travel directions of the two halves.
        directions: [Direction; 2],
        /// Tiles present immediately before the split.
        snapshot: TileSnapshot,
    },
    /// A rocket half started travelling.
    RocketHalfLaunched {
        /// Identifier of the half.
        half: HalfId,
        /// Cell the half starts from.
        origin: CellCoord,
        /// Direction of travel.
        direction: Direction,
    },
    /// A rocket half moved one cell.
    RocketHalfAdvanced {
        /// Identifier of the half.
        half: HalfId,
        /// Cell occupied before the step.
        from: CellCoord,
        /// Cell occupied after the step.
        to: CellCoord,
        /// Tile hit at the new cell, if any.
        detonated: Option<TileId>,
    },
    /// A rocket half left the grid and was destroyed.
    RocketHalfExited {
        /// Identifier of the half.
        half: HalfId,
        /// Last in-bounds cell visited.
        last: CellCoord,
    },
    /// The set of hinted pieces changed.
    HintsChanged {
        /// Every hinted piece after the change, sorted ascending.
        hinted: Vec<TileId>,
    },
    /// The turn state machine moved between phases.
    TurnStateChanged {
        /// Phase before the transition.
        from: TurnState,
        /// Phase after the transition.
        to: TurnState,
    },
    /// A tap arrived while a turn was still resolving.
    TriggerRejected {
        /// Cell that was tapped.
        cell: CellCoord,
        /// Phase that rejected the tap.
        state: TurnState,
    },
}

/// Group-size thresholds that drive clears, rockets and hints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Minimum group size that a tap clears.
    pub match_threshold: usize,
    /// Minimum group size that creates a rocket.
    pub rocket_threshold: usize,
    /// Minimum group size highlighted by hints.
    pub hint_threshold: usize,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            match_threshold: 2,
            rocket_threshold: 4,
            hint_threshold: 4,
        }
    }
}

impl Rules {
    /// Checks that the thresholds describe a playable rule set.
    pub fn validate(&self) -> Result<(), RulesError> {
        for (name, value) in [
            ("match_threshold", self.match_threshold),
            ("rocket_threshold", self.rocket_threshold),
            ("hint_threshold", self.hint_threshold),
        ] {
            if value == 0 {
                return Err(RulesError::ZeroThreshold { name });
            }
        }

        if self.rocket_threshold < self.match_threshold {
            return Err(RulesError::RocketBelowMatch {
                rocket: self.rocket_threshold,
                matched: self.match_threshold,
            });
        }

        Ok(())
    }
}

/// Reasons a rule set is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum RulesError {
    /// A threshold was zero, which would clear empty groups.
    #[error("{name} must be at least 1")]
    ZeroThreshold {
        /// Field that failed validation.
        name: &'static str,
    },
    /// Rockets would be created by groups too small to clear.
    #[error("rocket_threshold {rocket} is below match_threshold {matched}")]
    RocketBelowMatch {
        /// Configured rocket threshold.
        rocket: usize,
        /// Configured match threshold.
        matched: usize,
    },
}

/// Minimal level description consumed when the grid is created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDescriptor {
    /// Number of columns.
    pub grid_width: u32,
    /// Number of rows.
    pub grid_height: u32,
    /// Row-major cell codes, bottom row first.
    pub grid: Vec<String>,
}

impl LevelDescriptor {
    /// Checks the dimensions against the number of cell codes.
    pub fn validate(&self) -> Result<(), LevelError> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(LevelError::ZeroDimensions {
                width: self.grid_width,
                height: self.grid_height,
            });
        }

        let expected = u64::from(self.grid_width) * u64::from(self.grid_height);
        let actual = self.grid.len() as u64;
        if expected != actual {
            return Err(LevelError::CellCountMismatch { expected, actual });
        }

        Ok(())
    }

    /// Iterates every cell together with its parsed code.
    ///
    /// Callers should [`validate`](Self::validate) first; surplus codes are
    /// skipped and missing codes are simply not yielded.
    pub fn cells(&self) -> impl Iterator<Item = (CellCoord, CellCode)> + '_ {
        let width = self.grid_width.max(1);
        let capacity = u64::from(self.grid_width) * u64::from(self.grid_height);
        self.grid
            .iter()
            .enumerate()
            .take(usize::try_from(capacity).unwrap_or(usize::MAX))
            .filter_map(move |(index, code)| {
                let index = u32::try_from(index).ok()?;
                Some((
                    CellCoord::new(index % width, index / width),
                    CellCode::parse(code),
                ))
            })
    }
}

/// Parsed meaning of a single level cell code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellCode {
    /// A piece with a fixed color (`r`, `g`, `b`, `y`).
    Piece(PieceColor),
    /// A piece with a uniformly random color (`rand`).
    RandomPiece,
    /// A box (`bo`).
    Box,
    /// A stone (`s`).
    Stone,
    /// A vase (`v`).
    Vase,
    /// Any other code leaves the cell empty.
    Empty,
}

impl CellCode {
    /// Parses a level cell code.
    #[must_use]
    pub fn parse(code: &str) -> Self {
        match code {
            "r" => Self::Piece(PieceColor::Red),
            "g" => Self::Piece(PieceColor::Green),
            "b" => Self::Piece(PieceColor::Blue),
            "y" => Self::Piece(PieceColor::Yellow),
            "rand" => Self::RandomPiece,
            "bo" => Self::Box,
            "s" => Self::Stone,
            "v" => Self::Vase,
            _ => Self::Empty,
        }
    }
}

/// Reasons a level descriptor cannot produce a grid.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LevelError {
    /// Width or height was zero.
    #[error("grid dimensions must be positive (received {width}x{height})")]
    ZeroDimensions {
        /// Declared width.
        width: u32,
        /// Declared height.
        height: u32,
    },
    /// The number of cell codes does not equal `width * height`.
    #[error("expected {expected} cell codes but the level lists {actual}")]
    CellCountMismatch {
        /// `width * height`.
        expected: u64,
        /// Number of codes present.
        actual: u64,
    },
}
