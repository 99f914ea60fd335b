#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Tile Blast adapters.
//!
//! Presentation only: nothing here mutates the grid. Adapters turn a
//! [`GridView`] into a [`Scene`] or a text frame and map pointer positions
//! back onto cells.

use glam::Vec2;
use std::{error::Error, fmt, fmt::Write as _};
use tile_blast_core::{
    CellCoord, GridView, PieceColor, RocketAxis, Tile, TileId, TileKind,
};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }

    /// Fill color for a tile, lightened while hinted and faded once cracked.
    #[must_use]
    pub fn for_tile(tile: &Tile) -> Self {
        let base = match tile.kind {
            TileKind::Piece {
                color: PieceColor::Red,
            } => Self::from_rgb_u8(0xd6, 0x2f, 0x3a),
            TileKind::Piece {
                color: PieceColor::Green,
            } => Self::from_rgb_u8(0x3b, 0xb0, 0x4a),
            TileKind::Piece {
                color: PieceColor::Blue,
            } => Self::from_rgb_u8(0x2f, 0x6f, 0xd6),
            TileKind::Piece {
                color: PieceColor::Yellow,
            } => Self::from_rgb_u8(0xf2, 0xc2, 0x1b),
            TileKind::Box => Self::from_rgb_u8(0x9c, 0x6b, 0x3a),
            TileKind::Stone => Self::from_rgb_u8(0x7a, 0x7a, 0x80),
            TileKind::Vase => Self::from_rgb_u8(0x5c, 0xc8, 0xc8),
            TileKind::Rocket { .. } => Self::from_rgb_u8(0xf0, 0x7a, 0x22),
        };

        if tile.hinted {
            base.lighten(0.35)
        } else if tile.is_cracked() {
            Self { alpha: 0.6, ..base }
        } else {
            base
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Maps grid cells onto world-space centres and back.
///
/// The grid is centred on `origin`. Columns are `cell_size` apart and rows are
/// `cell_size + y_spacing` apart, with row zero at the bottom.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    columns: u32,
    rows: u32,
    cell_size: f32,
    y_spacing: f32,
    origin: Vec2,
}

impl GridLayout {
    /// Default edge length of a cell in world units.
    pub const DEFAULT_CELL_SIZE: f32 = 100.0;

    /// Default vertical gap between rows in world units.
    pub const DEFAULT_Y_SPACING: f32 = 5.0;

    /// Creates a layout descriptor.
    ///
    /// Returns an error when `cell_size` is not strictly positive or
    /// `y_spacing` is negative.
    pub fn new(
        columns: u32,
        rows: u32,
        cell_size: f32,
        y_spacing: f32,
        origin: Vec2,
    ) -> Result<Self, RenderingError> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(RenderingError::InvalidCellSize { cell_size });
        }
        if !(y_spacing.is_finite() && y_spacing >= 0.0) {
            return Err(RenderingError::InvalidSpacing { y_spacing });
        }

        Ok(Self {
            columns,
            rows,
            cell_size,
            y_spacing,
            origin,
        })
    }

    /// Creates a layout centred on the world origin with default metrics.
    #[must_use]
    pub const fn with_defaults(columns: u32, rows: u32) -> Self {
        Self {
            columns,
            rows,
            cell_size: Self::DEFAULT_CELL_SIZE,
            y_spacing: Self::DEFAULT_Y_SPACING,
            origin: Vec2::ZERO,
        }
    }

    /// Distance between the centres of two vertically adjacent cells.
    #[must_use]
    pub fn row_pitch(&self) -> f32 {
        self.cell_size + self.y_spacing
    }

    fn offset(&self) -> Vec2 {
        Vec2::new(
            self.columns.saturating_sub(1) as f32 * 0.5 * self.cell_size,
            self.rows.saturating_sub(1) as f32 * 0.5 * self.row_pitch(),
        )
    }

    /// World-space centre of the provided cell.
    #[must_use]
    pub fn grid_to_world(&self, cell: CellCoord) -> Vec2 {
        let raw = Vec2::new(
            cell.column() as f32 * self.cell_size,
            cell.row() as f32 * self.row_pitch(),
        );
        self.origin + raw - self.offset()
    }

    /// Cell whose centre is nearest to `position`.
    ///
    /// Returns `None` when the position falls outside the grid.
    #[must_use]
    pub fn world_to_grid(&self, position: Vec2) -> Option<CellCoord> {
        if self.columns == 0 || self.rows == 0 {
            return None;
        }

        let local = position - self.origin + self.offset();
        let column = (local.x / self.cell_size).round();
        let row = (local.y / self.row_pitch()).round();
        if column < 0.0 || row < 0.0 {
            return None;
        }
        if column >= self.columns as f32 || row >= self.rows as f32 {
            return None;
        }
        if (local.x - column * self.cell_size).abs() > self.cell_size * 0.5
            || (local.y - row * self.row_pitch()).abs() > self.cell_size * 0.5
        {
            return None;
        }

        Some(CellCoord::new(column as u32, row as u32))
    }

    /// Size of a background panel framing the grid with `padding` on each side.
    #[must_use]
    pub fn background_size(&self, padding: f32) -> Vec2 {
        Vec2::new(
            self.columns as f32 * self.cell_size + padding,
            self.rows as f32 * self.cell_size + padding * 2.0,
        )
    }
}

/// Tile drawn at a resolved world position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TilePresentation {
    /// Identifier of the tile being drawn.
    pub tile: TileId,
    /// Variant of the tile.
    pub kind: TileKind,
    /// Centre of the tile in world units.
    pub position: Vec2,
    /// Fill color.
    pub color: Color,
    /// Whether the tile is highlighted by a hint.
    pub hinted: bool,
}

/// Scene description consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Layout used to position tiles.
    pub layout: GridLayout,
    /// Every tile in row-major order.
    pub tiles: Vec<TilePresentation>,
}

impl Scene {
    /// Captures the current grid into a scene.
    #[must_use]
    pub fn from_view(view: &GridView<'_>, layout: GridLayout) -> Self {
        let tiles = view
            .tiles()
            .map(|(cell, tile)| TilePresentation {
                tile: tile.id,
                kind: tile.kind,
                position: layout.grid_to_world(cell),
                color: Color::for_tile(&tile),
                hinted: tile.hinted,
            })
            .collect();
        Self { layout, tiles }
    }
}

/// Single-character glyph for a cell.
///
/// Pieces print their color initial, uppercase while hinted. A cracked vase
/// prints lowercase.
#[must_use]
pub fn glyph(tile: Option<&Tile>) -> char {
    let Some(tile) = tile else {
        return '.';
    };
    let glyph = match tile.kind {
        TileKind::Piece { color } => match color {
            PieceColor::Red => 'r',
            PieceColor::Green => 'g',
            PieceColor::Blue => 'b',
            PieceColor::Yellow => 'y',
        },
        TileKind::Box => '#',
        TileKind::Stone => 'S',
        TileKind::Vase if tile.is_cracked() => 'v',
        TileKind::Vase => 'V',
        TileKind::Rocket {
            axis: RocketAxis::Vertical,
        } => '|',
        TileKind::Rocket {
            axis: RocketAxis::Horizontal,
        } => '-',
    };
    if tile.hinted {
        glyph.to_ascii_uppercase()
    } else {
        glyph
    }
}

/// Renders the grid as text, top row first, one line per row.
#[must_use]
pub fn render_text(view: &GridView<'_>) -> String {
    let (columns, rows) = view.dimensions();
    let mut frame = String::new();
    for row in (0..rows).rev() {
        for column in 0..columns {
            frame.push(glyph(view.tile(CellCoord::new(column, row)).as_ref()));
        }
        let _ = writeln!(frame);
    }
    frame
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Cell size must be positive to avoid a zero-sized grid.
    InvalidCellSize {
        /// Provided size that failed validation.
        cell_size: f32,
    },
    /// Row spacing must not be negative.
    InvalidSpacing {
        /// Provided spacing that failed validation.
        y_spacing: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCellSize { cell_size } => {
                write!(f, "cell_size must be positive (received {cell_size})")
            }
            Self::InvalidSpacing { y_spacing } => {
                write!(f, "y_spacing must not be negative (received {y_spacing})")
            }
        }
    }
}

impl Error for RenderingError {}
