#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Column gravity system.
//!
//! Each empty cell is filled by the nearest falling tile above it in the same
//! column. Immovable tiles keep their cell, but falling tiles pass over them,
//! so a piece resting on a stone can drop into a hole beneath it.

use tile_blast_core::{CellCoord, Command, GridView, Tile};

/// Pure system that emits the moves settling every column.
#[derive(Debug, Default)]
pub struct Gravity {
    column: Vec<Option<Tile>>,
}

impl Gravity {
    /// Creates a gravity system with an empty scratch column.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits [`Command::MoveTile`] values that settle the grid.
    ///
    /// Moves are ordered column by column, bottom to top, and must be applied
    /// in that order. Once applied, no empty cell has a falling tile above it.
    pub fn handle(&mut self, view: &GridView<'_>, out: &mut Vec<Command>) {
        let (columns, rows) = view.dimensions();
        for column in 0..columns {
            self.column.clear();
            self.column
                .extend((0..rows).map(|row| view.tile(CellCoord::new(column, row))));
            self.settle_column(column, out);
        }
    }

    fn settle_column(&mut self, column: u32, out: &mut Vec<Command>) {
        let height = self.column.len();
        for target in 0..height {
            if self.column[target].is_some() {
                continue;
            }

            let source = (target + 1..height)
                .find(|&row| self.column[row].map_or(false, |tile| tile.can_fall()));
            let Some(source) = source else {
                continue;
            };
            let Some(tile) = self.column[source].take() else {
                continue;
            };
            self.column[target] = Some(tile);

            let (Ok(from_row), Ok(to_row)) = (u32::try_from(source), u32::try_from(target)) else {
                continue;
            };
            out.push(Command::MoveTile {
                tile: tile.id,
                from: CellCoord::new(column, from_row),
                to: CellCoord::new(column, to_row),
            });
        }
    }
}
