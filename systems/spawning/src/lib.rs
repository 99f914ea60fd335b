#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Refill system that tops the grid up with random pieces after gravity.

use rand::Rng;
use tile_blast_core::{Command, GridView, PieceColor};

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    palette: &'static [PieceColor],
}

impl Config {
    /// Creates a configuration drawing colors uniformly from `palette`.
    ///
    /// An empty palette falls back to every [`PieceColor`].
    #[must_use]
    pub const fn new(palette: &'static [PieceColor]) -> Self {
        Self { palette }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(&PieceColor::ALL)
    }
}

/// Pure system that emits a spawn command for every empty cell.
#[derive(Debug)]
pub struct Spawning {
    palette: &'static [PieceColor],
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let palette = if config.palette.is_empty() {
            &PieceColor::ALL[..]
        } else {
            config.palette
        };
        Self { palette }
    }

    /// Emits [`Command::SpawnPiece`] for each empty cell in row-major order.
    ///
    /// Immovable obstacles are left untouched. Every color draw consumes the
    /// supplied generator, so a seeded generator yields reproducible refills.
    pub fn handle<R>(&mut self, view: &GridView<'_>, rng: &mut R, out: &mut Vec<Command>)
    where
        R: Rng + ?Sized,
    {
        for cell in view.coords() {
            if !view.is_empty(cell) {
                continue;
            }
            let color = self.palette[rng.gen_range(0..self.palette.len())];
            out.push(Command::SpawnPiece { cell, color });
        }
    }
}

impl Default for Spawning {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
