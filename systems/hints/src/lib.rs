#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Hint recomputation system.

use tile_blast_core::{Command, GridView, TileId};
use tile_blast_system_matching::MatchFinder;

/// Pure system that marks every piece belonging to a sufficiently large group.
#[derive(Debug, Default)]
pub struct Hints {
    finder: MatchFinder,
}

impl Hints {
    /// Creates a hint system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits a [`Command::SetHints`] naming the members of every group of at
    /// least `threshold` pieces.
    ///
    /// The command always carries the full set, so pieces that no longer
    /// qualify lose their flag when it is applied.
    pub fn handle(&mut self, view: &GridView<'_>, threshold: usize, out: &mut Vec<Command>) {
        let mut tiles: Vec<TileId> = self
            .finder
            .groups_at_least(view, threshold)
            .iter()
            .flat_map(|group| group.tiles())
            .collect();
        tiles.sort_unstable();
        out.push(Command::SetHints { tiles });
    }
}
