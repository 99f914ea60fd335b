#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Connected-group detection and blast planning.
//!
//! Groups are maximal sets of same-color pieces linked through orthogonal
//! adjacency. Obstacles, rockets and empty cells never join a group and never
//! bridge two pieces.

use tile_blast_core::{
    CellCoord, Command, DamageSource, GridView, PieceColor, RemovalCause, TileId,
};

/// Maximal connected set of same-color pieces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    color: PieceColor,
    members: Vec<(CellCoord, TileId)>,
}

impl Group {
    /// Color shared by every member.
    #[must_use]
    pub const fn color(&self) -> PieceColor {
        self.color
    }

    /// Number of pieces in the group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Reports whether the group holds no pieces.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Reports whether the cell belongs to the group.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.members
            .binary_search_by(|(member, _)| member.cmp(&cell))
            .is_ok()
    }

    /// Member cells in ascending coordinate order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.members.iter().map(|(cell, _)| *cell)
    }

    /// Member tiles in ascending coordinate order.
    pub fn tiles(&self) -> impl Iterator<Item = TileId> + '_ {
        self.members.iter().map(|(_, tile)| *tile)
    }

    /// Member cells paired with their tiles.
    #[must_use]
    pub fn members(&self) -> &[(CellCoord, TileId)] {
        &self.members
    }
}

/// Flood-fill helper that reuses its visited buffer across queries.
#[derive(Debug, Default)]
pub struct MatchFinder {
    visited: Vec<bool>,
    stack: Vec<CellCoord>,
}

impl MatchFinder {
    /// Creates a finder with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the group containing the piece at `origin`.
    ///
    /// Yields `None` when the cell is empty, out of bounds or holds a tile that
    /// cannot match. A lone piece yields a group of size one.
    pub fn group_at(&mut self, view: &GridView<'_>, origin: CellCoord) -> Option<Group> {
        self.reset(view);
        self.flood(view, origin)
    }

    /// Enumerates every group whose size reaches `threshold`.
    ///
    /// A single visited set spans the whole scan so each piece is examined
    /// once. Groups are ordered by their lowest member cell.
    pub fn groups_at_least(&mut self, view: &GridView<'_>, threshold: usize) -> Vec<Group> {
        self.reset(view);
        let mut groups = Vec::new();
        for cell in view.coords() {
            if let Some(group) = self.flood(view, cell) {
                if group.len() >= threshold {
                    groups.push(group);
                }
            }
        }
        groups
    }

    fn reset(&mut self, view: &GridView<'_>) {
        let (columns, rows) = view.dimensions();
        let capacity = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
        self.visited.clear();
        self.visited.resize(capacity, false);
        self.stack.clear();
    }

    fn mark(&mut self, view: &GridView<'_>, cell: CellCoord) -> bool {
        match view.index(cell).and_then(|index| self.visited.get_mut(index)) {
            Some(seen) if !*seen => {
                *seen = true;
                true
            }
            _ => false,
        }
    }

    fn flood(&mut self, view: &GridView<'_>, origin: CellCoord) -> Option<Group> {
        let tile = view.tile(origin)?;
        if !tile.kind.capabilities().matchable {
            return None;
        }
        let color = tile.kind.color()?;
        if !self.mark(view, origin) {
            return None;
        }

        let mut members = vec![(origin, tile.id)];
        self.stack.push(origin);
        while let Some(cell) = self.stack.pop() {
            for neighbor in cell.neighbors() {
                let Some(candidate) = view.tile(neighbor) else {
                    continue;
                };
                if candidate.kind.color() != Some(color) {
                    continue;
                }
                if self.mark(view, neighbor) {
                    members.push((neighbor, candidate.id));
                    self.stack.push(neighbor);
                }
            }
        }

        members.sort_unstable();
        Some(Group { color, members })
    }
}

/// Emits the commands that clear `group` and hit its neighbouring obstacles.
///
/// Every member is removed as [`RemovalCause::Matched`]. Each distinct
/// obstacle orthogonally adjacent to any member receives exactly one
/// [`DamageSource::Blast`] hit, however many members touch it.
pub fn plan_blast(view: &GridView<'_>, group: &Group, out: &mut Vec<Command>) {
    for &(cell, tile) in group.members() {
        out.push(Command::RemoveTile {
            cell,
            tile,
            cause: RemovalCause::Matched,
        });
    }

    let mut hit: Vec<(CellCoord, TileId)> = group
        .cells()
        .flat_map(CellCoord::neighbors)
        .filter(|cell| !group.contains(*cell))
        .filter_map(|cell| view.tile(cell).map(|tile| (cell, tile)))
        .filter(|(_, tile)| tile.kind.is_obstacle())
        .map(|(cell, tile)| (cell, tile.id))
        .collect();
    hit.sort_unstable();
    hit.dedup();

    for (cell, tile) in hit {
        out.push(Command::DamageTile {
            cell,
            tile,
            source: DamageSource::Blast,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tile_blast_core::{Tile, TileKind};

    fn piece(id: u32, color: PieceColor) -> Option<Tile> {
        Some(Tile::new(TileId::new(id), TileKind::Piece { color }))
    }

    #[test]
    fn lone_piece_forms_a_group_of_one() {
        let cells = vec![piece(0, PieceColor::Red), piece(1, PieceColor::Blue)];
        let view = GridView::new(&cells, 2, 1);
        let group = MatchFinder::new()
            .group_at(&view, CellCoord::new(0, 0))
            .expect("group");
        assert_eq!(group.len(), 1);
        assert_eq!(group.color(), PieceColor::Red);
    }

    #[test]
    fn obstacles_do_not_bridge_groups() {
        let cells = vec![
            piece(0, PieceColor::Red),
            Some(Tile::new(TileId::new(1), TileKind::Box)),
            piece(2, PieceColor::Red),
        ];
        let view = GridView::new(&cells, 3, 1);
        let group = MatchFinder::new()
            .group_at(&view, CellCoord::new(0, 0))
            .expect("group");
        assert_eq!(group.len(), 1);
    }

    #[test]
    fn non_matchable_origin_yields_nothing() {
        let cells = vec![Some(Tile::new(TileId::new(0), TileKind::Stone)), None];
        let view = GridView::new(&cells, 2, 1);
        let mut finder = MatchFinder::new();
        assert!(finder.group_at(&view, CellCoord::new(0, 0)).is_none());
        assert!(finder.group_at(&view, CellCoord::new(1, 0)).is_none());
        assert!(finder.group_at(&view, CellCoord::new(9, 9)).is_none());
    }

    #[test]
    fn blast_hits_each_adjacent_obstacle_once() {
        // r r
        // bo r    (row 0 at the bottom)
        let cells = vec![
            Some(Tile::new(TileId::new(0), TileKind::Box)),
            piece(1, PieceColor::Red),
            piece(2, PieceColor::Red),
            piece(3, PieceColor::Red),
        ];
        let view = GridView::new(&cells, 2, 2);
        let group = MatchFinder::new()
            .group_at(&view, CellCoord::new(1, 0))
            .expect("group");
        assert_eq!(group.len(), 3);

        let mut commands = Vec::new();
        plan_blast(&view, &group, &mut commands);
        let hits: Vec<_> = commands
            .iter()
            .filter(|command| matches!(command, Command::DamageTile { .. }))
            .collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(commands.len(), 4);
    }

    #[test]
    fn scan_reports_only_large_groups() {
        let cells = vec![
            piece(0, PieceColor::Green),
            piece(1, PieceColor::Green),
            piece(2, PieceColor::Yellow),
            piece(3, PieceColor::Green),
            piece(4, PieceColor::Green),
            piece(5, PieceColor::Blue),
        ];
        let view = GridView::new(&cells, 3, 2);
        let mut finder = MatchFinder::new();
        let groups = finder.groups_at_least(&view, 4);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].color(), PieceColor::Green);
        assert_eq!(finder.groups_at_least(&view, 1).len(), 3);
    }
}
