use std::fmt;

use glam::Vec2;
use tile_blast_core::CellCoord;
use tile_blast_rendering::GridLayout;

/// Single scripted tap, addressed either by cell or by world-space point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Tap {
    /// Grid cell given as `column,row`.
    Cell(CellCoord),
    /// World-space point given as `@x,y`, resolved through the layout.
    World(Vec2),
}

impl Tap {
    /// Resolves the tap onto a grid cell. World points outside the grid miss.
    pub(crate) fn resolve(self, layout: &GridLayout) -> Option<CellCoord> {
        match self {
            Self::Cell(cell) => Some(cell),
            Self::World(position) => layout.world_to_grid(position),
        }
    }
}

impl fmt::Display for Tap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cell(cell) => write!(f, "{},{}", cell.column(), cell.row()),
            Self::World(position) => write!(f, "@{},{}", position.x, position.y),
        }
    }
}

/// Parses `column,row` or `@x,y` into a [`Tap`].
pub(crate) fn parse_tap(value: &str) -> Result<Tap, String> {
    let trimmed = value.trim();
    if let Some(point) = trimmed.strip_prefix('@') {
        let (x, y) = split_pair(point)?;
        let x: f32 = x
            .parse()
            .map_err(|_| format!("invalid world x coordinate `{x}`"))?;
        let y: f32 = y
            .parse()
            .map_err(|_| format!("invalid world y coordinate `{y}`"))?;
        return Ok(Tap::World(Vec2::new(x, y)));
    }

    let (column, row) = split_pair(trimmed)?;
    let column: u32 = column
        .parse()
        .map_err(|_| format!("invalid column `{column}`"))?;
    let row: u32 = row.parse().map_err(|_| format!("invalid row `{row}`"))?;
    Ok(Tap::Cell(CellCoord::new(column, row)))
}

fn split_pair(value: &str) -> Result<(&str, &str), String> {
    value
        .split_once(',')
        .map(|(first, second)| (first.trim(), second.trim()))
        .ok_or_else(|| format!("expected two comma-separated values, found `{value}`"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cell_taps() {
        assert_eq!(parse_tap("2, 3"), Ok(Tap::Cell(CellCoord::new(2, 3))));
    }

    #[test]
    fn parses_world_taps() {
        assert_eq!(
            parse_tap("@-100,52.5"),
            Ok(Tap::World(Vec2::new(-100.0, 52.5)))
        );
    }

    #[test]
    fn rejects_malformed_taps() {
        assert!(parse_tap("3").is_err());
        assert!(parse_tap("-1,0").is_err());
        assert!(parse_tap("@a,1").is_err());
    }

    #[test]
    fn world_taps_resolve_through_layout() {
        let layout = GridLayout::with_defaults(3, 3);
        assert_eq!(
            Tap::World(Vec2::ZERO).resolve(&layout),
            Some(CellCoord::new(1, 1))
        );
        assert_eq!(Tap::World(Vec2::new(900.0, 0.0)).resolve(&layout), None);
    }

    #[test]
    fn display_round_trips_through_parser() {
        let tap = Tap::Cell(CellCoord::new(4, 0));
        assert_eq!(parse_tap(&tap.to_string()), Ok(tap));
    }
}
