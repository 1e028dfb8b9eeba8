//! Special-effect expansion
//!
//! Turns a raw match set into the full removal set. A matched special tile
//! triggers its line (or cross), and any special tile caught in that line
//! triggers in turn. The chain is resolved with an explicit worklist and an
//! expanded-set so each coordinate is processed at most once.

use arrayvec::ArrayVec;

use crate::grid::Grid;
use crate::types::{Coord, CoordSet, SpecialKind, CELL_COUNT};

/// Coordinates cleared when a tile of `kind` at `coord` is removed.
///
/// A plain tile clears only itself.
pub fn trigger_set(kind: SpecialKind, coord: Coord) -> CoordSet {
    match kind {
        SpecialKind::None => [coord].into_iter().collect(),
        SpecialKind::HorizontalLine => CoordSet::row(coord.row),
        SpecialKind::VerticalLine => CoordSet::column(coord.col),
        SpecialKind::Cross => CoordSet::row(coord.row).union(&CoordSet::column(coord.col)),
    }
}

/// Expand `matches` through chained special effects.
///
/// Returns a superset of `matches`. Terminates because every coordinate is
/// pushed onto the worklist at most once.
pub fn expand_removals(grid: &Grid, matches: &CoordSet) -> CoordSet {
    let mut removal = *matches;
    let mut expanded = CoordSet::new();
    let mut worklist: ArrayVec<Coord, CELL_COUNT> = ArrayVec::new();

    for coord in matches {
        expanded.insert(coord);
        worklist.push(coord);
    }

    while let Some(coord) = worklist.pop() {
        let Some(tile) = grid.tile(coord) else {
            continue;
        };
        if !tile.is_special() {
            continue;
        }

        for hit in &trigger_set(tile.special, coord) {
            removal.insert(hit);
            if expanded.insert(hit) {
                // Each coordinate enters `expanded` once, so this never overflows.
                worklist.push(hit);
            }
        }
    }

    removal
}
