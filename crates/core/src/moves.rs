//! Move validation and deadlock detection
//!
//! A move is legal when swapping two adjacent tiles produces at least one
//! match. Validation always works on a copy of the grid; the caller's grid
//! is never touched.

use crate::grid::Grid;
use crate::matcher::find_matches;
use crate::types::{Coord, CoordSet, Move, GRID_HEIGHT, GRID_WIDTH};

/// Matches that would exist after applying `mv`, computed on a copy.
///
/// Returns an empty set if either coordinate is out of bounds.
pub fn matches_after_swap(grid: &Grid, mv: Move) -> CoordSet {
    let mut probe = *grid;
    if !probe.swap(mv.from, mv.to) {
        return CoordSet::new();
    }
    find_matches(&probe)
}

/// True if applying `mv` would create a match
pub fn swap_creates_match(grid: &Grid, mv: Move) -> bool {
    !matches_after_swap(grid, mv).is_empty()
}

/// Every adjacent pair, right-neighbors and down-neighbors in row-major order.
pub fn adjacent_pairs() -> impl Iterator<Item = Move> {
    (0..GRID_HEIGHT).flat_map(|row| {
        (0..GRID_WIDTH).flat_map(move |col| {
            let here = Coord::new(row, col);
            [here.right(), here.below()]
                .into_iter()
                .flatten()
                .map(move |there| Move {
                    from: here,
                    to: there,
                })
        })
    })
}

/// First legal move in row-major order, if any
pub fn find_valid_move(grid: &Grid) -> Option<Move> {
    adjacent_pairs().find(|&mv| swap_creates_match(grid, mv))
}

/// False when the grid is deadlocked
pub fn has_valid_move(grid: &Grid) -> bool {
    find_valid_move(grid).is_some()
}
