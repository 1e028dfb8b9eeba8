//! Match detection
//!
//! Scans rows left to right, then columns top to bottom, with a sliding
//! window of three cells. Every window whose three tiles share a color adds
//! all three coordinates to the result. Longer runs accumulate through the
//! set union, so a run of five contributes five coordinates.
//!
//! Tiles compare by color only, so a special tile matches plain tiles of
//! its color. Empty cells never match.

use crate::grid::Grid;
use crate::types::{Coord, CoordSet, GRID_HEIGHT, GRID_WIDTH, MIN_MATCH_LEN};

/// All coordinates that belong to some horizontal or vertical run of three
/// or more same-color tiles.
pub fn find_matches(grid: &Grid) -> CoordSet {
    let mut matches = CoordSet::new();
    let span = MIN_MATCH_LEN as u8;

    for row in 0..GRID_HEIGHT {
        for col in 0..=(GRID_WIDTH - span) {
            let window = [
                Coord::new(row, col),
                Coord::new(row, col + 1),
                Coord::new(row, col + 2),
            ];
            if same_color(grid, &window) {
                matches.extend(window);
            }
        }
    }

    for col in 0..GRID_WIDTH {
        for row in 0..=(GRID_HEIGHT - span) {
            let window = [
                Coord::new(row, col),
                Coord::new(row + 1, col),
                Coord::new(row + 2, col),
            ];
            if same_color(grid, &window) {
                matches.extend(window);
            }
        }
    }

    matches
}

/// True if the grid contains at least one match
pub fn has_match(grid: &Grid) -> bool {
    !find_matches(grid).is_empty()
}

#[inline]
fn same_color(grid: &Grid, window: &[Coord; 3]) -> bool {
    match (grid.tile(window[0]), grid.tile(window[1]), grid.tile(window[2])) {
        (Some(a), Some(b), Some(c)) => a == b && b == c,
        _ => false,
    }
}
