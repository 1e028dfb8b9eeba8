//! Gravity and refill
//!
//! Each column is handled on its own: surviving tiles slide to the bottom
//! keeping their top-to-bottom order, and the vacated top cells receive new
//! random tiles from the active palette.

use crate::grid::Grid;
use crate::palette::ColorPalette;
use crate::rng::TileRng;
use crate::types::{Coord, GRID_HEIGHT, GRID_WIDTH};

/// Compact one column downward. Returns the number of empty cells left at the top.
pub fn collapse_column(grid: &mut Grid, col: u8) -> u8 {
    // Walk bottom-up, writing each tile to the lowest free slot.
    let mut write = GRID_HEIGHT;
    for row in (0..GRID_HEIGHT).rev() {
        let coord = Coord::new(row, col);
        if let Some(tile) = grid.take(coord) {
            write -= 1;
            grid.set(Coord::new(write, col), Some(tile));
        }
    }
    write
}

/// Compact every column downward without refilling
pub fn collapse(grid: &mut Grid) {
    for col in 0..GRID_WIDTH {
        collapse_column(grid, col);
    }
}

/// Fill every empty cell with a fresh random tile.
///
/// Cells are visited column by column, top to bottom, so a fixed seed
/// yields a fixed refill.
pub fn refill<R: TileRng>(grid: &mut Grid, palette: &ColorPalette, rng: &mut R) -> usize {
    let mut filled = 0;
    for col in 0..GRID_WIDTH {
        for row in 0..GRID_HEIGHT {
            let coord = Coord::new(row, col);
            if !grid.is_occupied(coord) {
                grid.set(coord, Some(rng.random_tile(palette)));
                filled += 1;
            }
        }
    }
    filled
}

/// Collapse then refill. Leaves the grid fully occupied.
pub fn settle<R: TileRng>(grid: &mut Grid, palette: &ColorPalette, rng: &mut R) -> usize {
    collapse(grid);
    let filled = refill(grid, palette, rng);
    debug_assert!(grid.is_full(), "grid not fully refilled:\n{}", grid);
    filled
}
