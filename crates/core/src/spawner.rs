//! Special tile spawning
//!
//! After a detection pass whose raw match set has four or more tiles, one
//! special tile is created:
//!
//! | Raw match size | Special kind |
//! |----------------|--------------|
//! | 4 | HorizontalLine |
//! | 5 | VerticalLine |
//! | 6+ | Cross |
//!
//! The tile goes to row 0 of a column picked uniformly among the distinct
//! columns the match touches, with a fresh random color. Whatever occupied
//! that cell is overwritten and lost.

use arrayvec::ArrayVec;

use crate::grid::Grid;
use crate::palette::ColorPalette;
use crate::rng::TileRng;
use crate::types::{Coord, CoordSet, SpawnedSpecial, SpecialKind, Tile, GRID_WIDTH};

/// Special kind earned by a raw match of `size` tiles, if any
pub fn special_for_match_size(size: usize) -> Option<SpecialKind> {
    match size {
        0..=3 => None,
        4 => Some(SpecialKind::HorizontalLine),
        5 => Some(SpecialKind::VerticalLine),
        _ => Some(SpecialKind::Cross),
    }
}

/// Spawn at most one special tile for `matches`.
///
/// Draws the column first, then the color. Returns what was placed and the
/// tile it displaced.
pub fn spawn_special<R: TileRng>(
    grid: &mut Grid,
    matches: &CoordSet,
    palette: &ColorPalette,
    rng: &mut R,
) -> Option<SpawnedSpecial> {
    let kind = special_for_match_size(matches.len())?;

    let columns: ArrayVec<u8, { GRID_WIDTH as usize }> = matches.columns().collect();
    let col = rng.choose(columns.as_slice())?;

    let coord = Coord::new(0, col);
    let tile = Tile::special(rng.next_color(palette), kind);
    let displaced = grid.tile(coord);
    grid.set(coord, Some(tile));

    Some(SpawnedSpecial {
        coord,
        tile,
        displaced,
    })
}
