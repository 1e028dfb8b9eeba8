//! Grid module - owns all tile state
//!
//! The grid is a fixed 8x8 array where each cell can be empty or hold a tile.
//! Uses a flat array for cache locality and zero allocation.
//! Coordinates: `(row, col)`, row 0 at the top, col 0 at the left.
//!
//! Outside of an in-progress removal/refill step every cell is occupied;
//! the cascade loop restores that before handing the grid back.

use std::fmt;

use tracing::debug;

use crate::matcher::find_matches;
use crate::palette::ColorPalette;
use crate::rng::TileRng;
use crate::types::{Cell, ColorId, Coord, CoordSet, Tile, CELL_COUNT, GRID_HEIGHT, GRID_WIDTH};

/// The playfield - 8 columns x 8 rows using flat array storage
#[derive(Debug, Clone, Copy)]
pub struct Grid {
    /// Flat array of cells, row-major order (row * WIDTH + col)
    cells: [Cell; CELL_COUNT],
}

impl Grid {
    /// Create a grid with every cell empty
    pub fn empty() -> Self {
        Self {
            cells: [None; CELL_COUNT],
        }
    }

    /// Fill every cell with a random plain tile. May contain matches.
    pub fn random<R: TileRng>(palette: &ColorPalette, rng: &mut R) -> Self {
        let mut grid = Self::empty();
        for cell in grid.cells.iter_mut() {
            *cell = Some(rng.random_tile(palette));
        }
        grid
    }

    /// Generate a playable starting grid: re-roll the whole grid until it
    /// contains no match.
    pub fn generate<R: TileRng>(palette: &ColorPalette, rng: &mut R) -> Self {
        let mut attempts: u32 = 0;
        loop {
            attempts += 1;
            let grid = Self::random(palette, rng);
            if find_matches(&grid).is_empty() {
                debug!(attempts, colors = palette.len(), "generated match-free grid");
                return grid;
            }
        }
    }

    /// Build a grid of plain tiles from color indices, one array per row.
    pub fn from_colors(rows: [[u8; GRID_WIDTH as usize]; GRID_HEIGHT as usize]) -> Self {
        let mut grid = Self::empty();
        for (r, row) in rows.iter().enumerate() {
            for (c, &color) in row.iter().enumerate() {
                grid.cells[r * GRID_WIDTH as usize + c] = Some(Tile::new(ColorId(color)));
            }
        }
        grid
    }

    /// Build a grid from explicit cells, one array per row.
    pub fn from_rows(rows: [[Cell; GRID_WIDTH as usize]; GRID_HEIGHT as usize]) -> Self {
        let mut grid = Self::empty();
        for (r, row) in rows.iter().enumerate() {
            let start = r * GRID_WIDTH as usize;
            grid.cells[start..start + GRID_WIDTH as usize].copy_from_slice(row);
        }
        grid
    }

    pub fn width(&self) -> u8 {
        GRID_WIDTH
    }

    pub fn height(&self) -> u8 {
        GRID_HEIGHT
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.in_bounds()
    }

    /// Get cell at `coord`. Returns `None` if out of bounds.
    pub fn get(&self, coord: Coord) -> Option<Cell> {
        coord.index().map(|idx| self.cells[idx])
    }

    /// Tile at `coord`, or `None` if out of bounds or empty
    pub fn tile(&self, coord: Coord) -> Option<Tile> {
        self.get(coord).flatten()
    }

    /// Set cell at `coord`. Returns false if out of bounds.
    pub fn set(&mut self, coord: Coord, cell: Cell) -> bool {
        match coord.index() {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Empty the cell at `coord`, returning what was there.
    pub fn take(&mut self, coord: Coord) -> Option<Tile> {
        coord.index().and_then(|idx| self.cells[idx].take())
    }

    /// Swap two cells. Returns false (and changes nothing) if either is out of bounds.
    pub fn swap(&mut self, a: Coord, b: Coord) -> bool {
        match (a.index(), b.index()) {
            (Some(ia), Some(ib)) => {
                self.cells.swap(ia, ib);
                true
            }
            _ => false,
        }
    }

    /// Empty every cell in `coords`. Returns how many tiles were removed.
    pub fn remove_all(&mut self, coords: &CoordSet) -> usize {
        coords.iter().filter_map(|c| self.take(c)).count()
    }

    pub fn is_occupied(&self, coord: Coord) -> bool {
        matches!(self.get(coord), Some(Some(_)))
    }

    /// True when no cell is empty
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_some())
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_none()).count()
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cells of one row, left to right
    pub fn row(&self, row: u8) -> &[Cell] {
        let start = row as usize * GRID_WIDTH as usize;
        &self.cells[start..start + GRID_WIDTH as usize]
    }

    /// Structural comparison: colors and special kinds must all agree.
    pub fn is_identical(&self, other: &Grid) -> bool {
        self.cells
            .iter()
            .zip(other.cells.iter())
            .all(|(a, b)| match (a, b) {
                (Some(a), Some(b)) => a.is_identical(b),
                (None, None) => true,
                _ => false,
            })
    }

    /// Copy the grid into a row-major 2D array (for snapshots)
    pub fn write_rows(&self, out: &mut [[Cell; GRID_WIDTH as usize]; GRID_HEIGHT as usize]) {
        for (r, row) in out.iter_mut().enumerate() {
            let start = r * GRID_WIDTH as usize;
            row.copy_from_slice(&self.cells[start..start + GRID_WIDTH as usize]);
        }
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::empty()
    }
}

// Structural equality. Tile's own PartialEq ignores special kinds, which is
// right for matching but not for "grid unchanged" checks.
impl PartialEq for Grid {
    fn eq(&self, other: &Self) -> bool {
        self.is_identical(other)
    }
}

impl Eq for Grid {}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..GRID_HEIGHT {
            for cell in self.row(r) {
                match cell {
                    None => write!(f, " . ")?,
                    Some(tile) => {
                        let mark = match tile.special {
                            crate::types::SpecialKind::None => ' ',
                            crate::types::SpecialKind::HorizontalLine => '-',
                            crate::types::SpecialKind::VerticalLine => '|',
                            crate::types::SpecialKind::Cross => '+',
                        };
                        write!(f, "{:>2}{}", tile.color.0, mark)?;
                    }
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
