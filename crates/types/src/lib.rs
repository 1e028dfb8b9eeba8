//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (engine logic, terminal rendering, remote adapter).
//!
//! # Grid Dimensions
//!
//! The playfield is a fixed 8x8 grid:
//!
//! - **Width**: 8 columns (indexed 0-7, left to right)
//! - **Height**: 8 rows (indexed 0-7, top to bottom)
//! - Coordinates are `(row, col)`; gravity pulls tiles toward higher rows
//!
//! # Scoring Constants
//!
//! | Matched tiles | Base points |
//! |---------------|-------------|
//! | 3 | 30 |
//! | 4 | 50 |
//! | 5 | 100 |
//! | 6+ | 200 |
//!
//! Every tile beyond the third adds [`BONUS_PER_EXTRA_TILE`]. Both parts are
//! multiplied by the chain multiplier, which is capped at [`MAX_CHAIN_MULTIPLIER`].
//!
//! # Examples
//!
//! ```
//! use swapem_types::{ColorId, Coord, SpecialKind, Tile, GRID_HEIGHT, GRID_WIDTH};
//!
//! // Tiles compare by color only
//! let plain = Tile::new(ColorId(2));
//! let striped = Tile::special(ColorId(2), SpecialKind::HorizontalLine);
//! assert_eq!(plain, striped);
//!
//! // Adjacency is Manhattan distance 1
//! assert!(Coord::new(3, 3).is_adjacent(Coord::new(3, 4)));
//! assert!(!Coord::new(3, 3).is_adjacent(Coord::new(4, 4)));
//!
//! // Grid dimensions
//! assert_eq!(GRID_WIDTH, 8);
//! assert_eq!(GRID_HEIGHT, 8);
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};

/// Grid width in cells (8 columns)
pub const GRID_WIDTH: u8 = 8;

/// Grid height in cells (8 rows)
pub const GRID_HEIGHT: u8 = 8;

/// Total number of cells on the grid
pub const CELL_COUNT: usize = (GRID_WIDTH as usize) * (GRID_HEIGHT as usize);

// CoordSet stores one bit per cell.
const _: () = assert!(CELL_COUNT <= 64);

/// Minimum run length that counts as a match
pub const MIN_MATCH_LEN: usize = 3;

/// Smallest supported palette size
pub const MIN_COLORS: u8 = 5;

/// Largest supported palette size
pub const MAX_COLORS: u8 = 8;

/// Palette size used when nothing else is configured
pub const DEFAULT_COLORS: u8 = 8;

/// Chain multiplier cap
pub const MAX_CHAIN_MULTIPLIER: u32 = 5;

/// Base points by matched tile count: index 3 => 30, 4 => 50, 5 => 100, 6+ => 200
pub const MATCH_SCORES: [u32; 7] = [0, 0, 0, 30, 50, 100, 200];

/// Bonus points per matched tile beyond the third (before the multiplier)
pub const BONUS_PER_EXTRA_TILE: u32 = 10;

/// Display names of all colors, in palette order.
pub const COLOR_NAMES: [&str; MAX_COLORS as usize] = [
    "red",
    "blue",
    "green",
    "yellow",
    "purple",
    "aqua",
    "hotpink",
    "chocolate",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoring_table_defaults() {
        assert_eq!(MATCH_SCORES[3], 30);
        assert_eq!(MATCH_SCORES[4], 50);
        assert_eq!(MATCH_SCORES[5], 100);
        assert_eq!(MATCH_SCORES[6], 200);
        assert_eq!(BONUS_PER_EXTRA_TILE, 10);
        assert_eq!(MAX_CHAIN_MULTIPLIER, 5);
    }

    #[test]
    fn tile_equality_ignores_special_kind() {
        let a = Tile::new(ColorId(1));
        let b = Tile::special(ColorId(1), SpecialKind::Cross);
        let c = Tile::new(ColorId(2));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(!a.is_identical(&b));
        assert!(a.is_identical(&Tile::new(ColorId(1))));
    }

    #[test]
    fn coord_adjacency() {
        let c = Coord::new(4, 4);
        assert!(c.is_adjacent(Coord::new(3, 4)));
        assert!(c.is_adjacent(Coord::new(5, 4)));
        assert!(c.is_adjacent(Coord::new(4, 3)));
        assert!(c.is_adjacent(Coord::new(4, 5)));
        assert!(!c.is_adjacent(c));
        assert!(!c.is_adjacent(Coord::new(5, 5)));
        assert!(!c.is_adjacent(Coord::new(4, 6)));
    }

    #[test]
    fn coord_index_roundtrip() {
        for idx in 0..CELL_COUNT {
            let c = Coord::from_index(idx).unwrap();
            assert_eq!(c.index(), Some(idx));
        }
        assert_eq!(Coord::from_index(CELL_COUNT), None);
        assert_eq!(Coord::new(GRID_HEIGHT, 0).index(), None);
        assert_eq!(Coord::new(0, GRID_WIDTH).index(), None);
    }

    #[test]
    fn coord_set_basics() {
        let mut set = CoordSet::new();
        assert!(set.is_empty());
        assert!(set.insert(Coord::new(0, 1)));
        assert!(!set.insert(Coord::new(0, 1)));
        assert!(set.insert(Coord::new(7, 7)));
        assert!(!set.insert(Coord::new(8, 0)));
        assert_eq!(set.len(), 2);
        assert!(set.contains(Coord::new(7, 7)));
        assert!(!set.contains(Coord::new(8, 0)));

        let collected: Vec<Coord> = set.iter().collect();
        assert_eq!(collected, vec![Coord::new(0, 1), Coord::new(7, 7)]);

        assert!(set.remove(Coord::new(0, 1)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn coord_set_row_and_column() {
        let row = CoordSet::row(2);
        assert_eq!(row.len(), GRID_WIDTH as usize);
        assert!(row.iter().all(|c| c.row == 2));

        let col = CoordSet::column(5);
        assert_eq!(col.len(), GRID_HEIGHT as usize);
        assert!(col.iter().all(|c| c.col == 5));

        let cross = row.union(&col);
        assert_eq!(cross.len(), GRID_WIDTH as usize + GRID_HEIGHT as usize - 1);
    }

    #[test]
    fn coord_set_columns_are_distinct_and_sorted() {
        let set: CoordSet = [Coord::new(0, 3), Coord::new(1, 3), Coord::new(2, 1)]
            .into_iter()
            .collect();
        let cols: Vec<u8> = set.columns().collect();
        assert_eq!(cols, vec![1, 3]);
    }

    #[test]
    fn move_requires_adjacency() {
        assert!(Move::new(Coord::new(0, 0), Coord::new(0, 1)).is_some());
        assert!(Move::new(Coord::new(0, 0), Coord::new(1, 1)).is_none());
        assert!(Move::new(Coord::new(0, 0), Coord::new(0, 0)).is_none());
    }
}

/// Identifier of a tile color within the active palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColorId(pub u8);

impl ColorId {
    /// Palette index of this color
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Display name (red, blue, ...), or `"?"` for an unknown id
    ///
    /// # Examples
    ///
    /// ```
    /// use swapem_types::ColorId;
    ///
    /// assert_eq!(ColorId(0).name(), "red");
    /// assert_eq!(ColorId(7).name(), "chocolate");
    /// assert_eq!(ColorId(42).name(), "?");
    /// ```
    pub fn name(self) -> &'static str {
        COLOR_NAMES.get(self.index()).copied().unwrap_or("?")
    }
}

/// Bonus effect carried by a tile
///
/// - **None**: plain tile
/// - **HorizontalLine**: clears its whole row when removed
/// - **VerticalLine**: clears its whole column when removed
/// - **Cross**: clears both its row and its column when removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SpecialKind {
    #[default]
    None,
    HorizontalLine,
    VerticalLine,
    Cross,
}

impl SpecialKind {
    pub fn is_special(self) -> bool {
        self != SpecialKind::None
    }

    /// Convert to lowercase string for the adapter protocol
    pub fn as_str(self) -> &'static str {
        match self {
            SpecialKind::None => "none",
            SpecialKind::HorizontalLine => "horizontal",
            SpecialKind::VerticalLine => "vertical",
            SpecialKind::Cross => "cross",
        }
    }
}

/// A tile: a color plus an optional special effect.
///
/// Equality and hashing use `color` only. Two tiles of the same color with
/// different special kinds are equal, which is exactly what match detection
/// relies on. Use [`Tile::is_identical`] for a structural comparison.
#[derive(Debug, Clone, Copy)]
pub struct Tile {
    pub color: ColorId,
    pub special: SpecialKind,
}

impl Tile {
    /// Create a plain tile
    pub const fn new(color: ColorId) -> Self {
        Self {
            color,
            special: SpecialKind::None,
        }
    }

    /// Create a tile carrying a special effect
    pub const fn special(color: ColorId, special: SpecialKind) -> Self {
        Self { color, special }
    }

    pub fn is_special(&self) -> bool {
        self.special.is_special()
    }

    /// Structural comparison: color and special kind.
    pub fn is_identical(&self, other: &Tile) -> bool {
        self.color == other.color && self.special == other.special
    }
}

impl PartialEq for Tile {
    fn eq(&self, other: &Self) -> bool {
        self.color == other.color
    }
}

impl Eq for Tile {}

impl Hash for Tile {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.color.hash(state);
    }
}

/// A cell on the grid
///
/// - `None`: empty cell (only observable while a removal/refill step runs)
/// - `Some(Tile)`: occupied cell
pub type Cell = Option<Tile>;

/// Grid coordinate, `(row, col)` with row 0 at the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub row: u8,
    pub col: u8,
}

impl Coord {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    pub fn in_bounds(self) -> bool {
        self.row < GRID_HEIGHT && self.col < GRID_WIDTH
    }

    /// Row-major flat index, or `None` when out of bounds
    #[inline(always)]
    pub fn index(self) -> Option<usize> {
        if !self.in_bounds() {
            return None;
        }
        Some((self.row as usize) * (GRID_WIDTH as usize) + (self.col as usize))
    }

    pub fn from_index(index: usize) -> Option<Self> {
        if index >= CELL_COUNT {
            return None;
        }
        let w = GRID_WIDTH as usize;
        Some(Self::new((index / w) as u8, (index % w) as u8))
    }

    /// True when the two coordinates are at Manhattan distance exactly 1
    pub fn is_adjacent(self, other: Coord) -> bool {
        self.row.abs_diff(other.row) as u16 + self.col.abs_diff(other.col) as u16 == 1
    }

    /// Neighbor to the right, if it exists
    pub fn right(self) -> Option<Coord> {
        (self.col + 1 < GRID_WIDTH).then(|| Coord::new(self.row, self.col + 1))
    }

    /// Neighbor below, if it exists
    pub fn below(self) -> Option<Coord> {
        (self.row + 1 < GRID_HEIGHT).then(|| Coord::new(self.row + 1, self.col))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Set of grid coordinates, one bit per cell.
///
/// Iteration is always row-major, which keeps every consumer deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CoordSet {
    bits: u64,
}

impl CoordSet {
    pub const fn new() -> Self {
        Self { bits: 0 }
    }

    /// Every coordinate in `row`
    pub fn row(row: u8) -> Self {
        (0..GRID_WIDTH).map(|col| Coord::new(row, col)).collect()
    }

    /// Every coordinate in `col`
    pub fn column(col: u8) -> Self {
        (0..GRID_HEIGHT).map(|row| Coord::new(row, col)).collect()
    }

    /// Insert a coordinate. Returns false if it was already present or out of bounds.
    pub fn insert(&mut self, coord: Coord) -> bool {
        let Some(idx) = coord.index() else {
            return false;
        };
        let mask = 1u64 << idx;
        let fresh = self.bits & mask == 0;
        self.bits |= mask;
        fresh
    }

    pub fn remove(&mut self, coord: Coord) -> bool {
        let Some(idx) = coord.index() else {
            return false;
        };
        let mask = 1u64 << idx;
        let present = self.bits & mask != 0;
        self.bits &= !mask;
        present
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord
            .index()
            .map(|idx| self.bits & (1u64 << idx) != 0)
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn clear(&mut self) {
        self.bits = 0;
    }

    pub fn union(&self, other: &CoordSet) -> CoordSet {
        CoordSet {
            bits: self.bits | other.bits,
        }
    }

    pub fn is_superset(&self, other: &CoordSet) -> bool {
        self.bits & other.bits == other.bits
    }

    /// Iterate coordinates in row-major order
    pub fn iter(&self) -> CoordSetIter {
        CoordSetIter { bits: self.bits }
    }

    /// Distinct columns touched by this set, ascending
    pub fn columns(&self) -> impl Iterator<Item = u8> + '_ {
        (0..GRID_WIDTH).filter(move |&col| {
            (0..GRID_HEIGHT).any(|row| self.contains(Coord::new(row, col)))
        })
    }

    /// Raw bit representation (bit `row * GRID_WIDTH + col`)
    pub fn bits(&self) -> u64 {
        self.bits
    }
}

impl FromIterator<Coord> for CoordSet {
    fn from_iter<I: IntoIterator<Item = Coord>>(iter: I) -> Self {
        let mut set = CoordSet::new();
        for c in iter {
            set.insert(c);
        }
        set
    }
}

impl Extend<Coord> for CoordSet {
    fn extend<I: IntoIterator<Item = Coord>>(&mut self, iter: I) {
        for c in iter {
            self.insert(c);
        }
    }
}

impl<'a> IntoIterator for &'a CoordSet {
    type Item = Coord;
    type IntoIter = CoordSetIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Row-major iterator over a [`CoordSet`].
#[derive(Debug, Clone)]
pub struct CoordSetIter {
    bits: u64,
}

impl Iterator for CoordSetIter {
    type Item = Coord;

    fn next(&mut self) -> Option<Coord> {
        if self.bits == 0 {
            return None;
        }
        let idx = self.bits.trailing_zeros() as usize;
        self.bits &= self.bits - 1;
        Coord::from_index(idx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.bits.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for CoordSetIter {}

/// A proposed swap between two adjacent cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Coord,
    pub to: Coord,
}

impl Move {
    /// Returns `None` unless `from` and `to` are adjacent
    pub fn new(from: Coord, to: Coord) -> Option<Self> {
        from.is_adjacent(to).then_some(Self { from, to })
    }
}

/// Commands accepted from input collaborators.
///
/// This is the only mutation path into a game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Pick a cell (first or second half of a swap)
    Select(Coord),
    /// Regenerate the grid and start over
    Restart,
    /// End the session
    Quit,
}

/// A special tile created after a large match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnedSpecial {
    pub coord: Coord,
    pub tile: Tile,
    /// Tile that occupied `coord` and was overwritten, if any.
    pub displaced: Option<Tile>,
}

/// One detect/resolve/remove/refill iteration of a cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CascadeStep {
    /// 1-based iteration index within the move
    pub step: u32,
    pub matches_found: CoordSet,
    /// Superset of `matches_found` after special-tile expansion
    pub removed: CoordSet,
    pub spawned: Option<SpawnedSpecial>,
    pub score_delta: u32,
    pub multiplier: u32,
}

/// Events emitted by the engine for presentation collaborators.
///
/// The stream is one-directional: nothing a consumer does with an event
/// feeds back into engine logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    Swapped { mv: Move },
    SwapRejected { mv: Move },
    CascadeStep(CascadeStep),
    Settled { score: u32 },
    GameOver { final_score: u32 },
}
