//! Match detection and special-effect expansion through the facade.

use swapem::core::{expand_removals, find_matches, ColorPalette, Grid, SeededRng};
use swapem::types::{ColorId, Coord, CoordSet, SpecialKind, Tile, GRID_HEIGHT, GRID_WIDTH};

/// Five-color stripes: no run of three anywhere.
fn striped_colors() -> [[u8; 8]; 8] {
    let mut rows = [[0u8; 8]; 8];
    for (r, row) in rows.iter_mut().enumerate() {
        for (c, cell) in row.iter_mut().enumerate() {
            *cell = ((r * 2 + c) % 5) as u8;
        }
    }
    rows
}

fn transpose(grid: &Grid) -> Grid {
    let mut rows = [[None; GRID_WIDTH as usize]; GRID_HEIGHT as usize];
    for r in 0..GRID_HEIGHT {
        for c in 0..GRID_WIDTH {
            rows[c as usize][r as usize] = grid.tile(Coord::new(r, c));
        }
    }
    Grid::from_rows(rows)
}

fn transpose_set(set: &CoordSet) -> CoordSet {
    set.iter().map(|c| Coord::new(c.col, c.row)).collect()
}

#[test]
fn test_detection_commutes_with_transpose() {
    let palette = ColorPalette::new(5).unwrap();
    for seed in 0..50 {
        let mut rng = SeededRng::new(seed);
        let grid = Grid::random(&palette, &mut rng);
        let direct = find_matches(&grid);
        let via_transpose = find_matches(&transpose(&grid));
        assert_eq!(transpose_set(&direct), via_transpose, "seed {}", seed);
    }
}

#[test]
fn test_striped_grid_has_no_matches() {
    let grid = Grid::from_colors(striped_colors());
    assert!(find_matches(&grid).is_empty());
}

#[test]
fn test_five_run_is_reported_whole() {
    let mut rows = striped_colors();
    for c in 1..6 {
        rows[6][c] = 7;
    }
    let matches = find_matches(&Grid::from_colors(rows));
    assert_eq!(matches.len(), 5);
    for c in 1..6 {
        assert!(matches.contains(Coord::new(6, c)));
    }
}

#[test]
fn test_special_and_plain_tiles_of_one_color_match() {
    let mut grid = Grid::from_colors(striped_colors());
    let seven = ColorId(7);
    grid.set(Coord::new(2, 3), Some(Tile::new(seven)));
    grid.set(
        Coord::new(2, 4),
        Some(Tile::special(seven, SpecialKind::HorizontalLine)),
    );
    grid.set(Coord::new(2, 5), Some(Tile::new(seven)));

    let matches = find_matches(&grid);
    assert_eq!(matches.len(), 3);
    assert!(matches.contains(Coord::new(2, 4)));

    // Equality itself ignores the special kind.
    assert_eq!(
        Tile::new(seven),
        Tile::special(seven, SpecialKind::Cross)
    );
    assert!(!Tile::new(seven).is_identical(&Tile::special(seven, SpecialKind::Cross)));
}

#[test]
fn test_cross_on_uniform_grid_clears_its_row_and_column() {
    let mut grid = Grid::from_colors([[0u8; 8]; 8]);
    let at = Coord::new(3, 5);
    grid.set(at, Some(Tile::special(ColorId(0), SpecialKind::Cross)));

    let matches = find_matches(&grid);
    let removed = expand_removals(&grid, &matches);

    let expected = CoordSet::row(3).union(&CoordSet::column(5)).union(&matches);
    assert_eq!(removed, expected);
}

#[test]
fn test_cross_in_match_removes_row_and_column() {
    let mut rows = striped_colors();
    rows[4][0] = 7;
    rows[4][1] = 7;
    rows[4][2] = 7;
    let mut grid = Grid::from_colors(rows);
    grid.set(
        Coord::new(4, 1),
        Some(Tile::special(ColorId(7), SpecialKind::Cross)),
    );

    let matches = find_matches(&grid);
    assert_eq!(matches.len(), 3);

    let removed = expand_removals(&grid, &matches);
    let expected = CoordSet::row(4).union(&CoordSet::column(1)).union(&matches);
    assert_eq!(removed, expected);
    assert_eq!(removed.len(), 15);
}

#[test]
fn test_chained_specials_expand_transitively() {
    let mut rows = striped_colors();
    rows[0][0] = 7;
    rows[0][1] = 7;
    rows[0][2] = 7;
    let mut grid = Grid::from_colors(rows);
    // Horizontal line in the match reaches a vertical line at (0, 6).
    grid.set(
        Coord::new(0, 0),
        Some(Tile::special(ColorId(7), SpecialKind::HorizontalLine)),
    );
    let far = grid.tile(Coord::new(0, 6)).unwrap();
    grid.set(
        Coord::new(0, 6),
        Some(Tile::special(far.color, SpecialKind::VerticalLine)),
    );

    let removed = expand_removals(&grid, &find_matches(&grid));
    assert_eq!(removed, CoordSet::row(0).union(&CoordSet::column(6)));
}
