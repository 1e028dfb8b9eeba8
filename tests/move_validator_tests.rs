//! Deadlock detection and the rejected-swap no-op invariant.

use swapem::core::moves::{adjacent_pairs, swap_creates_match};
use swapem::core::{
    find_valid_move, has_valid_move, ColorPalette, GameSession, Grid, MemoryHighScores,
    SeededRng, SelectOutcome,
};
use swapem::types::Coord;

/// Three colors on diagonals: match-free and without a single matching swap.
fn deadlocked_colors() -> [[u8; 8]; 8] {
    let mut rows = [[0u8; 8]; 8];
    for (r, row) in rows.iter_mut().enumerate() {
        for (c, cell) in row.iter_mut().enumerate() {
            *cell = ((r + c) % 3) as u8;
        }
    }
    rows
}

#[test]
fn test_diagonal_pattern_is_deadlocked() {
    let grid = Grid::from_colors(deadlocked_colors());
    assert!(swapem::core::find_matches(&grid).is_empty());
    assert!(!has_valid_move(&grid));
    assert_eq!(find_valid_move(&grid), None);
}

#[test]
fn test_one_altered_tile_unlocks_a_move() {
    let mut rows = deadlocked_colors();
    // Row 0 becomes 0 0 2 0 ...: swapping (0,2) and (0,3) lines up three 0s.
    rows[0][1] = 0;
    let grid = Grid::from_colors(rows);
    assert!(swapem::core::find_matches(&grid).is_empty());
    assert!(has_valid_move(&grid));

    let mv = find_valid_move(&grid).unwrap();
    assert!(swap_creates_match(&grid, mv));
}

#[test]
fn test_adjacent_pairs_cover_the_board() {
    // 7 horizontal pairs per row and 7 vertical pairs per column.
    assert_eq!(adjacent_pairs().count(), 2 * 8 * 7);
    assert!(adjacent_pairs().all(|mv| mv.from.is_adjacent(mv.to)));
}

#[test]
fn test_rejected_swaps_leave_grid_identical() {
    let palette = ColorPalette::new(6).unwrap();
    let mut rng = SeededRng::new(2024);
    let grid = Grid::generate(&palette, &mut rng);

    let mut rejected = 0;
    for mv in adjacent_pairs().filter(|mv| !swap_creates_match(&grid, *mv)) {
        let mut session =
            GameSession::from_grid(grid, palette, SeededRng::new(1), MemoryHighScores::new());
        session.select(mv.from);
        assert_eq!(session.select(mv.to), SelectOutcome::Rejected(mv));
        assert!(session.grid().is_identical(&grid));
        assert_eq!(session.score(), 0);
        assert_eq!(session.selected(), None);
        rejected += 1;
    }
    assert!(rejected > 0);
}

#[test]
fn test_validation_does_not_touch_the_grid() {
    let grid = Grid::from_colors(deadlocked_colors());
    let before = grid;
    let _ = has_valid_move(&grid);
    let _ = swap_creates_match(
        &grid,
        swapem::types::Move::new(Coord::new(0, 0), Coord::new(0, 1)).unwrap(),
    );
    assert!(grid.is_identical(&before));
}
