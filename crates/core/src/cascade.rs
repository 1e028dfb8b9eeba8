//! Cascade resolution
//!
//! One committed move triggers a cascade. Each iteration runs, in order:
//!
//! 1. Detect matches (stop when none remain)
//! 2. Expand the match set through special effects
//! 3. Score the raw match size at the current multiplier
//! 4. Remove the expanded set
//! 5. Spawn at most one special tile for the raw match set
//! 6. Collapse and refill
//! 7. Bump the multiplier (capped)
//!
//! The grid is fully occupied whenever a step returns.

use tracing::{debug, warn};

use crate::effects::expand_removals;
use crate::gravity::settle;
use crate::grid::Grid;
use crate::matcher::find_matches;
use crate::palette::ColorPalette;
use crate::rng::TileRng;
use crate::scoring::{calculate_score, next_multiplier};
use crate::spawner::spawn_special;
use crate::types::{CascadeStep, CELL_COUNT};

/// Upper bound on iterations for a single move's cascade
pub const MAX_CASCADE_STEPS: u32 = CELL_COUNT as u32;

/// Per-move cascade state. Starts at multiplier 1 for every move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CascadeContext {
    pub chain_multiplier: u32,
    pub score_accumulator: u32,
    /// Iterations completed so far
    pub steps: u32,
}

impl CascadeContext {
    pub fn new() -> Self {
        Self {
            chain_multiplier: 1,
            score_accumulator: 0,
            steps: 0,
        }
    }
}

impl Default for CascadeContext {
    fn default() -> Self {
        Self::new()
    }
}

/// What a finished cascade did, for the UI side panel and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CascadeSummary {
    pub steps: u32,
    pub total_score: u32,
    pub peak_multiplier: u32,
    pub tiles_removed: u32,
    pub specials_spawned: u32,
    /// The iteration bound stopped the loop
    pub truncated: bool,
}

impl CascadeSummary {
    fn record(&mut self, step: &CascadeStep) {
        self.steps = step.step;
        self.total_score = self.total_score.saturating_add(step.score_delta);
        self.peak_multiplier = self.peak_multiplier.max(step.multiplier);
        self.tiles_removed += step.removed.len() as u32;
        if step.spawned.is_some() {
            self.specials_spawned += 1;
        }
    }
}

/// Run one detect/resolve/remove/refill iteration.
///
/// Returns `None` (and changes nothing) when the grid has no match.
pub fn cascade_step<R: TileRng>(
    grid: &mut Grid,
    palette: &ColorPalette,
    rng: &mut R,
    ctx: &mut CascadeContext,
) -> Option<CascadeStep> {
    let matches = find_matches(grid);
    if matches.is_empty() {
        return None;
    }

    let removed = expand_removals(grid, &matches);
    let multiplier = ctx.chain_multiplier;
    let score = calculate_score(matches.len(), multiplier);

    grid.remove_all(&removed);
    let spawned = spawn_special(grid, &matches, palette, rng);
    settle(grid, palette, rng);

    ctx.steps += 1;
    ctx.score_accumulator = ctx.score_accumulator.saturating_add(score.total);
    ctx.chain_multiplier = next_multiplier(multiplier);

    debug!(
        step = ctx.steps,
        matched = matches.len(),
        removed = removed.len(),
        multiplier,
        points = score.total,
        spawned = ?spawned.map(|s| s.tile.special),
        "cascade step"
    );

    Some(CascadeStep {
        step: ctx.steps,
        matches_found: matches,
        removed,
        spawned,
        score_delta: score.total,
        multiplier,
    })
}

/// Resolve cascades until the grid is stable, reporting each step to `on_step`.
pub fn resolve_cascade<R, F>(
    grid: &mut Grid,
    palette: &ColorPalette,
    rng: &mut R,
    ctx: &mut CascadeContext,
    mut on_step: F,
) -> CascadeSummary
where
    R: TileRng,
    F: FnMut(&CascadeStep),
{
    let mut summary = CascadeSummary::default();

    while let Some(step) = cascade_step(grid, palette, rng, ctx) {
        summary.record(&step);
        on_step(&step);

        if ctx.steps >= MAX_CASCADE_STEPS {
            summary.truncated = !find_matches(grid).is_empty();
            if summary.truncated {
                warn!(steps = ctx.steps, "cascade hit iteration bound; stopping");
            }
            break;
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{ScriptedRng, SeededRng};
    use crate::types::{ColorId, Coord, SpecialKind, Tile};

    /// Five-color stripes with no matches anywhere.
    fn striped() -> Grid {
        let mut rows = [[0u8; 8]; 8];
        for (r, row) in rows.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = ((r * 2 + c) % 5) as u8;
            }
        }
        Grid::from_colors(rows)
    }

    #[test]
    fn test_stable_grid_is_untouched() {
        let palette = ColorPalette::new(5).unwrap();
        let mut grid = striped();
        let before = grid;
        let mut rng = ScriptedRng::new([0]);
        let mut ctx = CascadeContext::new();

        assert!(cascade_step(&mut grid, &palette, &mut rng, &mut ctx).is_none());
        let summary = resolve_cascade(&mut grid, &palette, &mut rng, &mut ctx, |_| {});
        assert_eq!(summary, CascadeSummary::default());
        assert_eq!(grid, before);
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn test_single_step_scores_and_refills() {
        let palette = ColorPalette::new(8).unwrap();
        let mut grid = striped();
        for col in 0..3 {
            grid.set(Coord::new(7, col), Some(Tile::new(ColorId(7))));
        }
        // Refill draws land on row 0 of columns 0..3
        let mut rng = ScriptedRng::new([5, 6, 5]);
        let mut ctx = CascadeContext::new();

        let step = cascade_step(&mut grid, &palette, &mut rng, &mut ctx).unwrap();
        assert_eq!(step.step, 1);
        assert_eq!(step.matches_found.len(), 3);
        assert_eq!(step.removed, step.matches_found);
        assert_eq!(step.score_delta, 30);
        assert_eq!(step.multiplier, 1);
        assert!(step.spawned.is_none());
        assert!(grid.is_full());
        assert_eq!(ctx.chain_multiplier, 2);
        assert_eq!(ctx.score_accumulator, 30);
    }

    #[test]
    fn test_special_in_match_clears_line() {
        let palette = ColorPalette::new(8).unwrap();
        let mut grid = striped();
        grid.set(
            Coord::new(7, 0),
            Some(Tile::special(ColorId(7), SpecialKind::HorizontalLine)),
        );
        grid.set(Coord::new(7, 1), Some(Tile::new(ColorId(7))));
        grid.set(Coord::new(7, 2), Some(Tile::new(ColorId(7))));

        let mut rng = SeededRng::new(11);
        let mut ctx = CascadeContext::new();
        let step = cascade_step(&mut grid, &palette, &mut rng, &mut ctx).unwrap();

        assert_eq!(step.matches_found.len(), 3);
        assert_eq!(step.removed.len(), 8);
        // Scored by raw match size, not by removal size
        assert_eq!(step.score_delta, 30);
        assert!(grid.is_full());
    }

    #[test]
    fn test_four_match_spawns_special() {
        let palette = ColorPalette::new(8).unwrap();
        let mut grid = striped();
        for col in 2..6 {
            grid.set(Coord::new(7, col), Some(Tile::new(ColorId(7))));
        }
        let mut rng = SeededRng::new(5);
        let mut ctx = CascadeContext::new();
        let step = cascade_step(&mut grid, &palette, &mut rng, &mut ctx).unwrap();

        let spawned = step.spawned.expect("4-match spawns a special tile");
        assert_eq!(spawned.tile.special, SpecialKind::HorizontalLine);
        assert!((2..6).contains(&spawned.coord.col));
        assert_eq!(step.score_delta, 60);
        // The column fell by one, so the special now sits on row 1
        let landed = grid.tile(Coord::new(1, spawned.coord.col)).unwrap();
        assert!(landed.is_identical(&spawned.tile));
    }

    #[test]
    fn test_multiplier_increases_across_steps() {
        let palette = ColorPalette::new(5).unwrap();
        for seed in 0..50 {
            let mut grid = Grid::random(&palette, &mut SeededRng::new(seed));
            let mut rng = SeededRng::new(seed + 1000);
            let mut ctx = CascadeContext::new();
            let mut multipliers = Vec::new();
            let summary = resolve_cascade(&mut grid, &palette, &mut rng, &mut ctx, |s| {
                multipliers.push(s.multiplier)
            });

            let expected: Vec<u32> = (1..=multipliers.len() as u32).map(|i| i.min(5)).collect();
            assert_eq!(multipliers, expected);
            assert_eq!(summary.steps as usize, multipliers.len());
            assert_eq!(summary.total_score, ctx.score_accumulator);
            assert!(grid.is_full());
            assert!(!summary.truncated);
            assert!(find_matches(&grid).is_empty());
        }
    }
}
