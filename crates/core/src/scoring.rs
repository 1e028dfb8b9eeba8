//! Scoring module - match points and the chain multiplier
//!
//! Points are keyed to the raw match size of a detection pass, never to the
//! size of the removal set after special-tile expansion:
//! - Base tier: 3 => 30, 4 => 50, 5 => 100, 6+ => 200
//! - Size bonus: 10 per tile beyond the third
//!
//! Both parts are multiplied by the chain multiplier of the current
//! cascade step.

use crate::types::{BONUS_PER_EXTRA_TILE, MATCH_SCORES, MAX_CHAIN_MULTIPLIER, MIN_MATCH_LEN};

/// Score calculation result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreResult {
    /// Tier points, multiplied.
    pub base: u32,
    /// Extra-tile bonus, multiplied.
    pub bonus: u32,
    pub total: u32,
}

/// Base tier points for a match of `size` tiles (before the multiplier)
pub fn base_score(size: usize) -> u32 {
    if size < MIN_MATCH_LEN {
        return 0;
    }
    MATCH_SCORES[size.min(MATCH_SCORES.len() - 1)]
}

/// Bonus for tiles beyond the third (before the multiplier)
pub fn size_bonus(size: usize) -> u32 {
    let extra = size.saturating_sub(MIN_MATCH_LEN) as u32;
    extra.saturating_mul(BONUS_PER_EXTRA_TILE)
}

/// Calculate the points for one detection pass
pub fn calculate_score(match_size: usize, multiplier: u32) -> ScoreResult {
    let base = base_score(match_size).saturating_mul(multiplier);
    let bonus = if match_size < MIN_MATCH_LEN {
        0
    } else {
        size_bonus(match_size).saturating_mul(multiplier)
    };
    ScoreResult {
        base,
        bonus,
        total: base.saturating_add(bonus),
    }
}

/// Multiplier for the next cascade step
pub fn next_multiplier(current: u32) -> u32 {
    current.saturating_add(1).min(MAX_CHAIN_MULTIPLIER)
}
