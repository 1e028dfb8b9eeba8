//! High-score collaborator
//!
//! The engine only knows this interface. Storage format and location belong
//! to the implementor (see the `swapem-store` crate for the JSON file store).

use crate::types::{MAX_COLORS, MIN_COLORS};

/// Best score per palette size.
pub trait HighScoreStore {
    /// Stored best for `colors`, or 0 when nothing valid is stored
    fn load_high_score(&self, colors: u8) -> u32;

    /// Record `score` as the best for `colors`
    fn save_high_score(&mut self, colors: u8, score: u32);
}

impl<S: HighScoreStore + ?Sized> HighScoreStore for &mut S {
    fn load_high_score(&self, colors: u8) -> u32 {
        (**self).load_high_score(colors)
    }

    fn save_high_score(&mut self, colors: u8, score: u32) {
        (**self).save_high_score(colors, score)
    }
}

impl<S: HighScoreStore + ?Sized> HighScoreStore for Box<S> {
    fn load_high_score(&self, colors: u8) -> u32 {
        (**self).load_high_score(colors)
    }

    fn save_high_score(&mut self, colors: u8, score: u32) {
        (**self).save_high_score(colors, score)
    }
}

/// In-memory store, one slot per supported palette size. Nothing persists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryHighScores {
    scores: [u32; (MAX_COLORS - MIN_COLORS + 1) as usize],
    saves: u32,
}

impl MemoryHighScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times `save_high_score` was called
    pub fn saves(&self) -> u32 {
        self.saves
    }

    fn slot(colors: u8) -> Option<usize> {
        (MIN_COLORS..=MAX_COLORS)
            .contains(&colors)
            .then(|| (colors - MIN_COLORS) as usize)
    }
}

impl HighScoreStore for MemoryHighScores {
    fn load_high_score(&self, colors: u8) -> u32 {
        Self::slot(colors).map(|i| self.scores[i]).unwrap_or(0)
    }

    fn save_high_score(&mut self, colors: u8, score: u32) {
        if let Some(i) = Self::slot(colors) {
            self.scores[i] = score;
            self.saves += 1;
        }
    }
}
