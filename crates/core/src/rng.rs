//! RNG module - injectable randomness for tile generation
//!
//! The engine never reads a global random source. Every operation that needs
//! randomness (grid generation, refill, special-tile placement and color) takes
//! a [`TileRng`] so that a fixed seed replays a game exactly.
//!
//! Two providers ship with the crate:
//!
//! - [`SeededRng`]: `rand`'s `SmallRng` seeded from a `u64`, used by real sessions
//! - [`ScriptedRng`]: replays a fixed index sequence, for tests and fixtures

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::palette::ColorPalette;
use crate::types::{ColorId, Tile};

/// Random source used by the engine.
pub trait TileRng {
    /// Uniform index in `[0, bound)`. `bound` is always non-zero.
    fn next_index(&mut self, bound: usize) -> usize;

    /// Uniform color from the active palette
    fn next_color(&mut self, palette: &ColorPalette) -> ColorId {
        ColorId(self.next_index(palette.len()) as u8)
    }

    /// Uniform element of `items`, or `None` if it is empty
    fn choose<T: Copy>(&mut self, items: &[T]) -> Option<T>
    where
        Self: Sized,
    {
        if items.is_empty() {
            return None;
        }
        Some(items[self.next_index(items.len())])
    }

    /// Fresh plain tile drawn from the palette
    fn random_tile(&mut self, palette: &ColorPalette) -> Tile {
        Tile::new(self.next_color(palette))
    }
}

impl<R: TileRng> TileRng for &mut R {
    fn next_index(&mut self, bound: usize) -> usize {
        (**self).next_index(bound)
    }
}

/// Seeded generator backed by `SmallRng`.
#[derive(Debug, Clone)]
pub struct SeededRng {
    seed: u64,
    rng: SmallRng,
}

impl SeededRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// The seed this generator was created with (for replaying a session)
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for SeededRng {
    fn default() -> Self {
        Self::new(1)
    }
}

impl TileRng for SeededRng {
    fn next_index(&mut self, bound: usize) -> usize {
        self.rng.random_range(0..bound)
    }
}

/// Replays a fixed sequence of indices, wrapping around at the end.
///
/// Each scripted value is reduced modulo the requested bound, so the same
/// script works for palette draws and column choices alike.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRng {
    script: Vec<usize>,
    pos: usize,
}

impl ScriptedRng {
    pub fn new(script: impl Into<Vec<usize>>) -> Self {
        Self {
            script: script.into(),
            pos: 0,
        }
    }

    /// Number of values consumed so far
    pub fn draws(&self) -> usize {
        self.pos
    }
}

impl TileRng for ScriptedRng {
    fn next_index(&mut self, bound: usize) -> usize {
        if self.script.is_empty() {
            return 0;
        }
        let v = self.script[self.pos % self.script.len()];
        self.pos += 1;
        v % bound
    }
}
