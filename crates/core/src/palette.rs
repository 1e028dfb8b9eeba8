//! Active color palette for a session.
//!
//! The palette is fixed for an episode; changing it restarts the session. It is
//! passed explicitly to every call that creates tiles.

use thiserror::Error;

use crate::types::{ColorId, MAX_COLORS, MIN_COLORS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PaletteError {
    #[error("unsupported palette size {0} (expected 5..=8)")]
    UnsupportedSize(u8),
}

/// Ordered set of `N` active colors, `ColorId(0)..ColorId(N)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorPalette {
    size: u8,
}

impl ColorPalette {
    pub fn new(size: u8) -> Result<Self, PaletteError> {
        if !(MIN_COLORS..=MAX_COLORS).contains(&size) {
            return Err(PaletteError::UnsupportedSize(size));
        }
        Ok(Self { size })
    }

    pub fn len(&self) -> usize {
        self.size as usize
    }

    /// Palette size as configured (5..=8)
    pub fn size(&self) -> u8 {
        self.size
    }

    pub fn contains(&self, color: ColorId) -> bool {
        color.0 < self.size
    }

    /// Color at `index`, if it is part of the palette
    pub fn get(&self, index: usize) -> Option<ColorId> {
        (index < self.len()).then(|| ColorId(index as u8))
    }

    pub fn colors(&self) -> impl Iterator<Item = ColorId> {
        (0..self.size).map(ColorId)
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self {
            size: crate::types::DEFAULT_COLORS,
        }
    }
}

impl TryFrom<u8> for ColorPalette {
    type Error = PaletteError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_sizes() {
        for n in MIN_COLORS..=MAX_COLORS {
            let p = ColorPalette::new(n).unwrap();
            assert_eq!(p.len(), n as usize);
            assert_eq!(p.colors().count(), n as usize);
        }
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(ColorPalette::new(4), Err(PaletteError::UnsupportedSize(4)));
        assert_eq!(ColorPalette::new(9), Err(PaletteError::UnsupportedSize(9)));
    }

    #[test]
    fn membership() {
        let p = ColorPalette::new(5).unwrap();
        assert!(p.contains(ColorId(4)));
        assert!(!p.contains(ColorId(5)));
        assert_eq!(p.get(5), None);
        assert_eq!(p.get(0), Some(ColorId(0)));
    }
}
