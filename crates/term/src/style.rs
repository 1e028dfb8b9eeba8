//! Tile colors, special glyphs and shared styles.

use crate::fb::{CellStyle, Rgb};
use crate::types::{ColorId, SpecialKind};

pub const BOARD_BG: Rgb = Rgb::new(30, 30, 40);
pub const SCREEN_BG: Rgb = Rgb::new(0, 0, 0);

/// Screen colors of the palette, in palette order.
const TILE_COLORS: [Rgb; 8] = [
    Rgb::new(220, 50, 50),   // red
    Rgb::new(60, 100, 230),  // blue
    Rgb::new(60, 180, 75),   // green
    Rgb::new(240, 220, 60),  // yellow
    Rgb::new(150, 70, 200),  // purple
    Rgb::new(0, 200, 200),   // aqua
    Rgb::new(255, 105, 180), // hotpink
    Rgb::new(210, 105, 30),  // chocolate
];

pub fn tile_rgb(color: ColorId) -> Rgb {
    TILE_COLORS
        .get(color.index())
        .copied()
        .unwrap_or(Rgb::new(128, 128, 128))
}

/// Glyph drawn in the middle of a tile
pub fn special_glyph(kind: SpecialKind) -> char {
    match kind {
        SpecialKind::None => ' ',
        SpecialKind::HorizontalLine => '─',
        SpecialKind::VerticalLine => '│',
        SpecialKind::Cross => '┼',
    }
}

pub fn label() -> CellStyle {
    CellStyle::new(Rgb::new(220, 220, 220), SCREEN_BG).bold()
}

pub fn value() -> CellStyle {
    CellStyle::new(Rgb::new(200, 200, 200), SCREEN_BG)
}

pub fn hint_text() -> CellStyle {
    CellStyle::new(Rgb::new(140, 140, 150), SCREEN_BG).dim()
}

pub fn border() -> CellStyle {
    CellStyle::new(Rgb::new(200, 200, 200), SCREEN_BG)
}

pub fn banner() -> CellStyle {
    CellStyle::new(Rgb::new(255, 255, 255), SCREEN_BG).bold()
}

pub fn highlight() -> CellStyle {
    CellStyle::new(Rgb::new(255, 215, 0), SCREEN_BG).bold()
}
