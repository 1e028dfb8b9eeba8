//! Start menu: palette size choice with the stored best per size.

use crate::fb::{CellStyle, FrameBuffer};
use crate::game_view::Viewport;
use crate::style;
use crate::types::{ColorId, MAX_COLORS, MIN_COLORS};

/// Best score per palette size, indexed from `MIN_COLORS`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuView {
    pub best: [u32; (MAX_COLORS - MIN_COLORS + 1) as usize],
}

impl MenuView {
    pub fn new(best: impl Fn(u8) -> u32) -> Self {
        let mut view = Self::default();
        for colors in MIN_COLORS..=MAX_COLORS {
            view.best[(colors - MIN_COLORS) as usize] = best(colors);
        }
        view
    }

    pub fn best_for(&self, colors: u8) -> Option<u32> {
        colors
            .checked_sub(MIN_COLORS)
            .and_then(|i| self.best.get(i as usize).copied())
    }

    pub fn render_into(&self, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(style::value().into_cell(' '));

        let w = viewport.width;
        let top = viewport.height.saturating_sub(12) / 2;

        fb.put_str_centered(0, w, top, "SWAP'EM!", style::banner());
        fb.put_str_centered(0, w, top + 2, "Select number of colors", style::label());

        // One column per palette size
        let col_w = 8u16;
        let count = (MAX_COLORS - MIN_COLORS + 1) as u16;
        let left = w.saturating_sub(col_w * count) / 2;
        for (i, colors) in (MIN_COLORS..=MAX_COLORS).enumerate() {
            let x = left + i as u16 * col_w;
            let y = top + 4;
            fb.put_char(x + col_w / 2 - 1, y, char::from(b'0' + colors), style::highlight());
            for c in 0..colors {
                let swatch = CellStyle::new(style::SCREEN_BG, style::tile_rgb(ColorId(c)));
                fb.put_char(x + (c as u16 % 4) + 2, y + 1 + c as u16 / 4, ' ', swatch);
            }
            let best = self.best[i];
            let digits = digit_count(best);
            fb.put_u32(x + (col_w.saturating_sub(digits)) / 2, y + 4, best, style::value());
        }

        fb.put_str_centered(0, w, top + 10, "press 5-8 to play  q quit", style::hint_text());
    }
}

fn digit_count(mut n: u32) -> u16 {
    let mut len = 1;
    while n >= 10 {
        n /= 10;
        len += 1;
    }
    len
}
