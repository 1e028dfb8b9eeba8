//! GameView: maps a `core::GameSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{GameSnapshot, Phase};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::style::{self, special_glyph, tile_rgb, BOARD_BG};
use crate::types::{Cell, Coord, Move, GRID_HEIGHT, GRID_WIDTH};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdapterStatusView {
    pub enabled: bool,
    pub client_count: u16,
    pub controller_id: Option<usize>,
}

/// Front-end state drawn on top of the snapshot (never part of the engine).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoardOverlay<'a> {
    pub cursor: Option<Coord>,
    pub hint: Option<Move>,
    /// Shown under the game-over banner
    pub tip: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// A lightweight terminal renderer for the board.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // 3 columns: bracket, glyph, bracket.
        Self {
            cell_w: 3,
            cell_h: 1,
            anchor_y: AnchorY::Center,
        }
    }
}

/// Where the board frame landed in the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frame {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

impl GameView {
    /// Cells narrower than 3 columns cannot show the cursor brackets.
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(3),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Board frame size (including border) in terminal cells
    pub fn frame_size(&self) -> (u16, u16) {
        (
            GRID_WIDTH as u16 * self.cell_w + 2,
            GRID_HEIGHT as u16 * self.cell_h + 2,
        )
    }

    /// Terminal position of the top-left character of grid cell `coord`
    /// for a given viewport.
    pub fn cell_origin(&self, viewport: Viewport, coord: Coord) -> (u16, u16) {
        let frame = self.frame(viewport);
        (
            frame.x + 1 + coord.col as u16 * self.cell_w,
            frame.y + 1 + coord.row as u16 * self.cell_h,
        )
    }

    fn frame(&self, viewport: Viewport) -> Frame {
        let (w, h) = self.frame_size();
        let x = viewport.width.saturating_sub(w) / 2;
        let y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(h + 2) / 2,
            AnchorY::Top => 0,
        };
        Frame { x, y, w, h }
    }

    /// Render the board into an existing framebuffer.
    ///
    /// Callers can reuse a framebuffer across frames and only resize when the
    /// terminal size changes.
    pub fn render_into(
        &self,
        snap: &GameSnapshot,
        overlay: &BoardOverlay<'_>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        self.render_into_with_adapter(snap, overlay, None, viewport, fb);
    }

    pub fn render_into_with_adapter(
        &self,
        snap: &GameSnapshot,
        overlay: &BoardOverlay<'_>,
        adapter: Option<&AdapterStatusView>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().into_cell(' '));

        let frame = self.frame(viewport);
        let bg = CellStyle::new(Rgb::new(80, 80, 90), BOARD_BG);
        fb.fill_rect(frame.x + 1, frame.y + 1, frame.w - 2, frame.h - 2, ' ', bg);
        self.draw_border(fb, frame, style::border());

        for row in 0..GRID_HEIGHT {
            for col in 0..GRID_WIDTH {
                let coord = Coord::new(row, col);
                let cell = snap.tiles[row as usize][col as usize];
                self.draw_tile(fb, viewport, coord, cell);
            }
        }

        if let Some(mv) = overlay.hint {
            for coord in [mv.from, mv.to] {
                self.draw_marks(fb, viewport, snap, coord, ('*', '*'), style::hint_text().bold());
            }
        }
        if let Some(selected) = snap.selected {
            self.draw_marks(fb, viewport, snap, selected, ('<', '>'), style::highlight());
        }
        if let Some(cursor) = overlay.cursor.filter(|_| snap.playable()) {
            let style = if snap.selected == Some(cursor) {
                style::highlight()
            } else {
                style::banner()
            };
            self.draw_marks(fb, viewport, snap, cursor, ('[', ']'), style);
        }

        self.draw_side_panel(fb, snap, adapter, viewport, frame);

        let below = frame.y.saturating_add(frame.h);
        if snap.game_over {
            self.draw_game_over(fb, snap, overlay.tip, viewport, frame);
        } else {
            fb.put_str_centered(
                0,
                viewport.width,
                below,
                "arrows/hjkl move  space select  ? hint  r restart  esc menu  q quit",
                style::hint_text(),
            );
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(
        &self,
        snap: &GameSnapshot,
        overlay: &BoardOverlay<'_>,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, overlay, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, frame: Frame, style: CellStyle) {
        let Frame { x, y, w, h } = frame;
        if w < 2 || h < 2 {
            return;
        }

        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);

        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    fn tile_style(cell: Cell) -> CellStyle {
        match cell {
            Some(tile) => CellStyle::new(Rgb::new(255, 255, 255), tile_rgb(tile.color)).bold(),
            None => CellStyle::new(Rgb::new(90, 90, 100), BOARD_BG).dim(),
        }
    }

    fn draw_tile(&self, fb: &mut FrameBuffer, viewport: Viewport, coord: Coord, cell: Cell) {
        let (px, py) = self.cell_origin(viewport, coord);
        let style = Self::tile_style(cell);
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ' ', style);

        let glyph = match cell {
            Some(tile) => special_glyph(tile.special),
            None => '·',
        };
        fb.put_char(px + self.cell_w / 2, py + self.cell_h / 2, glyph, style);
    }

    /// Bracket-style marks on the left and right edge of a cell, keeping its background.
    fn draw_marks(
        &self,
        fb: &mut FrameBuffer,
        viewport: Viewport,
        snap: &GameSnapshot,
        coord: Coord,
        (left, right): (char, char),
        style: CellStyle,
    ) {
        if !coord.in_bounds() {
            return;
        }
        let (px, py) = self.cell_origin(viewport, coord);
        let bg = Self::tile_style(snap.tiles[coord.row as usize][coord.col as usize]).bg;
        let style = CellStyle { bg, ..style };
        let mid = py + self.cell_h / 2;
        fb.put_char(px, mid, left, style);
        fb.put_char(px + self.cell_w - 1, mid, right, style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        adapter: Option<&AdapterStatusView>,
        viewport: Viewport,
        frame: Frame,
    ) {
        let panel_x = frame.x.saturating_add(frame.w).saturating_add(2);
        if panel_x >= viewport.width {
            return;
        }
        let panel_w = viewport.width - panel_x;
        if panel_w < 12 {
            return;
        }

        let label = style::label();
        let value = style::value();

        let mut y = frame.y;
        fb.put_str(panel_x, y, "SCORE", label);
        y = y.saturating_add(1);
        fb.put_u32(panel_x, y, snap.score, value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "BEST", label);
        y = y.saturating_add(1);
        fb.put_u32(panel_x, y, snap.high_score, value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "COLORS", label);
        fb.put_u32(panel_x + 7, y, snap.colors as u32, value);
        y = y.saturating_add(1);
        fb.put_str(panel_x, y, "MOVES", label);
        fb.put_u32(panel_x + 7, y, snap.moves, value);
        y = y.saturating_add(1);
        fb.put_str(panel_x, y, phase_label(snap.phase), style::hint_text());
        y = y.saturating_add(2);

        if snap.last_steps > 0 {
            fb.put_str(panel_x, y, "LAST", label);
            y = y.saturating_add(1);
            let mut x = panel_x;
            x += fb.put_str(x, y, "+", value);
            x += fb.put_u32(x, y, snap.last_gain, value);
            if snap.last_multiplier > 1 {
                x += fb.put_str(x, y, " x", style::highlight());
                fb.put_u32(x, y, snap.last_multiplier, style::highlight());
            }
            y = y.saturating_add(2);
        }

        fb.put_str(panel_x, y, "AI", label);
        match adapter {
            Some(st) if st.enabled => {
                fb.put_str(panel_x + 3, y, "ON", value);
                y = y.saturating_add(1);
                fb.put_str(panel_x, y, "clients", value.dim());
                fb.put_u32(panel_x + 8, y, st.client_count as u32, value);
                y = y.saturating_add(1);
                fb.put_str(panel_x, y, "ctrl", value.dim());
                match st.controller_id {
                    Some(id) => fb.put_u32(panel_x + 8, y, id as u32, value),
                    None => fb.put_str(panel_x + 8, y, "-", value),
                };
            }
            _ => {
                fb.put_str(panel_x + 3, y, "OFF", value);
            }
        }
    }

    fn draw_game_over(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        tip: Option<&str>,
        viewport: Viewport,
        frame: Frame,
    ) {
        let mid = frame.y.saturating_add(frame.h / 2);
        let inner_x = frame.x + 1;
        let inner_w = frame.w - 2;

        let banner = style::banner();
        fb.fill_rect(inner_x, mid.saturating_sub(1), inner_w, 3, ' ', banner);
        fb.put_str_centered(inner_x, inner_w, mid.saturating_sub(1), "GAME OVER", banner);

        let mut line = [0u8; SCORE_LINE_LEN];
        let score = format_score(&mut line, snap.score);
        fb.put_str_centered(inner_x, inner_w, mid, score, style::value());
        if snap.new_high_score {
            fb.put_str_centered(inner_x, inner_w, mid + 1, "NEW HIGH SCORE", style::highlight());
        }

        let below = frame.y.saturating_add(frame.h);
        if let Some(tip) = tip {
            fb.put_str_centered(0, viewport.width, below, tip, style::value());
        }
        fb.put_str_centered(
            0,
            viewport.width,
            below.saturating_add(1),
            "r play again  esc menu  q quit",
            style::hint_text(),
        );
    }
}

/// "Score: " plus the ten digits of `u32::MAX`
const SCORE_LINE_LEN: usize = 17;

/// "Score: N" into a stack buffer.
fn format_score(buf: &mut [u8; SCORE_LINE_LEN], score: u32) -> &str {
    const PREFIX: &[u8] = b"Score: ";
    buf[..PREFIX.len()].copy_from_slice(PREFIX);
    let mut digits = [0u8; 10];
    let mut n = score;
    let mut len = 0;
    loop {
        digits[len] = b'0' + (n % 10) as u8;
        len += 1;
        n /= 10;
        if n == 0 {
            break;
        }
    }
    for i in 0..len {
        buf[PREFIX.len() + i] = digits[len - 1 - i];
    }
    // ASCII only.
    std::str::from_utf8(&buf[..PREFIX.len() + len]).unwrap_or("Score")
}

/// Phase label for the status line
pub fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::AwaitingFirstSelection | Phase::Settled => "pick a tile",
        Phase::AwaitingSecondSelection => "pick a neighbor",
        Phase::GameOver => "no moves left",
        Phase::Finished => "bye",
    }
}
