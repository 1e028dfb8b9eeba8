//! Front-end state: start menu, board cursor, hint and game-over tip.
//!
//! `App` owns the session and turns key presses into engine commands. It has
//! no terminal I/O of its own, so the whole menu/board flow can be driven from
//! tests with synthetic key events.

use crossterm::event::KeyEvent;
use tracing::info;

use crate::core::{ColorPalette, GameSession, GameSnapshot, HighScoreStore, SeededRng, TileRng};
use crate::input::{handle_key_event, menu_choice, should_quit, Cursor, InputAction};
use crate::term::{
    random_tip, AdapterStatusView, BoardOverlay, FrameBuffer, GameView, MenuView, Viewport,
};
use crate::types::{Command, EngineEvent, Move};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Board,
}

/// What the main loop should do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

pub struct App<R: TileRng, H: HighScoreStore> {
    session: GameSession<R, H>,
    screen: Screen,
    cursor: Cursor,
    hint: Option<Move>,
    tip: Option<&'static str>,
    tip_rng: SeededRng,
    /// Set when the board was replaced without a cascade (restart, palette change)
    fresh_board: bool,
    snap: GameSnapshot,
    view: GameView,
}

impl<R: TileRng, H: HighScoreStore> App<R, H> {
    /// `skip_menu` starts directly on the board with the session's palette.
    pub fn new(session: GameSession<R, H>, tip_seed: u64, skip_menu: bool) -> Self {
        Self {
            session,
            screen: if skip_menu { Screen::Board } else { Screen::Menu },
            cursor: Cursor::new(),
            hint: None,
            tip: None,
            tip_rng: SeededRng::new(tip_seed),
            fresh_board: false,
            snap: GameSnapshot::default(),
            view: GameView::default(),
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn session(&self) -> &GameSession<R, H> {
        &self.session
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn hint(&self) -> Option<Move> {
        self.hint
    }

    pub fn tip(&self) -> Option<&'static str> {
        self.tip
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Control {
        if should_quit(key) {
            self.session.quit();
            return Control::Quit;
        }

        match self.screen {
            Screen::Menu => {
                if let Some(colors) = menu_choice(key) {
                    self.start(colors);
                }
            }
            Screen::Board => {
                let Some(action) = handle_key_event(key) else {
                    return Control::Continue;
                };
                match action {
                    InputAction::Menu => self.to_menu(),
                    InputAction::Hint => self.hint = self.session.hint(),
                    _ => {
                        if let Some(command) = self.cursor.apply(action) {
                            self.apply_command(command);
                        }
                    }
                }
            }
        }

        if self.session.is_finished() {
            Control::Quit
        } else {
            Control::Continue
        }
    }

    /// Leave the board. The running score is recorded and the board reset.
    fn to_menu(&mut self) {
        self.session.restart();
        self.fresh_board = true;
        self.clear_overlay();
        self.screen = Screen::Menu;
    }

    /// Start playing with `colors` from the menu.
    fn start(&mut self, colors: u8) {
        let Ok(palette) = ColorPalette::new(colors) else {
            return;
        };
        if palette != self.session.palette() {
            self.session.change_palette(palette);
            self.fresh_board = true;
        }
        info!(colors, "starting game");
        self.clear_overlay();
        self.cursor = Cursor::new();
        self.screen = Screen::Board;
    }

    fn clear_overlay(&mut self) {
        self.hint = None;
        self.tip = None;
    }

    /// Apply a command from the keyboard or a remote controller.
    ///
    /// Remote commands also work while the menu is shown; a restart from a
    /// remote client brings the board back.
    pub fn apply_command(&mut self, command: Command) -> bool {
        self.hint = None;
        let applied = self.session.apply_command(command);
        if applied && command == Command::Restart {
            self.fresh_board = true;
            self.screen = Screen::Board;
        }

        if self.session.game_over() {
            if self.tip.is_none() {
                self.tip = Some(random_tip(&mut self.tip_rng));
            }
        } else {
            self.tip = None;
        }
        applied
    }

    pub fn take_events(&mut self) -> Vec<EngineEvent> {
        self.session.take_events()
    }

    /// True once after the board was replaced by a restart or palette change.
    pub fn take_fresh_board(&mut self) -> bool {
        std::mem::take(&mut self.fresh_board)
    }

    pub fn snapshot(&mut self) -> &GameSnapshot {
        self.session.snapshot_into(&mut self.snap);
        &self.snap
    }

    pub fn render_into(
        &mut self,
        viewport: Viewport,
        adapter: Option<&AdapterStatusView>,
        fb: &mut FrameBuffer,
    ) {
        match self.screen {
            Screen::Menu => {
                let store = self.session.store();
                MenuView::new(|colors| store.load_high_score(colors)).render_into(viewport, fb);
            }
            Screen::Board => {
                self.session.snapshot_into(&mut self.snap);
                let overlay = BoardOverlay {
                    cursor: Some(self.cursor.position()),
                    hint: self.hint,
                    tip: self.tip,
                };
                self.view
                    .render_into_with_adapter(&self.snap, &overlay, adapter, viewport, fb);
            }
        }
    }
}
