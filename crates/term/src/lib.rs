//! Terminal rendering for the match-3 board.
//!
//! Screens render into a plain framebuffer; `TerminalRenderer` flushes it to
//! the terminal, emitting only the cells that changed since the last frame.
//! Nothing here reaches into the engine beyond reading a `GameSnapshot`.

pub mod fb;
pub mod game_view;
pub mod menu_view;
pub mod renderer;
pub mod style;
pub mod tips;

pub use swapem_core as core;
pub use swapem_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{AdapterStatusView, AnchorY, BoardOverlay, GameView, Viewport};
pub use menu_view::MenuView;
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
pub use tips::random_tip;
