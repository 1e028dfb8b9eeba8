//! Terminal input module (engine-facing).
//!
//! This module is independent of any UI layout. It maps `crossterm` key
//! events into [`InputAction`]s, and the [`Cursor`] turns cursor movement and
//! selection into engine [`crate::types::Command`]s.

pub mod cursor;
pub mod map;

pub use swapem_types as types;

pub use cursor::{Cursor, Direction};
pub use map::{handle_key_event, menu_choice, should_quit, InputAction};
