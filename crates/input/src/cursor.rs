//! Board cursor
//!
//! The cursor is front-end state only. It never touches the engine; it turns
//! a selection into a [`Command::Select`] for the cell it sits on.

use crate::map::InputAction;
use crate::types::{Command, Coord, GRID_HEIGHT, GRID_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Cursor position on the grid, always in bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pos: Coord,
}

impl Cursor {
    /// Start in the middle of the board
    pub fn new() -> Self {
        Self {
            pos: Coord::new(GRID_HEIGHT / 2, GRID_WIDTH / 2),
        }
    }

    pub fn position(&self) -> Coord {
        self.pos
    }

    /// Jump to `coord`. Out-of-bounds targets are ignored.
    pub fn set(&mut self, coord: Coord) -> bool {
        if !coord.in_bounds() {
            return false;
        }
        self.pos = coord;
        true
    }

    /// Move one cell, stopping at the edges. Returns true if it moved.
    pub fn step(&mut self, dir: Direction) -> bool {
        let Coord { row, col } = self.pos;
        let next = match dir {
            Direction::Up => Coord::new(row.saturating_sub(1), col),
            Direction::Down => Coord::new((row + 1).min(GRID_HEIGHT - 1), col),
            Direction::Left => Coord::new(row, col.saturating_sub(1)),
            Direction::Right => Coord::new(row, (col + 1).min(GRID_WIDTH - 1)),
        };
        let moved = next != self.pos;
        self.pos = next;
        moved
    }

    /// Apply a board action. Returns the engine command it produces, if any;
    /// cursor moves are consumed here.
    pub fn apply(&mut self, action: InputAction) -> Option<Command> {
        match action {
            InputAction::Move(dir) => {
                self.step(dir);
                None
            }
            InputAction::Select => Some(Command::Select(self.pos)),
            InputAction::Restart => Some(Command::Restart),
            InputAction::Menu | InputAction::Hint => None,
        }
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}
