//! Read-only view of a session for renderers and the adapter.

use crate::types::{Cell, Coord, GRID_HEIGHT, GRID_WIDTH};

/// Coarse session phase, as seen from outside
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    AwaitingFirstSelection,
    AwaitingSecondSelection,
    Settled,
    GameOver,
    Finished,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::AwaitingFirstSelection => "awaitingFirst",
            Phase::AwaitingSecondSelection => "awaitingSecond",
            Phase::Settled => "settled",
            Phase::GameOver => "gameOver",
            Phase::Finished => "finished",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSnapshot {
    pub tiles: [[Cell; GRID_WIDTH as usize]; GRID_HEIGHT as usize],
    pub phase: Phase,
    pub selected: Option<Coord>,
    pub colors: u8,
    pub score: u32,
    pub high_score: u32,
    /// Multiplier used by the last cascade step (0 before any move)
    pub last_multiplier: u32,
    /// Points gained by the last committed move
    pub last_gain: u32,
    pub last_steps: u32,
    pub moves: u32,
    pub episode_id: u32,
    pub game_over: bool,
    /// Score beats the best stored when the episode started
    pub new_high_score: bool,
}

impl GameSnapshot {
    /// True when the board accepts selections
    pub fn playable(&self) -> bool {
        !self.game_over && self.phase != Phase::Finished
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            tiles: [[None; GRID_WIDTH as usize]; GRID_HEIGHT as usize],
            phase: Phase::default(),
            selected: None,
            colors: 0,
            score: 0,
            high_score: 0,
            last_multiplier: 0,
            last_gain: 0,
            last_steps: 0,
            moves: 0,
            episode_id: 0,
            game_over: false,
            new_high_score: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_snapshot_is_empty_and_playable() {
        let snap = GameSnapshot::default();
        assert!(snap.tiles.iter().flatten().all(Option::is_none));
        assert_eq!(snap.phase, Phase::AwaitingFirstSelection);
        assert_eq!(snap.selected, None);
        assert_eq!(snap.score, 0);
        assert!(snap.playable());
    }
}
