//! Core game logic module - pure, deterministic, and testable
//!
//! This crate holds the match-and-cascade engine: match detection, chained
//! special-tile effects, gravity and refill, chain-multiplied scoring, and
//! deadlock detection, tied together by a session state machine.
//! It does no terminal or network I/O, making it:
//!
//! - **Deterministic**: the same seed replays the same game (all randomness is injected)
//! - **Testable**: every rule can be driven from a hand-built grid
//! - **Portable**: runs in the terminal front-end, the adapter, or headless
//!
//! # Module Structure
//!
//! - [`grid`]: 8x8 grid of optional tiles
//! - [`palette`]: the session's active colors (5 to 8)
//! - [`rng`]: injectable random source ([`SeededRng`], [`ScriptedRng`])
//! - [`matcher`]: runs of three or more same-color tiles
//! - [`effects`]: chain expansion of special tiles into a removal set
//! - [`spawner`]: special tile creation for matches of four or more
//! - [`gravity`]: per-column collapse and refill
//! - [`scoring`]: tier points, size bonus, chain multiplier
//! - [`moves`]: swap validation and deadlock detection
//! - [`cascade`]: the detect/resolve/remove/refill loop
//! - [`session`]: the move -> cascade -> settle state machine
//! - [`highscore`]: persistence collaborator interface
//! - [`snapshot`]: copyable view for renderers
//!
//! # Rules
//!
//! - **Matching**: tiles compare by color only; special kind is ignored
//! - **Specials**: 4-match spawns a horizontal line, 5-match a vertical line,
//!   6+ a cross; a removed special clears its row, column, or both
//! - **Scoring**: 3 => 30, 4 => 50, 5 => 100, 6+ => 200, plus 10 per tile
//!   beyond three, all times the chain multiplier (1 to 5)
//! - **Deadlock**: when no adjacent swap makes a match, the game is over
//!
//! # Example
//!
//! ```
//! use swapem_core::{ColorPalette, GameSession};
//! use swapem_core::types::Command;
//!
//! let palette = ColorPalette::new(6).unwrap();
//! let mut game = GameSession::with_seed(palette, 12345);
//!
//! // Play the first legal move
//! let mv = game.hint().expect("fresh grids always have a move");
//! game.apply_command(Command::Select(mv.from));
//! game.apply_command(Command::Select(mv.to));
//!
//! assert!(game.score() >= 30);
//! assert!(game.grid().is_full());
//! ```

pub mod cascade;
pub mod effects;
pub mod gravity;
pub mod grid;
pub mod highscore;
pub mod matcher;
pub mod moves;
pub mod palette;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;
pub mod spawner;

pub use swapem_types as types;

// Re-export commonly used types for convenience
pub use cascade::{resolve_cascade, CascadeContext, CascadeSummary};
pub use effects::expand_removals;
pub use grid::Grid;
pub use highscore::{HighScoreStore, MemoryHighScores};
pub use matcher::find_matches;
pub use moves::{find_valid_move, has_valid_move};
pub use palette::{ColorPalette, PaletteError};
pub use rng::{ScriptedRng, SeededRng, TileRng};
pub use scoring::{calculate_score, ScoreResult};
pub use session::{GameSession, SelectOutcome, SessionState};
pub use snapshot::{GameSnapshot, Phase};
pub use spawner::spawn_special;
