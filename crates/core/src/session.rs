//! Game session - the move -> cascade -> settle state machine
//!
//! The session exclusively owns the grid, the palette, the random source and
//! the high-score collaborator. Collaborators drive it through
//! [`GameSession::select`], [`GameSession::restart`] and [`GameSession::quit`]
//! (or [`GameSession::apply_command`]) and observe it through snapshots and the
//! queued [`EngineEvent`]s.
//!
//! # States
//!
//! ```text
//! AwaitingFirstSelection --select--> AwaitingSecondSelection
//! AwaitingSecondSelection --select non-adjacent--> AwaitingSecondSelection (new first pick)
//! AwaitingSecondSelection --select adjacent, no match--> AwaitingFirstSelection
//! AwaitingSecondSelection --select adjacent, match--> Resolving --> Settled | GameOver
//! Settled --select--> AwaitingSecondSelection
//! any --restart--> AwaitingFirstSelection
//! ```
//!
//! A move resolves synchronously: `Resolving` is never observable between calls.

use tracing::{debug, info};

use crate::cascade::{resolve_cascade, CascadeContext, CascadeSummary};
use crate::grid::Grid;
use crate::highscore::{HighScoreStore, MemoryHighScores};
use crate::moves::{find_valid_move, has_valid_move, swap_creates_match};
use crate::palette::ColorPalette;
use crate::rng::{SeededRng, TileRng};
use crate::snapshot::{GameSnapshot, Phase};
use crate::types::{Command, Coord, EngineEvent, Move};

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingFirstSelection,
    AwaitingSecondSelection { first: Coord },
    Resolving(CascadeContext),
    Settled,
    GameOver,
}

/// Result of a [`GameSession::select`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Out of bounds, game over or session finished: nothing changed
    Ignored,
    /// First half of a swap picked
    FirstSelected(Coord),
    /// A non-adjacent second pick replaced the first pick
    Reselected(Coord),
    /// Adjacent swap without a match: grid unchanged, selection cleared
    Rejected(Move),
    /// Swap committed and fully resolved
    Resolved {
        mv: Move,
        summary: CascadeSummary,
        game_over: bool,
    },
}

/// A running game
#[derive(Debug)]
pub struct GameSession<R: TileRng = SeededRng, H: HighScoreStore = MemoryHighScores> {
    grid: Grid,
    palette: ColorPalette,
    rng: R,
    store: H,
    state: SessionState,
    score: u32,
    /// Best stored for the palette size (updated when we save)
    best: u32,
    /// Best stored when the current episode began
    episode_best: u32,
    moves: u32,
    /// Monotonic episode id (increments on restart).
    episode_id: u32,
    last_summary: Option<CascadeSummary>,
    /// Pending events (drained by observers).
    events: Vec<EngineEvent>,
    finished: bool,
}

impl GameSession<SeededRng, MemoryHighScores> {
    /// Session with a seeded generator and an in-memory high-score table
    pub fn with_seed(palette: ColorPalette, seed: u64) -> Self {
        Self::new(palette, SeededRng::new(seed), MemoryHighScores::new())
    }
}

impl<R: TileRng, H: HighScoreStore> GameSession<R, H> {
    /// Create a session and generate its starting grid
    pub fn new(palette: ColorPalette, mut rng: R, store: H) -> Self {
        let grid = Self::starting_grid(&palette, &mut rng);
        let best = store.load_high_score(palette.size());
        info!(colors = palette.size(), best, "session started");

        Self {
            grid,
            palette,
            rng,
            store,
            state: SessionState::AwaitingFirstSelection,
            score: 0,
            best,
            episode_best: best,
            moves: 0,
            episode_id: 0,
            last_summary: None,
            events: Vec::new(),
            finished: false,
        }
    }

    /// Resume from an explicit grid (fixtures, replays). The grid is taken as is.
    pub fn from_grid(grid: Grid, palette: ColorPalette, rng: R, store: H) -> Self {
        let best = store.load_high_score(palette.size());
        Self {
            grid,
            palette,
            rng,
            store,
            state: SessionState::AwaitingFirstSelection,
            score: 0,
            best,
            episode_best: best,
            moves: 0,
            episode_id: 0,
            last_summary: None,
            events: Vec::new(),
            finished: false,
        }
    }

    // Match-free and with at least one legal move.
    fn starting_grid(palette: &ColorPalette, rng: &mut R) -> Grid {
        loop {
            let grid = Grid::generate(palette, rng);
            if has_valid_move(&grid) {
                return grid;
            }
            debug!("generated grid is deadlocked; re-rolling");
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn palette(&self) -> ColorPalette {
        self.palette
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Pending first pick, if any
    pub fn selected(&self) -> Option<Coord> {
        match self.state {
            SessionState::AwaitingSecondSelection { first } => Some(first),
            _ => None,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Best score for this palette size, counting the running score
    pub fn high_score(&self) -> u32 {
        self.best.max(self.score)
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn last_summary(&self) -> Option<CascadeSummary> {
        self.last_summary
    }

    pub fn game_over(&self) -> bool {
        self.state == SessionState::GameOver
    }

    /// True after `quit()`
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn store(&self) -> &H {
        &self.store
    }

    /// First legal move on the current grid (a hint for the player)
    pub fn hint(&self) -> Option<Move> {
        if self.finished || self.game_over() {
            return None;
        }
        find_valid_move(&self.grid)
    }

    /// Take all pending events, oldest first.
    pub fn take_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    /// Route a command from an input collaborator. Returns false if it was ignored.
    pub fn apply_command(&mut self, command: Command) -> bool {
        match command {
            Command::Select(coord) => self.select(coord) != SelectOutcome::Ignored,
            Command::Restart => self.restart(),
            Command::Quit => self.quit(),
        }
    }

    /// Pick a cell
    pub fn select(&mut self, coord: Coord) -> SelectOutcome {
        if self.finished || !coord.in_bounds() {
            return SelectOutcome::Ignored;
        }

        match self.state {
            SessionState::AwaitingFirstSelection | SessionState::Settled => {
                self.state = SessionState::AwaitingSecondSelection { first: coord };
                SelectOutcome::FirstSelected(coord)
            }
            SessionState::AwaitingSecondSelection { first } => match Move::new(first, coord) {
                Some(mv) => self.try_swap(mv),
                None => {
                    self.state = SessionState::AwaitingSecondSelection { first: coord };
                    SelectOutcome::Reselected(coord)
                }
            },
            SessionState::Resolving(_) | SessionState::GameOver => SelectOutcome::Ignored,
        }
    }

    fn try_swap(&mut self, mv: Move) -> SelectOutcome {
        if !swap_creates_match(&self.grid, mv) {
            debug!(from = %mv.from, to = %mv.to, "swap rejected");
            self.events.push(EngineEvent::SwapRejected { mv });
            self.state = SessionState::AwaitingFirstSelection;
            return SelectOutcome::Rejected(mv);
        }

        self.grid.swap(mv.from, mv.to);
        self.moves += 1;
        self.events.push(EngineEvent::Swapped { mv });

        let mut ctx = CascadeContext::new();
        self.state = SessionState::Resolving(ctx);
        let events = &mut self.events;
        let summary = resolve_cascade(
            &mut self.grid,
            &self.palette,
            &mut self.rng,
            &mut ctx,
            |step| events.push(EngineEvent::CascadeStep(*step)),
        );
        debug_assert!(self.grid.is_full());

        self.score = self.score.saturating_add(ctx.score_accumulator);
        self.last_summary = Some(summary);

        let game_over = !has_valid_move(&self.grid);
        if game_over {
            self.state = SessionState::GameOver;
            self.events.push(EngineEvent::GameOver {
                final_score: self.score,
            });
            info!(score = self.score, moves = self.moves, "game over");
            self.record_high_score();
        } else {
            self.state = SessionState::Settled;
            self.events.push(EngineEvent::Settled { score: self.score });
        }

        SelectOutcome::Resolved {
            mv,
            summary,
            game_over,
        }
    }

    /// Save the running score if it beats the stored best.
    fn record_high_score(&mut self) {
        let colors = self.palette.size();
        let stored = self.store.load_high_score(colors);
        if self.score > stored {
            self.store.save_high_score(colors, self.score);
            info!(colors, score = self.score, previous = stored, "new high score");
        }
        self.best = stored.max(self.score);
    }

    /// Record the high score, then start a new episode on a fresh grid.
    ///
    /// Accepted in every state except after `quit()`.
    pub fn restart(&mut self) -> bool {
        if self.finished {
            return false;
        }
        self.record_high_score();
        self.new_episode();
        true
    }

    /// Switch palette size, then start a new episode on the new palette.
    ///
    /// The running score counts toward the old size only.
    pub fn change_palette(&mut self, palette: ColorPalette) -> bool {
        if self.finished {
            return false;
        }
        self.record_high_score();
        self.palette = palette;
        self.best = self.store.load_high_score(palette.size());
        self.new_episode();
        true
    }

    // Fresh grid and counters. Does not touch the store.
    fn new_episode(&mut self) {
        self.grid = Self::starting_grid(&self.palette, &mut self.rng);
        self.state = SessionState::AwaitingFirstSelection;
        self.score = 0;
        self.moves = 0;
        self.last_summary = None;
        self.episode_best = self.best;
        self.episode_id = self.episode_id.wrapping_add(1);
        info!(episode = self.episode_id, colors = self.palette.size(), "new episode");
    }

    /// Record the high score and end the session. Later commands are ignored.
    pub fn quit(&mut self) -> bool {
        if self.finished {
            return false;
        }
        self.record_high_score();
        self.finished = true;
        info!(score = self.score, "session finished");
        true
    }

    fn phase(&self) -> Phase {
        if self.finished {
            return Phase::Finished;
        }
        match self.state {
            SessionState::AwaitingFirstSelection => Phase::AwaitingFirstSelection,
            SessionState::AwaitingSecondSelection { .. } => Phase::AwaitingSecondSelection,
            SessionState::Resolving(_) | SessionState::Settled => Phase::Settled,
            SessionState::GameOver => Phase::GameOver,
        }
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.grid.write_rows(&mut out.tiles);

        let summary = self.last_summary.unwrap_or_default();
        out.phase = self.phase();
        out.selected = self.selected();
        out.colors = self.palette.size();
        out.score = self.score;
        out.high_score = self.high_score();
        out.last_multiplier = summary.peak_multiplier;
        out.last_gain = summary.total_score;
        out.last_steps = summary.steps;
        out.moves = self.moves;
        out.episode_id = self.episode_id;
        out.game_over = self.game_over();
        out.new_high_score = self.score > self.episode_best;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}
