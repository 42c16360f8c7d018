//! Game state module - the engine state machine
//!
//! Ties together board, pieces, RNG, and scoring. Handles piece movement,
//! rotation, locking, the deferred line clear, gravity, pause and restart.
//!
//! Lifecycle: `Playing <-> Paused`, `Playing -> GameOver`, and `Restart` from
//! anywhere back to a fresh `Playing` game.
//!
//! A lock that completes rows does not spawn the next piece right away. The
//! rows flash for `LINE_CLEAR_DELAY_MS` while no piece is active; when the
//! countdown in [`GameEngine::tick`] expires the rows are removed, the score
//! is applied and the next piece spawns. A fresh piece therefore never shares
//! the board with rows that are about to shift.

use crate::board::{Board, RowList};
use crate::particles::LineClearObserver;
use crate::rng::PieceGenerator;
use crate::scoring::{calculate_level, calculate_score, get_drop_interval_ms};
use crate::snapshot::{GameSnapshot, PieceSnapshot};
use crate::tetromino::Tetromino;
use crate::types::*;

/// Rows waiting for removal.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingClear {
    rows: RowList,
    remaining_ms: u32,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameEngine {
    board: Board,
    current: Option<Tetromino>,
    next: Tetromino,
    generator: PieceGenerator,
    /// Monotonic episode id (increments on restart).
    episode_id: u32,
    score: u32,
    lines: u32,
    level: u32,
    /// Consecutive locks that completed at least one row.
    combo: u32,
    drop_interval_ms: u32,
    drop_timer_ms: u32,
    pending_clear: Option<PendingClear>,
    /// Last line-clear event (consumed by observers).
    last_event: Option<LineClearEvent>,
    paused: bool,
    game_over: bool,
}

impl GameEngine {
    /// Create a new game with the given RNG seed and spawn the first piece
    pub fn new(seed: u64) -> Self {
        Self::with_board(seed, Board::new())
    }

    /// Create a game on a pre-filled board.
    pub fn with_board(seed: u64, board: Board) -> Self {
        let mut generator = PieceGenerator::new(seed);
        let next = Tetromino::new(generator.draw());
        let mut engine = Self {
            board,
            current: None,
            next,
            generator,
            episode_id: 0,
            score: 0,
            lines: 0,
            level: 1,
            combo: 0,
            drop_interval_ms: get_drop_interval_ms(1),
            drop_timer_ms: 0,
            pending_clear: None,
            last_event: None,
            paused: false,
            game_over: false,
        };
        engine.spawn_piece();
        engine
    }

    /// Create a game on a pre-filled board with a specific active piece.
    ///
    /// The piece keeps its anchor and orientation. Enters game over right away
    /// if it collides, just like a normal spawn.
    pub fn with_piece(seed: u64, board: Board, piece: Tetromino) -> Self {
        let mut engine = Self::with_board(seed, board);
        engine.game_over = engine.board.check_collision(&piece);
        engine.current = Some(piece);
        engine
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn status(&self) -> GameStatus {
        if self.game_over {
            GameStatus::GameOver
        } else if self.paused {
            GameStatus::Paused
        } else {
            GameStatus::Playing
        }
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn drop_interval_ms(&self) -> u32 {
        self.drop_interval_ms
    }

    pub fn current(&self) -> Option<&Tetromino> {
        self.current.as_ref()
    }

    pub fn next(&self) -> &Tetromino {
        &self.next
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Rows currently flashing before removal (empty when none).
    pub fn flash_lines(&self) -> &[usize] {
        match &self.pending_clear {
            Some(p) => &p.rows,
            None => &[],
        }
    }

    /// Milliseconds left before the flashing rows are removed.
    pub fn line_clear_remaining_ms(&self) -> Option<u32> {
        self.pending_clear.as_ref().map(|p| p.remaining_ms)
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        for (y, row) in out.board.iter_mut().enumerate() {
            if let Some(cells) = self.board.row(y) {
                *row = cells;
            }
        }
        out.current = self.current.as_ref().map(PieceSnapshot::on_board);
        out.next = Some(PieceSnapshot::preview(&self.next));
        out.score = self.score;
        out.lines = self.lines;
        out.level = self.level;
        out.combo = self.combo;
        out.drop_interval_ms = self.drop_interval_ms;
        out.flash_lines = self
            .pending_clear
            .as_ref()
            .map(|p| p.rows.clone())
            .unwrap_or_default();
        out.paused = self.paused;
        out.game_over = self.game_over;
        out.episode_id = self.episode_id;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Promote the queued piece to active and queue a new one.
    ///
    /// Returns false (and enters game over) if the new piece collides.
    fn spawn_piece(&mut self) -> bool {
        let mut piece = self.next;
        piece.center_at_top();
        self.next = Tetromino::new(self.generator.draw());
        self.current = Some(piece);
        self.drop_timer_ms = 0;

        if self.board.check_collision(&piece) {
            self.game_over = true;
            return false;
        }
        true
    }

    /// Try to move the active piece.
    ///
    /// A blocked downward move locks the piece instead.
    pub(crate) fn try_move(&mut self, dx: i32, dy: i32) -> bool {
        let Some(mut moved) = self.current else {
            return false;
        };
        moved.shift(dx, dy);

        if self.board.check_collision(&moved) {
            if dy > 0 {
                self.lock_piece();
            }
            return false;
        }

        self.current = Some(moved);
        true
    }

    /// Rotate the active piece clockwise, restoring the old matrix on collision.
    pub(crate) fn try_rotate(&mut self) -> bool {
        let Some(piece) = self.current.as_mut() else {
            return false;
        };

        let before = *piece.shape();
        piece.rotate();
        if self.board.check_collision(piece) {
            piece.set_shape(before);
            return false;
        }
        true
    }

    /// Drop the active piece until it locks.
    ///
    /// Returns false if there was no piece, or if the step limit ran out and
    /// the piece was left where it was.
    pub(crate) fn hard_drop(&mut self) -> bool {
        if self.current.is_none() {
            return false;
        }
        for _ in 0..HARD_DROP_LIMIT {
            if !self.try_move(0, 1) {
                return true;
            }
        }
        false
    }

    /// Lock the active piece onto the board and evaluate completed rows
    fn lock_piece(&mut self) {
        let Some(piece) = self.current.take() else {
            return;
        };

        self.board.place_tetromino(&piece);

        let rows = self.board.completed_lines();
        if rows.is_empty() {
            self.combo = 0;
            self.spawn_piece();
            return;
        }

        self.combo += 1;
        self.last_event = Some(LineClearEvent {
            rows: rows.to_vec(),
            cells: rows.iter().filter_map(|&y| self.board.row(y)).collect(),
            combo: self.combo,
        });
        self.pending_clear = Some(PendingClear {
            rows,
            remaining_ms: LINE_CLEAR_DELAY_MS,
        });
    }

    /// Remove the flashing rows, apply score and level, then spawn.
    fn finish_line_clear(&mut self) {
        let Some(pending) = self.pending_clear.take() else {
            return;
        };

        self.board.clear_lines(&pending.rows);

        let cleared = pending.rows.len();
        let result = calculate_score(cleared, self.level, self.combo);
        self.score = self.score.saturating_add(result.total);
        self.lines = self.lines.saturating_add(cleared as u32);
        self.level = calculate_level(self.lines);
        self.drop_interval_ms = get_drop_interval_ms(self.level);

        self.spawn_piece();
    }

    /// Take and clear the last line-clear event.
    pub fn take_last_event(&mut self) -> Option<LineClearEvent> {
        self.last_event.take()
    }

    /// Hand the pending line-clear event (if any) to an observer.
    pub fn notify(&mut self, observer: &mut impl LineClearObserver) {
        if let Some(event) = self.last_event.take() {
            observer.on_line_clear(&event);
        }
    }

    /// Advance timers by `elapsed_ms`: the pending line clear first, then gravity.
    ///
    /// Returns true if the board or active piece changed.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if self.paused || self.game_over {
            return false;
        }

        if let Some(pending) = self.pending_clear.as_mut() {
            pending.remaining_ms = pending.remaining_ms.saturating_sub(elapsed_ms);
            if pending.remaining_ms == 0 {
                self.finish_line_clear();
                return true;
            }
            return false;
        }

        if self.current.is_none() {
            return false;
        }

        self.drop_timer_ms = self.drop_timer_ms.saturating_add(elapsed_ms);
        if self.drop_timer_ms >= self.drop_interval_ms {
            self.drop_timer_ms = 0;
            self.try_move(0, 1);
            return true;
        }

        false
    }

    /// Apply a game action
    ///
    /// Returns whether the action had an effect. Commands that are not valid
    /// in the current state are ignored.
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        if self.game_over {
            if action == GameAction::Restart {
                self.restart();
                return true;
            }
            return false;
        }

        match action {
            GameAction::Pause => {
                self.paused = !self.paused;
                true
            }
            GameAction::Restart => {
                self.restart();
                true
            }
            _ if self.paused => false,
            GameAction::MoveLeft => self.try_move(-1, 0),
            GameAction::MoveRight => self.try_move(1, 0),
            GameAction::SoftDrop => self.try_move(0, 1),
            GameAction::Rotate => self.try_rotate(),
            GameAction::HardDrop => self.hard_drop(),
        }
    }

    /// Throw away the board and all progress and start over.
    pub fn restart(&mut self) {
        let seed = self.generator.fork_seed();
        let next_episode = self.episode_id.wrapping_add(1);
        *self = Self::new(seed);
        self.episode_id = next_episode;
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new(1)
    }
}
