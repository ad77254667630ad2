//! Controller module - owns a game session
//!
//! Ties together the board, the active piece and the piece factory. It turns
//! elapsed time into gravity steps, applies player input through the board's
//! collision check, commits landed pieces and removes full rows.
//!
//! # State machine
//!
//! | From | Event | To |
//! |------|-------|----|
//! | Running | full rows after a commit | RemovingRow, then Running |
//! | Running | overflow / top-out | Over |
//! | Running | `pause()` | Paused |
//! | Paused | `resume()` | Running |
//! | Over | anything | Over (until `start_game`) |
//!
//! Everything is synchronous: row removal finishes before the call that
//! triggered it returns, so input or ticks never observe `RemovingRow`.

use crate::board::Board;
use crate::events::{EventSink, NoopSink};
use crate::piece::Piece;
use crate::rng::PieceFactory;
use crate::snapshot::{ActiveSnapshot, GameSnapshot};
use crate::types::{ConfigError, GameAction, GameConfig, GameStatus};

/// A single game session and its host notifications
#[derive(Debug, Clone)]
pub struct GameController<S: EventSink = NoopSink> {
    config: GameConfig,
    board: Board,
    factory: PieceFactory,
    current: Option<Piece>,
    status: GameStatus,
    time_accumulator_ms: u32,
    /// Increments on every `start_game`, starting at 1.
    session_id: u32,
    pieces_committed: u32,
    rows_removed: u32,
    sink: S,
}

impl GameController<NoopSink> {
    /// Start a session with no host listening
    pub fn new(config: GameConfig, seed: u32) -> Result<Self, ConfigError> {
        Self::with_sink(config, seed, NoopSink)
    }
}

impl<S: EventSink> GameController<S> {
    /// Start a session on an empty board, reporting to `sink`
    pub fn with_sink(config: GameConfig, seed: u32, sink: S) -> Result<Self, ConfigError> {
        config.validate()?;
        let board = Board::new(config.cols, config.rows);
        Ok(Self::begin(config, seed, board, sink))
    }

    /// Start a session on a prepared board (puzzles, replays, tests)
    pub fn with_board(
        config: GameConfig,
        seed: u32,
        board: Board,
        sink: S,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if board.cols() != config.cols || board.rows() != config.rows {
            return Err(ConfigError::BoardSizeMismatch {
                cols: config.cols,
                rows: config.rows,
                board_cols: board.cols(),
                board_rows: board.rows(),
            });
        }
        Ok(Self::begin(config, seed, board, sink))
    }

    fn begin(config: GameConfig, seed: u32, board: Board, sink: S) -> Self {
        let mut game = Self {
            config,
            board,
            factory: PieceFactory::new(seed),
            current: None,
            status: GameStatus::Running,
            time_accumulator_ms: 0,
            session_id: 0,
            pieces_committed: 0,
            rows_removed: 0,
            sink,
        };
        game.reset_session();
        game
    }

    /// Throw away the current session and start a new one.
    ///
    /// The piece sequence continues from the factory's current state.
    pub fn start_game(&mut self, config: GameConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        self.board = Board::new(config.cols, config.rows);
        self.reset_session();
        Ok(())
    }

    fn reset_session(&mut self) {
        self.current = None;
        self.status = GameStatus::Running;
        self.time_accumulator_ms = 0;
        self.session_id = self.session_id.wrapping_add(1);
        self.pieces_committed = 0;
        self.rows_removed = 0;
        self.spawn_piece();
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current(&self) -> Option<Piece> {
        self.current
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_over(&self) -> bool {
        self.status.is_over()
    }

    pub fn time_accumulator_ms(&self) -> u32 {
        self.time_accumulator_ms
    }

    pub fn tick_interval_ms(&self) -> u32 {
        self.config.tick_interval_ms
    }

    pub fn session_id(&self) -> u32 {
        self.session_id
    }

    pub fn pieces_committed(&self) -> u32 {
        self.pieces_committed
    }

    pub fn rows_removed(&self) -> u32 {
        self.rows_removed
    }

    /// Current RNG state; `PieceFactory::from_state` with it replays the upcoming pieces
    pub fn seed(&self) -> u32 {
        self.factory.seed()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Draw a piece and place it at the spawn position
    fn spawn_piece(&mut self) {
        let piece = self
            .factory
            .random_piece()
            .placed_at(self.config.spawn_x, self.config.spawn_y());
        self.current = Some(piece);
        self.sink.on_piece_spawned(&piece);
    }

    /// Feed elapsed time. Runs at most one gravity step per call.
    ///
    /// Returns true if a step ran. Time beyond the interval is dropped, not
    /// carried over.
    pub fn on_tick(&mut self, delta_ms: u32) -> bool {
        if self.status != GameStatus::Running {
            return false;
        }

        self.time_accumulator_ms = self.time_accumulator_ms.saturating_add(delta_ms);
        if self.time_accumulator_ms < self.config.tick_interval_ms {
            return false;
        }

        self.time_accumulator_ms = 0;
        self.gravity_step();
        true
    }

    /// Move the piece down one row, or land it
    fn gravity_step(&mut self) {
        let Some(piece) = self.current else {
            return;
        };

        if self.board.can_place(&piece, 0, -1) {
            let moved = piece.moved(0, -1);
            self.current = Some(moved);
            self.sink.on_piece_moved(&moved, 0, -1);
            return;
        }

        self.lock_piece(piece);
    }

    /// Commit the piece, spawn the next one and resolve full rows
    fn lock_piece(&mut self, piece: Piece) {
        let commit = self.board.commit(&piece);
        self.current = None;
        self.pieces_committed = self.pieces_committed.wrapping_add(1);
        self.sink.on_piece_committed(&piece, &commit.cells);

        // Part of the piece never made it onto the board
        if commit.spilled {
            self.game_over();
            return;
        }

        self.spawn_piece();
        self.check_rows();
    }

    /// Remove full rows one at a time, then look for a loss
    fn check_rows(&mut self) {
        let scan = self.board.find_full_rows();
        if scan.overflow {
            self.game_over();
            return;
        }

        if let Some(&lowest) = scan.rows.first() {
            self.status = GameStatus::RemovingRow;

            let top = self.board.top_row();
            let mut row = lowest;
            while row < top {
                if self.board.is_row_full(row) {
                    self.board.remove_row(row);
                    self.rows_removed = self.rows_removed.wrapping_add(1);
                    self.sink.on_row_removed(row);
                    // The row above now sits at `row`; check it again.
                } else {
                    row += 1;
                }
            }

            self.status = GameStatus::Running;
        }

        if self.board.is_topped_out() {
            self.game_over();
        }
    }

    /// Shift the piece horizontally by `delta` columns
    pub fn apply_horizontal(&mut self, delta: i32) -> bool {
        if self.status != GameStatus::Running || delta == 0 {
            return false;
        }
        let Some(piece) = self.current else {
            return false;
        };

        if !self.board.can_place(&piece, delta, 0) {
            return false;
        }

        let moved = piece.moved(delta, 0);
        self.current = Some(moved);
        self.sink.on_piece_moved(&moved, delta, 0);
        true
    }

    /// Rotate the piece clockwise in place (no wall kicks)
    pub fn apply_rotate(&mut self) -> bool {
        if self.status != GameStatus::Running {
            return false;
        }
        let Some(piece) = self.current else {
            return false;
        };

        let candidate = piece.rotated();
        if candidate == piece || !self.board.can_place(&candidate, 0, 0) {
            return false;
        }

        self.current = Some(candidate);
        self.sink.on_piece_rotated(&candidate);
        true
    }

    pub fn pause(&mut self) -> bool {
        if self.status != GameStatus::Running {
            return false;
        }
        self.status = GameStatus::Paused;
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.status != GameStatus::Paused {
            return false;
        }
        self.status = GameStatus::Running;
        true
    }

    /// Apply a game action
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::MoveLeft => self.apply_horizontal(-1),
            GameAction::MoveRight => self.apply_horizontal(1),
            GameAction::Rotate => self.apply_rotate(),
            GameAction::Pause => self.pause(),
            GameAction::Resume => self.resume(),
        }
    }

    /// End the session. The board is left as it is; the host hears about it once.
    pub fn game_over(&mut self) {
        if self.status == GameStatus::Over {
            return;
        }
        self.status = GameStatus::Over;
        self.current = None;
        self.time_accumulator_ms = 0;
        self.sink.on_game_over();
    }

    /// Check if the piece could move by (dx, dy)
    pub fn can_move(&self, dx: i32, dy: i32) -> bool {
        match self.current {
            Some(ref piece) => self.board.can_place(piece, dx, dy),
            None => false,
        }
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.cols = self.board.cols();
        out.rows = self.board.rows();
        self.board.write_u8_grid(&mut out.board);
        out.active = self.current.map(ActiveSnapshot::from);
        out.status = self.status;
        out.session_id = self.session_id;
        out.seed = self.factory.seed();
        out.pieces_committed = self.pieces_committed;
        out.rows_removed = self.rows_removed;
        out.time_accumulator_ms = self.time_accumulator_ms;
        out.tick_interval_ms = self.config.tick_interval_ms;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}
