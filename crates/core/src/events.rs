//! Notifications from the controller to its host.
//!
//! The host (renderer, audio, scene manager, recorder) implements
//! [`EventSink`] and receives structured `(x, y)` / row data; it keeps its own
//! mapping from cells to whatever it draws.

use serde::{Deserialize, Serialize};

use crate::piece::Piece;
use crate::types::CellPos;

pub trait EventSink {
    /// A new piece entered the board at its spawn position.
    fn on_piece_spawned(&mut self, _piece: &Piece) {}

    /// The active piece moved by (dx, dy); `piece` is the moved piece.
    fn on_piece_moved(&mut self, _piece: &Piece, _dx: i32, _dy: i32) {}

    fn on_piece_rotated(&mut self, _piece: &Piece) {}

    /// The piece was merged into the board; `cells` are the board cells it filled.
    fn on_piece_committed(&mut self, _piece: &Piece, _cells: &[CellPos]) {}

    /// A full row was removed and everything above it shifted down by one.
    fn on_row_removed(&mut self, _row: usize) {}

    /// Sent once per session.
    fn on_game_over(&mut self) {}
}

/// Default: discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl EventSink for NoopSink {}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn on_piece_spawned(&mut self, piece: &Piece) {
        (**self).on_piece_spawned(piece)
    }

    fn on_piece_moved(&mut self, piece: &Piece, dx: i32, dy: i32) {
        (**self).on_piece_moved(piece, dx, dy)
    }

    fn on_piece_rotated(&mut self, piece: &Piece) {
        (**self).on_piece_rotated(piece)
    }

    fn on_piece_committed(&mut self, piece: &Piece, cells: &[CellPos]) {
        (**self).on_piece_committed(piece, cells)
    }

    fn on_row_removed(&mut self, row: usize) {
        (**self).on_row_removed(row)
    }

    fn on_game_over(&mut self) {
        (**self).on_game_over()
    }
}

/// Recorded notification, as stored by the `Vec<GameEvent>` sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    PieceSpawned { piece: Piece },
    PieceMoved { piece: Piece, dx: i32, dy: i32 },
    PieceRotated { piece: Piece },
    PieceCommitted { piece: Piece, cells: Vec<CellPos> },
    RowRemoved { row: usize },
    GameOver,
}

impl EventSink for Vec<GameEvent> {
    fn on_piece_spawned(&mut self, piece: &Piece) {
        self.push(GameEvent::PieceSpawned { piece: *piece });
    }

    fn on_piece_moved(&mut self, piece: &Piece, dx: i32, dy: i32) {
        self.push(GameEvent::PieceMoved {
            piece: *piece,
            dx,
            dy,
        });
    }

    fn on_piece_rotated(&mut self, piece: &Piece) {
        self.push(GameEvent::PieceRotated { piece: *piece });
    }

    fn on_piece_committed(&mut self, piece: &Piece, cells: &[CellPos]) {
        self.push(GameEvent::PieceCommitted {
            piece: *piece,
            cells: cells.to_vec(),
        });
    }

    fn on_row_removed(&mut self, row: usize) {
        self.push(GameEvent::RowRemoved { row });
    }

    fn on_game_over(&mut self) {
        self.push(GameEvent::GameOver);
    }
}
