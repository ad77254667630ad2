use serde::{Deserialize, Serialize};

use crate::piece::Piece;
use crate::types::{CellPos, Color, GameStatus, ShapeKind};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActiveSnapshot {
    pub kind: ShapeKind,
    pub color: Color,
    pub x: i32,
    pub y: i32,
    pub cells: Vec<CellPos>,
}

impl From<Piece> for ActiveSnapshot {
    fn from(value: Piece) -> Self {
        Self {
            kind: value.kind,
            color: value.color,
            x: value.x,
            y: value.y,
            cells: value.cells().collect(),
        }
    }
}

/// Point-in-time view of a session, serializable for hosts and tooling
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub cols: i32,
    pub rows: i32,
    /// Color ids per cell (0 = empty), `board[y][x]` with row 0 at the floor
    pub board: Vec<Vec<u8>>,
    pub active: Option<ActiveSnapshot>,
    pub status: GameStatus,
    pub session_id: u32,
    pub seed: u32,
    pub pieces_committed: u32,
    pub rows_removed: u32,
    pub time_accumulator_ms: u32,
    pub tick_interval_ms: u32,
}

impl GameSnapshot {
    pub fn playable(&self) -> bool {
        self.status == GameStatus::Running
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            cols: 0,
            rows: 0,
            board: Vec::new(),
            active: None,
            status: GameStatus::Running,
            session_id: 0,
            seed: 0,
            pieces_committed: 0,
            rows_removed: 0,
            time_accumulator_ms: 0,
            tick_interval_ms: 0,
        }
    }
}
