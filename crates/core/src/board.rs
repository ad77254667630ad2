//! Board module - manages the settled cells
//!
//! The board is a `cols x rows` grid (13x20 in the reference configuration).
//! Each cell is empty or filled with the color of the piece that landed there.
//! Uses a flat vector, row-major, sized once per session.
//!
//! Coordinates: (x, y) where x ranges 0..cols (left to right) and y ranges
//! 0..rows (floor to ceiling). Collision treats everything below row 0 as solid
//! and everything at or above `rows` as open sky.

use std::fmt;

use arrayvec::ArrayVec;

use crate::piece::Piece;
use crate::types::{Cell, CellPos, MAX_SHAPE_SIZE};

/// Most cells a single piece can cover
pub const MAX_PIECE_CELLS: usize = (MAX_SHAPE_SIZE * MAX_SHAPE_SIZE) as usize;

/// Result of merging a piece into the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// Board cells that were filled, in mask order
    pub cells: ArrayVec<CellPos, MAX_PIECE_CELLS>,
    /// Some piece cells were above the ceiling and could not be stored
    pub spilled: bool,
}

/// Result of a full-row scan
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RowScan {
    /// Full rows, bottom to top
    pub rows: Vec<usize>,
    /// The top row is full: the board has overflowed
    pub overflow: bool,
}

/// The game board using flat vector storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cols: i32,
    rows: i32,
    /// Flat cells, row-major order (y * cols + x), row 0 at the floor
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty board.
    ///
    /// Dimensions are validated by `GameConfig`; a zero or negative size
    /// yields an empty grid.
    pub fn new(cols: i32, rows: i32) -> Self {
        let cols = cols.max(0);
        let rows = rows.max(0);
        Self {
            cols,
            rows,
            cells: vec![None; (cols * rows) as usize],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || x >= self.cols || y < 0 || y >= self.rows {
            return None;
        }
        Some((y as usize) * (self.cols as usize) + (x as usize))
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Occupancy test used by collision.
    ///
    /// Rows below the floor read as occupied, rows at or above the ceiling
    /// read as empty. Columns outside `0..cols` are a caller bug.
    pub fn is_cell_occupied(&self, x: i32, y: i32) -> bool {
        debug_assert!(
            x >= 0 && x < self.cols,
            "column {} outside 0..{}",
            x,
            self.cols
        );
        if y < 0 {
            return true;
        }
        if y >= self.rows {
            return false;
        }
        match self.get(x, y) {
            Some(cell) => cell.is_some(),
            // Release builds treat a stray column as a wall
            None => true,
        }
    }

    /// Could `piece` sit at its anchor offset by (dx, dy)?
    pub fn can_place(&self, piece: &Piece, dx: i32, dy: i32) -> bool {
        piece.cells().all(|pos| {
            let x = pos.x + dx;
            let y = pos.y + dy;
            x >= 0 && x < self.cols && !self.is_cell_occupied(x, y)
        })
    }

    /// Merge the piece's cells into the board, recording its color
    pub fn commit(&mut self, piece: &Piece) -> Commit {
        let mut commit = Commit {
            cells: ArrayVec::new(),
            spilled: false,
        };

        for pos in piece.cells() {
            if self.set(pos.x, pos.y, Some(piece.color)) {
                commit.cells.push(pos);
            } else {
                commit.spilled = true;
            }
        }

        commit
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        match self.row(y) {
            Some(row) => row.iter().all(|cell| cell.is_some()),
            None => false,
        }
    }

    /// Check if a row has no filled cells
    pub fn is_row_empty(&self, y: usize) -> bool {
        match self.row(y) {
            Some(row) => row.iter().all(|cell| cell.is_none()),
            None => true,
        }
    }

    /// Cells of a single row, left to right
    pub fn row(&self, y: usize) -> Option<&[Cell]> {
        if y >= self.rows as usize {
            return None;
        }
        let width = self.cols as usize;
        let start = y * width;
        Some(&self.cells[start..start + width])
    }

    /// Index of the top row
    pub fn top_row(&self) -> usize {
        (self.rows as usize).saturating_sub(1)
    }

    /// Scan bottom to top for full rows
    pub fn find_full_rows(&self) -> RowScan {
        let rows: Vec<usize> = (0..self.rows as usize)
            .filter(|&y| self.is_row_full(y))
            .collect();
        let overflow = rows.last() == Some(&self.top_row());
        RowScan { rows, overflow }
    }

    /// Any filled cell in the top row
    pub fn is_topped_out(&self) -> bool {
        self.rows > 0 && !self.is_row_empty(self.top_row())
    }

    /// Clear a row and shift every row above it down by one.
    ///
    /// Rows are copied bottom to top, so each source row is read before it is
    /// overwritten. The top row ends up empty.
    pub fn remove_row(&mut self, y: usize) {
        let rows = self.rows as usize;
        if y >= rows {
            return;
        }

        let width = self.cols as usize;
        for row in y..rows - 1 {
            let src_start = (row + 1) * width;
            let dst_start = row * width;
            self.cells
                .copy_within(src_start..src_start + width, dst_start);
        }

        let top_start = (rows - 1) * width;
        for cell in &mut self.cells[top_start..top_start + width] {
            *cell = None;
        }
    }

    /// Number of filled cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }

    /// Write color ids (0 = empty) row by row, floor first
    pub fn write_u8_grid(&self, out: &mut Vec<Vec<u8>>) {
        let width = self.cols as usize;
        out.resize_with(self.rows as usize, Vec::new);
        for (y, row) in out.iter_mut().enumerate() {
            row.clear();
            row.extend(
                self.cells[y * width..(y + 1) * width]
                    .iter()
                    .map(|cell| cell.map_or(0, |color| color.id())),
            );
        }
    }
}

/// Text dump, top row first: `1` for filled, `0` for empty
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..self.rows as usize).rev() {
            let Some(row) = self.row(y) else {
                continue;
            };
            for (x, cell) in row.iter().enumerate() {
                if x > 0 {
                    f.write_str(" ")?;
                }
                f.write_str(if cell.is_some() { "1" } else { "0" })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
