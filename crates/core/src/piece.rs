//! Piece module - shape masks and the falling piece value
//!
//! Every shape is a square bitmask of side `size` (2, 3 or 4). Row 0 of the
//! mask is the topmost visual row, so a mask cell `(row, col)` lands on the
//! board at `(x + col, y + size - row - 1)`.
//!
//! Masks are kept *settled*: the lowest occupied mask row is the bottom row
//! and the leftmost occupied column is column 0. The anchor is therefore the
//! bottom-left corner of the piece's bounding box, and rotation turns the
//! piece about that corner. There are no wall kicks.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{CellPos, Color, ShapeKind, MAX_SHAPE_SIZE};

/// Mask stride (bits per row), independent of the shape's own size
const STRIDE: u8 = MAX_SHAPE_SIZE as u8;

/// Relative offset of one occupied cell: (column, height above the anchor row)
pub type CellOffset = (i32, i32);

/// Side length of the square mask for a shape kind
pub fn shape_size(kind: ShapeKind) -> u8 {
    match kind {
        ShapeKind::I => 4,
        ShapeKind::O => 2,
        _ => 3,
    }
}

/// Spawn-orientation rows for a shape kind, top row first
fn shape_rows(kind: ShapeKind) -> &'static [&'static str] {
    match kind {
        ShapeKind::I => &["....", "....", "....", "####"],
        ShapeKind::O => &["##", "##"],
        ShapeKind::T => &["...", ".#.", "###"],
        ShapeKind::S => &["...", ".##", "##."],
        ShapeKind::Z => &["...", "##.", ".##"],
        ShapeKind::J => &["...", "#..", "###"],
        ShapeKind::L => &["...", "..#", "###"],
    }
}

#[inline(always)]
fn bit(row: u8, col: u8) -> u16 {
    1 << (row * STRIDE + col)
}

/// Build a mask from `#`/`.` rows
fn mask_from_rows(rows: &[&str]) -> u16 {
    let mut mask = 0;
    for (r, line) in rows.iter().enumerate() {
        for (c, ch) in line.bytes().enumerate() {
            if ch == b'#' {
                mask |= bit(r as u8, c as u8);
            }
        }
    }
    mask
}

/// Spawn mask for a shape kind
pub fn spawn_mask(kind: ShapeKind) -> u16 {
    mask_from_rows(shape_rows(kind))
}

/// Rotate a square mask 90 degrees clockwise
pub fn rotate_cw(mask: u16, size: u8) -> u16 {
    let mut out = 0;
    for r in 0..size {
        for c in 0..size {
            // new[r][c] = old[size - 1 - c][r]
            if mask & bit(size - 1 - c, r) != 0 {
                out |= bit(r, c);
            }
        }
    }
    out
}

/// Shift a mask down and left until it touches the bottom row and column 0
pub fn settle(mask: u16, size: u8) -> u16 {
    if mask == 0 {
        return 0;
    }

    let mut lowest_row = 0;
    let mut leftmost_col = size;
    for r in 0..size {
        for c in 0..size {
            if mask & bit(r, c) != 0 {
                lowest_row = lowest_row.max(r);
                leftmost_col = leftmost_col.min(c);
            }
        }
    }

    let down = size - 1 - lowest_row;
    let mut out = 0;
    for r in 0..size {
        for c in 0..size {
            if mask & bit(r, c) != 0 {
                out |= bit(r + down, c - leftmost_col);
            }
        }
    }
    out
}

/// Decoded piece that does not match its shape kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PieceError {
    #[error("{kind:?} pieces have size {expected}, got {size}")]
    WrongSize {
        kind: ShapeKind,
        size: u8,
        expected: u8,
    },
    #[error("mask {mask} is not an orientation of {kind:?}")]
    WrongMask { kind: ShapeKind, mask: u16 },
}

/// Serialized form of a piece, checked before it becomes a `Piece`
#[derive(Deserialize)]
struct PieceRepr {
    kind: ShapeKind,
    color: Color,
    size: u8,
    mask: u16,
    x: i32,
    y: i32,
}

impl TryFrom<PieceRepr> for Piece {
    type Error = PieceError;

    fn try_from(repr: PieceRepr) -> Result<Self, Self::Error> {
        let expected = shape_size(repr.kind);
        if repr.size != expected {
            return Err(PieceError::WrongSize {
                kind: repr.kind,
                size: repr.size,
                expected,
            });
        }

        let mut piece = Piece::new(repr.kind, repr.color, repr.x, repr.y);
        for _ in 0..4 {
            if piece.mask == repr.mask {
                return Ok(piece);
            }
            piece = piece.rotated();
        }
        Err(PieceError::WrongMask {
            kind: repr.kind,
            mask: repr.mask,
        })
    }
}

/// The active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PieceRepr")]
pub struct Piece {
    pub kind: ShapeKind,
    pub color: Color,
    size: u8,
    mask: u16,
    /// Board column of the mask's left edge
    pub x: i32,
    /// Board row of the mask's bottom edge
    pub y: i32,
}

impl Piece {
    /// Create a piece in spawn orientation anchored at (x, y)
    pub fn new(kind: ShapeKind, color: Color, x: i32, y: i32) -> Self {
        let size = shape_size(kind);
        Self {
            kind,
            color,
            size,
            mask: settle(spawn_mask(kind), size),
            x,
            y,
        }
    }

    pub fn size(&self) -> i32 {
        self.size as i32
    }

    /// Raw mask bits (`row * 4 + col`, row 0 on top)
    pub fn mask(&self) -> u16 {
        self.mask
    }

    /// Is mask cell (row, col) occupied? Row 0 is the topmost visual row.
    pub fn is_filled(&self, row: i32, col: i32) -> bool {
        if row < 0 || col < 0 || row >= self.size() || col >= self.size() {
            return false;
        }
        self.mask & bit(row as u8, col as u8) != 0
    }

    /// Offsets of the occupied cells relative to the anchor
    pub fn offsets(&self) -> impl Iterator<Item = CellOffset> + '_ {
        let size = self.size();
        (0..size)
            .flat_map(move |row| (0..size).map(move |col| (row, col)))
            .filter(move |&(row, col)| self.is_filled(row, col))
            .map(move |(row, col)| (col, size - row - 1))
    }

    /// Absolute board cells covered by the piece
    pub fn cells(&self) -> impl Iterator<Item = CellPos> + '_ {
        self.offsets()
            .map(move |(dx, dy)| CellPos::new(self.x + dx, self.y + dy))
    }

    /// Copy of the piece moved by (dx, dy)
    pub fn moved(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Copy of the piece with its anchor placed at (x, y)
    pub fn placed_at(&self, x: i32, y: i32) -> Self {
        Self { x, y, ..*self }
    }

    /// Candidate clockwise rotation at the same anchor.
    ///
    /// The mask is turned 90 degrees inside its square box and then settled
    /// back to the bottom-left corner, so the occupied cells may shift
    /// relative to a plain turn of the box (turning the T from `#../##./#..`
    /// gives `###/.#./...`, which is stored as `.../###/.#.`).
    pub fn rotated(&self) -> Self {
        Self {
            mask: settle(rotate_cw(self.mask, self.size), self.size),
            ..*self
        }
    }

    /// Width of the occupied area in columns
    pub fn width(&self) -> i32 {
        self.offsets().map(|(dx, _)| dx + 1).max().unwrap_or(0)
    }

    /// Height of the occupied area in rows
    pub fn height(&self) -> i32 {
        self.offsets().map(|(_, dy)| dy + 1).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows_of(piece: &Piece) -> Vec<String> {
        (0..piece.size())
            .map(|r| {
                (0..piece.size())
                    .map(|c| if piece.is_filled(r, c) { '#' } else { '.' })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_shape_sizes() {
        assert_eq!(shape_size(ShapeKind::I), 4);
        assert_eq!(shape_size(ShapeKind::O), 2);
        for kind in [ShapeKind::T, ShapeKind::S, ShapeKind::Z, ShapeKind::J, ShapeKind::L] {
            assert_eq!(shape_size(kind), 3);
        }
    }

    #[test]
    fn test_every_shape_has_four_cells() {
        for kind in ShapeKind::ALL {
            let piece = Piece::new(kind, Color::Red, 0, 0);
            assert_eq!(piece.offsets().count(), 4, "{:?}", kind);
            assert_eq!(piece.rotated().offsets().count(), 4, "{:?}", kind);
        }
    }

    #[test]
    fn test_spawn_masks_are_settled() {
        for kind in ShapeKind::ALL {
            let piece = Piece::new(kind, Color::Blue, 0, 0);
            let size = piece.size();
            assert!((0..size).any(|c| piece.is_filled(size - 1, c)), "{:?}", kind);
            assert!((0..size).any(|r| piece.is_filled(r, 0)), "{:?}", kind);
        }
    }

    #[test]
    fn test_row_inversion() {
        // T: bar on the bottom mask row, nub above its middle.
        let piece = Piece::new(ShapeKind::T, Color::Purple, 5, 19);
        let mut cells: Vec<(i32, i32)> = piece.cells().map(|p| (p.x, p.y)).collect();
        cells.sort();
        assert_eq!(cells, vec![(5, 19), (6, 19), (6, 20), (7, 19)]);
    }

    #[test]
    fn test_rotate_i_piece() {
        let piece = Piece::new(ShapeKind::I, Color::Blue, 0, 0);
        assert_eq!(rows_of(&piece), vec!["....", "....", "....", "####"]);

        let vertical = piece.rotated();
        assert_eq!(rows_of(&vertical), vec!["#...", "#...", "#...", "#..."]);
        assert_eq!(vertical.width(), 1);
        assert_eq!(vertical.height(), 4);

        assert_eq!(vertical.rotated().mask(), piece.mask());
    }

    #[test]
    fn test_rotate_t_piece_cycle() {
        let piece = Piece::new(ShapeKind::T, Color::Red, 3, 3);
        let r1 = piece.rotated();
        assert_eq!(rows_of(&r1), vec!["#..", "##.", "#.."]);
        let r2 = r1.rotated();
        assert_eq!(rows_of(&r2), vec!["...", "###", ".#."]);
        let r4 = r2.rotated().rotated();
        assert_eq!(r4, piece);
    }

    #[test]
    fn test_o_rotation_is_identity() {
        let piece = Piece::new(ShapeKind::O, Color::Yellow, 2, 2);
        assert_eq!(piece.rotated(), piece);
    }

    #[test]
    fn test_rotation_keeps_anchor() {
        let piece = Piece::new(ShapeKind::L, Color::Orange, 4, 7);
        let rotated = piece.rotated();
        assert_eq!((rotated.x, rotated.y), (4, 7));
        assert_eq!(rotated.color, piece.color);
        assert_eq!(rotated.kind, piece.kind);
    }

    #[test]
    fn test_moved_and_placed_at() {
        let piece = Piece::new(ShapeKind::S, Color::Green, 5, 19);
        let down = piece.moved(0, -1);
        assert_eq!((down.x, down.y), (5, 18));
        assert_eq!(down.mask(), piece.mask());

        let placed = piece.placed_at(0, 0);
        assert_eq!((placed.x, placed.y), (0, 0));
    }

    #[test]
    fn test_decode_rebuilds_rotated_piece() {
        let piece = Piece::new(ShapeKind::J, Color::Blue, 3, 8).rotated();
        let json = serde_json::to_string(&piece).unwrap();
        let back: Piece = serde_json::from_str(&json).unwrap();
        assert_eq!(back, piece);
    }

    #[test]
    fn test_decode_rejects_wrong_size() {
        let json = r#"{"kind":"i","color":"red","size":9,"mask":65535,"x":0,"y":0}"#;
        let err = serde_json::from_str::<Piece>(json).unwrap_err();
        assert!(err.to_string().contains("size 4, got 9"), "{err}");
    }

    #[test]
    fn test_decode_rejects_foreign_mask() {
        // Right size for an I, but the bits of an O
        let mask = Piece::new(ShapeKind::O, Color::Red, 0, 0).mask();
        let json = format!(r#"{{"kind":"i","color":"red","size":4,"mask":{mask},"x":0,"y":0}}"#);
        assert!(serde_json::from_str::<Piece>(&json).is_err());

        let json = r#"{"kind":"t","color":"red","size":3,"mask":65535,"x":0,"y":0}"#;
        assert!(serde_json::from_str::<Piece>(json).is_err());
    }

    #[test]
    fn test_settle_moves_to_corner() {
        // Single cell at the top-right of a 3x3 mask
        let mask = bit(0, 2);
        assert_eq!(settle(mask, 3), bit(2, 0));
        assert_eq!(settle(0, 3), 0);
    }
}
