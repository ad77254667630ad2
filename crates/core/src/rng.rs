//! RNG module - seeded random piece generation
//!
//! Pieces are drawn uniformly: the shape kind and the color are picked
//! independently on every draw. The generator is a small LCG so a seed fully
//! determines the piece sequence (replays, tests, headless runs).

use crate::piece::Piece;
use crate::types::{Color, ShapeKind};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Rebuild a generator from `state()`. Unlike `new`, 0 is kept as is.
    pub fn from_state(state: u32) -> Self {
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Scales by the high bits; the low bits of an LCG cycle with short periods.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Current internal state, for `from_state`
    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Uniform piece factory
#[derive(Debug, Clone)]
pub struct PieceFactory {
    rng: SimpleRng,
}

impl PieceFactory {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed),
        }
    }

    /// Continue the sequence of a factory whose `seed()` returned `state`
    pub fn from_state(state: u32) -> Self {
        Self {
            rng: SimpleRng::from_state(state),
        }
    }

    /// Draw a piece in spawn orientation with its anchor at the origin
    pub fn random_piece(&mut self) -> Piece {
        let kind = ShapeKind::ALL[self.rng.next_range(ShapeKind::ALL.len() as u32) as usize];
        let color = Color::ALL[self.rng.next_range(Color::ALL.len() as u32) as usize];
        Piece::new(kind, color, 0, 0)
    }

    /// Current RNG state; `from_state` with it replays the upcoming pieces
    pub fn seed(&self) -> u32 {
        self.rng.state()
    }
}

impl Default for PieceFactory {
    fn default() -> Self {
        Self::new(1)
    }
}
