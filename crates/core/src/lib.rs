//! Core game logic module - pure, deterministic, and testable
//!
//! This crate holds the rules of the falling-block game: the settled-cell
//! board, the falling piece, the seeded piece factory and the controller
//! that runs a session. It does no rendering, audio, input decoding or I/O;
//! hosts drive it with elapsed time and discrete actions and listen through
//! an [`EventSink`].
//!
//! # Module Structure
//!
//! - [`board`]: settled cells, collision, full-row detection and compaction
//! - [`piece`]: square shape masks, rotation, the falling piece value
//! - [`rng`]: seeded LCG and the uniform piece factory
//! - [`controller`]: the session state machine and gravity timing
//! - [`events`]: host notifications
//! - [`snapshot`]: serializable point-in-time view of a session
//!
//! # Example
//!
//! ```
//! use falling_blocks_core::{GameController, GameEvent};
//! use falling_blocks_core::types::{GameConfig, GameStatus};
//!
//! let config = GameConfig::default();
//! let mut game = GameController::with_sink(config, 12345, Vec::<GameEvent>::new()).unwrap();
//!
//! game.apply_horizontal(-1);
//! game.apply_rotate();
//!
//! // One gravity step per interval
//! assert!(game.on_tick(config.tick_interval_ms));
//! assert_eq!(game.current().unwrap().y, config.spawn_y() - 1);
//! assert_eq!(game.status(), GameStatus::Running);
//! ```
//!
//! # Timing
//!
//! [`GameController::on_tick`] accumulates elapsed milliseconds. When the
//! total reaches `tick_interval_ms` (200 by default) exactly one gravity step
//! runs and the accumulator resets to zero; a long frame never produces
//! several steps.

pub mod board;
pub mod controller;
pub mod events;
pub mod piece;
pub mod rng;
pub mod snapshot;

pub use falling_blocks_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, Commit, RowScan};
pub use controller::GameController;
pub use events::{EventSink, GameEvent, NoopSink};
pub use piece::{Piece, PieceError};
pub use rng::{PieceFactory, SimpleRng};
pub use snapshot::{ActiveSnapshot, GameSnapshot};
