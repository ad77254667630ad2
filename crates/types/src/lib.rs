//! Shared data types for the falling-block simulation
//!
//! Pure data: constants, shape/color enums, the game status and action
//! enums, and the session configuration. Nothing here knows about the board
//! or the controller, so hosts (renderers, drivers, tests) can depend on it
//! without pulling in game logic.
//!
//! # Coordinates
//!
//! Boards are addressed as `(x, y)` where `x` grows to the right and `y`
//! grows upward from the floor (row 0 is the bottom row).
//!
//! # Reference configuration
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `cols` | 13 | Board width in cells |
//! | `rows` | 20 | Board height in cells |
//! | `tile_size` | 24 | Host pixel size of one cell |
//! | `tick_interval_ms` | 200 | Gravity period |
//! | `spawn_x` | 5 | Column of a new piece's anchor |
//!
//! # Examples
//!
//! ```
//! use falling_blocks_types::{GameAction, GameConfig, ShapeKind};
//!
//! let config = GameConfig::default();
//! assert!(config.validate().is_ok());
//! assert_eq!(config.spawn_y(), 19);
//!
//! assert_eq!(ShapeKind::from_str("t"), Some(ShapeKind::T));
//! assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Board width of the reference configuration (13 columns)
pub const DEFAULT_COLS: i32 = 13;

/// Board height of the reference configuration (20 rows)
pub const DEFAULT_ROWS: i32 = 20;

/// Host pixel size of a single cell
pub const DEFAULT_TILE_SIZE: i32 = 24;

/// Gravity period in milliseconds
pub const DEFAULT_TICK_INTERVAL_MS: u32 = 200;

/// Column of a freshly spawned piece's anchor
pub const DEFAULT_SPAWN_X: i32 = 5;

/// Largest side length of any shape mask
pub const MAX_SHAPE_SIZE: i32 = 4;

/// Upper bound for `cols` and `rows`.
///
/// Cell coordinates are reported to hosts that pack them into a byte each.
pub const MAX_DIMENSION: i32 = 0xff;

/// The seven shape variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl ShapeKind {
    /// Every variant, in a fixed order (index order for random selection)
    pub const ALL: [ShapeKind; 7] = [
        ShapeKind::I,
        ShapeKind::O,
        ShapeKind::T,
        ShapeKind::S,
        ShapeKind::Z,
        ShapeKind::J,
        ShapeKind::L,
    ];

    /// Parse shape kind from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(ShapeKind::I),
            "o" => Some(ShapeKind::O),
            "t" => Some(ShapeKind::T),
            "s" => Some(ShapeKind::S),
            "z" => Some(ShapeKind::Z),
            "j" => Some(ShapeKind::J),
            "l" => Some(ShapeKind::L),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::I => "i",
            ShapeKind::O => "o",
            ShapeKind::T => "t",
            ShapeKind::S => "s",
            ShapeKind::Z => "z",
            ShapeKind::J => "j",
            ShapeKind::L => "l",
        }
    }
}

/// Tile colors. Chosen independently of the shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Blue,
    Green,
    Orange,
    Purple,
    Red,
    Yellow,
}

impl Color {
    pub const ALL: [Color; 6] = [
        Color::Blue,
        Color::Green,
        Color::Orange,
        Color::Purple,
        Color::Red,
        Color::Yellow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Blue => "blue",
            Color::Green => "green",
            Color::Orange => "orange",
            Color::Purple => "purple",
            Color::Red => "red",
            Color::Yellow => "yellow",
        }
    }

    /// Stable non-zero id, used by snapshots (0 means an empty cell)
    pub fn id(&self) -> u8 {
        match self {
            Color::Blue => 1,
            Color::Green => 2,
            Color::Orange => 3,
            Color::Purple => 4,
            Color::Red => 5,
            Color::Yellow => 6,
        }
    }
}

/// Cell on the board (None = empty, Some = filled with the color that landed there)
pub type Cell = Option<Color>;

/// Absolute board position of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellPos {
    pub x: i32,
    pub y: i32,
}

impl CellPos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Game state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Running,
    Paused,
    RemovingRow,
    Over,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Running => "running",
            GameStatus::Paused => "paused",
            GameStatus::RemovingRow => "removing_row",
            GameStatus::Over => "over",
        }
    }

    /// Terminal for the current session
    pub fn is_over(&self) -> bool {
        matches!(self, GameStatus::Over)
    }
}

/// Discrete player/host requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    MoveLeft,
    MoveRight,
    Rotate,
    Pause,
    Resume,
}

impl GameAction {
    /// Parse action from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" | "left" => Some(GameAction::MoveLeft),
            "moveright" | "right" => Some(GameAction::MoveRight),
            "rotate" => Some(GameAction::Rotate),
            "pause" => Some(GameAction::Pause),
            "resume" => Some(GameAction::Resume),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::Rotate => "rotate",
            GameAction::Pause => "pause",
            GameAction::Resume => "resume",
        }
    }
}

/// Rejected configuration, reported before a session starts
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("cols must be in 1..=255, got {value}")]
    InvalidCols { value: i32 },
    #[error("rows must be in 1..=255, got {value}")]
    InvalidRows { value: i32 },
    #[error("tile_size must be positive, got {value}")]
    InvalidTileSize { value: i32 },
    #[error("tick_interval_ms must be positive")]
    ZeroTickInterval,
    #[error("spawn_x {spawn_x} leaves no room for a {width}-wide shape on a {cols}-column board")]
    SpawnOutOfBounds { spawn_x: i32, cols: i32, width: i32 },
    #[error("board is {board_cols}x{board_rows} but the config expects {cols}x{rows}")]
    BoardSizeMismatch {
        cols: i32,
        rows: i32,
        board_cols: i32,
        board_rows: i32,
    },
    #[error("malformed config: {0}")]
    Parse(String),
}

/// Per-session configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub cols: i32,
    pub rows: i32,
    pub tile_size: i32,
    pub tick_interval_ms: u32,
    pub spawn_x: i32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            cols: DEFAULT_COLS,
            rows: DEFAULT_ROWS,
            tile_size: DEFAULT_TILE_SIZE,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            spawn_x: DEFAULT_SPAWN_X,
        }
    }
}

impl GameConfig {
    /// Parse a JSON document; missing fields take their defaults.
    ///
    /// The result is validated, so a successful parse is ready to start a session.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: GameConfig =
            serde_json::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cols <= 0 || self.cols > MAX_DIMENSION {
            return Err(ConfigError::InvalidCols { value: self.cols });
        }
        if self.rows <= 0 || self.rows > MAX_DIMENSION {
            return Err(ConfigError::InvalidRows { value: self.rows });
        }
        if self.tile_size <= 0 {
            return Err(ConfigError::InvalidTileSize {
                value: self.tile_size,
            });
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.spawn_x < 0 || self.spawn_x + MAX_SHAPE_SIZE > self.cols {
            return Err(ConfigError::SpawnOutOfBounds {
                spawn_x: self.spawn_x,
                cols: self.cols,
                width: MAX_SHAPE_SIZE,
            });
        }
        Ok(())
    }

    /// Row of a freshly spawned piece's anchor (the top row)
    pub fn spawn_y(&self) -> i32 {
        self.rows - 1
    }

    /// Bottom-left pixel of a cell in host coordinates
    pub fn cell_origin_px(&self, pos: CellPos) -> (i32, i32) {
        (pos.x * self.tile_size, pos.y * self.tile_size)
    }
}
