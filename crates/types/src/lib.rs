//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, terminal rendering, WebSocket protocol).
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19)
//! - Pieces spawn horizontally centered on row 0
//!
//! # Game Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 FPS) |
//! | `BASE_DROP_MS` | 500 | Gravity at level 1 |
//! | `DROP_STEP_MS` | 50 | Gravity speed-up per level |
//! | `MIN_DROP_MS` | 100 | Gravity floor |
//! | `LINE_CLEAR_DELAY_MS` | 200 | Flash time before completed rows are removed |
//!
//! # Examples
//!
//! ```
//! use zen_tetris_types::{GameAction, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let parsed = PieceKind::from_str("t").unwrap();
//! assert_eq!(parsed, PieceKind::T);
//!
//! let action = GameAction::from_str("hard_drop").unwrap();
//! assert_eq!(action, GameAction::HardDrop);
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Gravity interval at level 1
pub const BASE_DROP_MS: u32 = 500;

/// Gravity gets this much faster with every level
pub const DROP_STEP_MS: u32 = 50;

/// Gravity never gets faster than this
pub const MIN_DROP_MS: u32 = 100;

/// Lines needed to advance one level
pub const LINES_PER_LEVEL: u32 = 10;

/// Delay between a line-clearing lock and the actual row removal
pub const LINE_CLEAR_DELAY_MS: u32 = 200;

/// Upper bound on hard drop steps
pub const HARD_DROP_LIMIT: u32 = BOARD_HEIGHT as u32 + 5;

/// Base points for clearing N lines (index = N), multiplied by level.
///
/// Index 0 and anything past 4 score nothing.
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// Bonus per previous consecutive clearing lock
pub const COMBO_STEP: u32 = 50;

/// Combo bonus cap
pub const COMBO_CAP: u32 = 500;

/// Number of rows cleared at once that counts as a "Tetris"
pub const TETRIS_LINES: usize = 4;


/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// Gold used by the line-clear sparkle and the Tetris shower.
pub const PARTICLE_GOLD: Rgb = Rgb::new(255, 215, 0);

/// The seven tetromino piece kinds
///
/// Each piece has a distinct earth-tone color:
/// - **I**: Warm brown, horizontal bar
/// - **O**: Tan, 2x2 square
/// - **T**: Dusty purple
/// - **S**: Sage green
/// - **Z**: Mocha
/// - **J**: Olive gray
/// - **L**: Honey brown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All kinds, in table order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use zen_tetris_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Uppercase letter, as drawn in the side panel.
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::O => "O",
            PieceKind::T => "T",
            PieceKind::S => "S",
            PieceKind::Z => "Z",
            PieceKind::J => "J",
            PieceKind::L => "L",
        }
    }

    /// Fixed display color for this kind.
    pub fn color(&self) -> Rgb {
        match self {
            PieceKind::I => Rgb::new(139, 115, 85),
            PieceKind::O => Rgb::new(210, 180, 140),
            PieceKind::T => Rgb::new(107, 91, 115),
            PieceKind::S => Rgb::new(156, 175, 136),
            PieceKind::Z => Rgb::new(160, 132, 92),
            PieceKind::J => Rgb::new(125, 132, 113),
            PieceKind::L => Rgb::new(184, 146, 106),
        }
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(PieceKind)`: Cell filled by a locked piece of that kind (and therefore its color)
pub type Cell = Option<PieceKind>;

/// Discrete commands accepted by the engine.
///
/// The terminal front-end maps keys onto these; the WebSocket protocol maps
/// `{"type":"input","action":...}` onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Move piece one cell down; locks it if it cannot move
    SoftDrop,
    /// Rotate piece 90° clockwise
    Rotate,
    /// Drop piece until it locks
    HardDrop,
    /// Toggle pause state
    Pause,
    /// Restart the game
    Restart,
}

impl GameAction {
    /// Parse action from its wire name.
    ///
    /// Accepts both snake_case (`move_left`) and camelCase (`moveLeft`), plus
    /// `move_down` as an alias of `soft_drop`.
    pub fn from_str(s: &str) -> Option<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "moveleft" | "left" => Some(GameAction::MoveLeft),
            "moveright" | "right" => Some(GameAction::MoveRight),
            "softdrop" | "movedown" | "down" => Some(GameAction::SoftDrop),
            "rotate" | "rotatecw" => Some(GameAction::Rotate),
            "harddrop" => Some(GameAction::HardDrop),
            "pause" => Some(GameAction::Pause),
            "restart" => Some(GameAction::Restart),
            _ => None,
        }
    }

    /// Canonical snake_case wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "move_left",
            GameAction::MoveRight => "move_right",
            GameAction::SoftDrop => "soft_drop",
            GameAction::Rotate => "rotate",
            GameAction::HardDrop => "hard_drop",
            GameAction::Pause => "pause",
            GameAction::Restart => "restart",
        }
    }
}

/// Engine lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    Playing,
    Paused,
    GameOver,
}

/// Core-side event emitted when a lock completes one or more rows.
///
/// Carries the colors of each completed row captured before removal, so
/// observers (particle effects) never need to look at the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineClearEvent {
    /// Completed rows, ascending
    pub rows: Vec<usize>,
    /// Cell contents of each completed row, same order as `rows`
    pub cells: Vec<[Cell; BOARD_WIDTH as usize]>,
    /// Consecutive clearing locks, including this one
    pub combo: u32,
}

impl LineClearEvent {
    pub fn line_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_tetris(&self) -> bool {
        self.rows.len() >= TETRIS_LINES
    }
}
