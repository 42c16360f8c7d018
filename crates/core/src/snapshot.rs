use arrayvec::ArrayVec;

use crate::board::RowList;
use crate::tetromino::Tetromino;
use crate::types::{Cell, GameStatus, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

/// Cells of one piece, either in board coordinates (current piece) or
/// matrix-local coordinates (next-piece preview).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PieceSnapshot {
    pub kind: PieceKind,
    pub blocks: ArrayVec<(i32, i32), 16>,
}

impl PieceSnapshot {
    /// Absolute cells of a piece on the board
    pub fn on_board(piece: &Tetromino) -> Self {
        Self {
            kind: piece.kind(),
            blocks: piece.blocks(),
        }
    }

    /// Cells of a piece relative to its own matrix
    pub fn preview(piece: &Tetromino) -> Self {
        Self {
            kind: piece.kind(),
            blocks: piece.shape().offsets(),
        }
    }
}

/// Plain-data view of the engine for renderers and the network layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    pub board: [[Cell; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
    pub current: Option<PieceSnapshot>,
    pub next: Option<PieceSnapshot>,
    pub score: u32,
    pub lines: u32,
    pub level: u32,
    pub combo: u32,
    pub drop_interval_ms: u32,
    pub flash_lines: RowList,
    pub paused: bool,
    pub game_over: bool,
    pub episode_id: u32,
}

impl GameSnapshot {
    pub fn status(&self) -> GameStatus {
        if self.game_over {
            GameStatus::GameOver
        } else if self.paused {
            GameStatus::Paused
        } else {
            GameStatus::Playing
        }
    }

    /// True if row `y` is waiting to be removed.
    pub fn is_flashing(&self, y: usize) -> bool {
        self.flash_lines.contains(&y)
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: [[None; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            current: None,
            next: None,
            score: 0,
            lines: 0,
            level: 1,
            combo: 0,
            drop_interval_ms: 0,
            flash_lines: RowList::new(),
            paused: false,
            game_over: false,
            episode_id: 0,
        }
    }
}
