//! Tetromino module - shape table and the matrix-backed active piece
//!
//! Each kind starts from a fixed occupancy matrix (at most 4x4). Rotation is
//! a plain 90° clockwise transform of that matrix with no kick search; the
//! engine checks the result against the board and restores the previous
//! matrix when it collides.

use arrayvec::ArrayVec;

use crate::types::{PieceKind, Rgb, BOARD_WIDTH};

/// Largest matrix side length.
pub const MAX_SIZE: usize = 4;

/// Occupancy matrix with its live dimensions.
///
/// Cells outside `rows x cols` are always `false`, so two matrices compare
/// equal exactly when their live regions do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    rows: usize,
    cols: usize,
    cells: [[bool; MAX_SIZE]; MAX_SIZE],
}

impl Shape {
    /// Parse a shape from row strings where `#` marks an occupied cell.
    const fn parse(rows_src: &[&str]) -> Self {
        let mut cells = [[false; MAX_SIZE]; MAX_SIZE];
        let rows = rows_src.len();
        let cols = rows_src[0].len();
        let mut y = 0;
        while y < rows {
            let bytes = rows_src[y].as_bytes();
            let mut x = 0;
            while x < cols {
                cells[y][x] = bytes[x] == b'#';
                x += 1;
            }
            y += 1;
        }
        Self { rows, cols, cells }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_filled(&self, x: usize, y: usize) -> bool {
        x < self.cols && y < self.rows && self.cells[y][x]
    }

    /// Matrix-local (x, y) offsets of every occupied cell, row-major.
    pub fn offsets(&self) -> ArrayVec<(i32, i32), 16> {
        let mut out = ArrayVec::new();
        for y in 0..self.rows {
            for x in 0..self.cols {
                if self.is_filled(x, y) {
                    out.push((x as i32, y as i32));
                }
            }
        }
        out
    }

    /// Number of occupied cells.
    pub fn filled_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| **c).count()
    }

    /// 90° clockwise: `rotated[x][rows - 1 - y] = self[y][x]`, dims swap.
    pub fn rotated_cw(&self) -> Self {
        let mut cells = [[false; MAX_SIZE]; MAX_SIZE];
        for y in 0..self.rows {
            for x in 0..self.cols {
                cells[x][self.rows - 1 - y] = self.cells[y][x];
            }
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            cells,
        }
    }
}

const I_SHAPE: Shape = Shape::parse(&["####"]);
const O_SHAPE: Shape = Shape::parse(&["##", "##"]);
const T_SHAPE: Shape = Shape::parse(&[".#.", "###"]);
const S_SHAPE: Shape = Shape::parse(&[".##", "##."]);
const Z_SHAPE: Shape = Shape::parse(&["##.", ".##"]);
const J_SHAPE: Shape = Shape::parse(&["#..", "###"]);
const L_SHAPE: Shape = Shape::parse(&["..#", "###"]);

/// Spawn orientation of a piece kind
pub fn base_shape(kind: PieceKind) -> Shape {
    match kind {
        PieceKind::I => I_SHAPE,
        PieceKind::O => O_SHAPE,
        PieceKind::T => T_SHAPE,
        PieceKind::S => S_SHAPE,
        PieceKind::Z => Z_SHAPE,
        PieceKind::J => J_SHAPE,
        PieceKind::L => L_SHAPE,
    }
}

/// Active falling piece
///
/// `Clone` is a full deep copy: the matrix is stored inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tetromino {
    kind: PieceKind,
    shape: Shape,
    pub x: i32,
    pub y: i32,
}

impl Tetromino {
    /// Create a piece in its spawn orientation with the anchor at (0, 0)
    pub fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            shape: base_shape(kind),
            x: 0,
            y: 0,
        }
    }

    /// Create a piece horizontally centered on row 0
    pub fn spawned(kind: PieceKind) -> Self {
        let mut piece = Self::new(kind);
        piece.center_at_top();
        piece
    }

    /// Move the anchor to the horizontally centered spawn position on row 0.
    pub fn center_at_top(&mut self) {
        self.x = BOARD_WIDTH as i32 / 2 - self.shape.cols as i32 / 2;
        self.y = 0;
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn color(&self) -> Rgb {
        self.kind.color()
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Replace the matrix, e.g. to undo a rotation.
    pub fn set_shape(&mut self, shape: Shape) {
        self.shape = shape;
    }

    /// Rotate 90° clockwise in place, without any collision check.
    pub fn rotate(&mut self) {
        self.shape = self.shape.rotated_cw();
    }

    /// Absolute board coordinates of every occupied cell
    pub fn blocks(&self) -> ArrayVec<(i32, i32), 16> {
        self.shape
            .offsets()
            .into_iter()
            .map(|(dx, dy)| (self.x + dx, self.y + dy))
            .collect()
    }

    /// Translate the anchor.
    pub fn shift(&mut self, dx: i32, dy: i32) {
        self.x += dx;
        self.y += dy;
    }
}
