//! Board module - manages the game grid
//!
//! The board is a 10x20 grid where each cell can be empty or filled with a piece kind.
//! Uses a flat array for better cache locality and zero-allocation.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19 (top to bottom).
//!
//! Every coordinate-taking accessor is total: out-of-range coordinates yield
//! `None` (reads) or are ignored (writes), never a panic.

use arrayvec::ArrayVec;

use crate::tetromino::Tetromino;
use crate::types::{Cell, Rgb, BOARD_HEIGHT, BOARD_WIDTH};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

const WIDTH: usize = BOARD_WIDTH as usize;
const HEIGHT: usize = BOARD_HEIGHT as usize;

/// Row indices, at most one per board row.
pub type RowList = ArrayVec<usize, HEIGHT>;

/// The game board - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i32, y: i32) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i32 || y < 0 || y >= BOARD_HEIGHT as i32 {
            return None;
        }
        Some((y as usize) * WIDTH + (x as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Color of the block at (x, y), or None when empty or out of bounds.
    pub fn block_color(&self, x: i32, y: i32) -> Option<Rgb> {
        self.get(x, y).flatten().map(|kind| kind.color())
    }

    /// Check whether `piece` at its current anchor overlaps a wall, the floor,
    /// or a filled cell.
    ///
    /// Cells above the board (y < 0) only get the horizontal bounds check, so
    /// a piece may sit partially above row 0.
    pub fn check_collision(&self, piece: &Tetromino) -> bool {
        piece.blocks().iter().any(|&(x, y)| {
            if x < 0 || x >= BOARD_WIDTH as i32 {
                return true;
            }
            if y >= BOARD_HEIGHT as i32 {
                return true;
            }
            y >= 0 && self.is_occupied(x, y)
        })
    }

    /// Write every in-bounds cell of `piece` into the board with its kind.
    ///
    /// Does not check for collision; cells above row 0 are dropped.
    pub fn place_tetromino(&mut self, piece: &Tetromino) {
        for (x, y) in piece.blocks() {
            self.set(x, y, Some(piece.kind()));
        }
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= HEIGHT {
            return false;
        }
        let start = y * WIDTH;
        self.cells[start..start + WIDTH].iter().all(|cell| cell.is_some())
    }

    /// Completed rows, ascending.
    pub fn completed_lines(&self) -> RowList {
        (0..HEIGHT).filter(|&y| self.is_row_full(y)).collect()
    }

    /// Copy of row `y`, or None if out of bounds.
    pub fn row(&self, y: usize) -> Option<[Cell; WIDTH]> {
        if y >= HEIGHT {
            return None;
        }
        let mut out = [None; WIDTH];
        out.copy_from_slice(&self.cells[y * WIDTH..(y + 1) * WIDTH]);
        Some(out)
    }

    /// Remove the given rows and shift everything above them down.
    ///
    /// Rows may be given in any order; duplicates and out-of-range indices are
    /// ignored. An empty slice is a no-op. Uses a bottom-up two-pointer pass
    /// with `copy_within`, so rows that survive keep their relative order.
    pub fn clear_lines(&mut self, rows: &[usize]) {
        let mut remove = [false; HEIGHT];
        let mut any = false;
        for &y in rows {
            if y < HEIGHT {
                remove[y] = true;
                any = true;
            }
        }
        if !any {
            return;
        }

        let mut write_y = HEIGHT;
        for read_y in (0..HEIGHT).rev() {
            if remove[read_y] {
                continue;
            }
            write_y -= 1;
            if write_y != read_y {
                let src = read_y * WIDTH;
                self.cells.copy_within(src..src + WIDTH, write_y * WIDTH);
            }
        }

        for cell in &mut self.cells[..write_y * WIDTH] {
            *cell = None;
        }
    }

    /// True iff no cell is filled
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| c.is_none())
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// Create from a 2D vector (converts to flat array)
    ///
    /// Panics if the dimensions are not 20 rows of 10 cells.
    pub fn from_cells(cells_2d: Vec<Vec<Cell>>) -> Self {
        assert_eq!(cells_2d.len(), HEIGHT);
        assert!(cells_2d.iter().all(|row| row.len() == WIDTH));

        let mut flat = [None; BOARD_SIZE];
        for (y, row) in cells_2d.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                flat[y * WIDTH + x] = *cell;
            }
        }
        Self { cells: flat }
    }

    /// Convert to 2D vector for testing/display
    pub fn to_cells(&self) -> Vec<Vec<Cell>> {
        self.cells.chunks(WIDTH).map(|row| row.to_vec()).collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PieceKind;

    #[test]
    fn test_board_index_calculation() {
        assert_eq!(Board::index(0, 0), Some(0));
        assert_eq!(Board::index(9, 0), Some(9));
        assert_eq!(Board::index(0, 1), Some(10));
        assert_eq!(Board::index(9, 19), Some(199));
        assert_eq!(Board::index(-1, 0), None);
        assert_eq!(Board::index(10, 0), None);
        assert_eq!(Board::index(0, 20), None);
        assert_eq!(Board::index(i32::MIN, i32::MAX), None);
    }

    #[test]
    fn test_board_flat_array() {
        let mut board = Board::new();

        board.set(0, 0, Some(PieceKind::I));
        board.set(5, 10, Some(PieceKind::T));

        assert_eq!(board.cells[0], Some(PieceKind::I));
        assert_eq!(board.cells[10 * 10 + 5], Some(PieceKind::T));
    }

    #[test]
    fn test_board_from_cells_roundtrip() {
        let mut cells_2d = vec![vec![None; 10]; 20];
        cells_2d[5][3] = Some(PieceKind::O);
        cells_2d[10][7] = Some(PieceKind::L);

        let board = Board::from_cells(cells_2d.clone());
        assert_eq!(cells_2d, board.to_cells());
    }

    #[test]
    fn test_clear_lines_non_contiguous_unsorted() {
        let mut board = Board::new();
        for x in 0..10 {
            board.set(x, 19, Some(PieceKind::I));
            board.set(x, 17, Some(PieceKind::I));
        }
        board.set(2, 18, Some(PieceKind::T));
        board.set(4, 16, Some(PieceKind::S));

        board.clear_lines(&[17, 19, 17]);

        // Row 18 fell by one, row 16 fell by two.
        assert_eq!(board.get(2, 19), Some(Some(PieceKind::T)));
        assert_eq!(board.get(4, 18), Some(Some(PieceKind::S)));
        assert!(board.completed_lines().is_empty());
        assert_eq!(board.cells().iter().filter(|c| c.is_some()).count(), 2);
    }

    #[test]
    fn test_clear_lines_ignores_out_of_range() {
        let mut board = Board::new();
        board.set(3, 3, Some(PieceKind::Z));
        let before = board.clone();

        board.clear_lines(&[20, 99]);
        assert_eq!(board, before);

        board.clear_lines(&[]);
        assert_eq!(board, before);
    }
}
