//! Grid coordinates shared by the Checkers and Marbles boards.
//!
//! Both games are played on square grids addressed by `(row, col)` with the
//! origin in the top-left corner. Row 0 is the top edge as rendered by the UI.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The four diagonal steps, in the order moves are generated.
pub const DIAGONALS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// The four orthogonal steps: up, down, left, right.
pub const ORTHOGONALS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// A square on a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: u8,
    pub col: u8,
}

impl Cell {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// The cell `dr` rows and `dc` columns away, if it lies on a `size` x `size` grid.
    pub fn offset(self, dr: i8, dc: i8, size: u8) -> Option<Cell> {
        let row = self.row as i16 + dr as i16;
        let col = self.col as i16 + dc as i16;
        let size = size as i16;
        if (0..size).contains(&row) && (0..size).contains(&col) {
            Some(Cell::new(row as u8, col as u8))
        } else {
            None
        }
    }

    /// The cell lying halfway between two cells that are two steps apart.
    pub fn midpoint(self, other: Cell) -> Cell {
        Cell::new(
            ((self.row as u16 + other.row as u16) / 2) as u8,
            ((self.col as u16 + other.col as u16) / 2) as u8,
        )
    }

    /// Whether the cell lies inside a `size` x `size` grid.
    pub fn in_bounds(self, size: u8) -> bool {
        self.row < size && self.col < size
    }

    /// Index into a row-major flat array for a `size` x `size` grid.
    pub fn index(self, size: u8) -> usize {
        self.row as usize * size as usize + self.col as usize
    }

    /// Dark squares are the playable squares of a draughts board.
    pub fn is_dark(self) -> bool {
        (self.row as u16 + self.col as u16) % 2 == 1
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_stays_on_board() {
        let corner = Cell::new(0, 0);
        assert_eq!(corner.offset(1, 1, 8), Some(Cell::new(1, 1)));
        assert_eq!(corner.offset(-1, 1, 8), None);
        assert_eq!(Cell::new(7, 7).offset(1, 0, 8), None);
        assert_eq!(Cell::new(6, 6).offset(0, 1, 7), None);
    }

    #[test]
    fn test_midpoint() {
        assert_eq!(Cell::new(5, 2).midpoint(Cell::new(3, 4)), Cell::new(4, 3));
        assert_eq!(Cell::new(3, 1).midpoint(Cell::new(3, 3)), Cell::new(3, 2));
    }

    #[test]
    fn test_dark_squares() {
        assert!(Cell::new(0, 1).is_dark());
        assert!(!Cell::new(0, 0).is_dark());
        assert!(Cell::new(7, 0).is_dark());
    }

    #[test]
    fn test_index_is_row_major() {
        assert_eq!(Cell::new(0, 0).index(8), 0);
        assert_eq!(Cell::new(1, 0).index(8), 8);
        assert_eq!(Cell::new(3, 3).index(7), 24);
    }
}
