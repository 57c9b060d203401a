//! Board representation for both games.
//!
//! This module contains:
//! - Checkers players, squares and the 8x8 board
//! - Marbles holes and the 7x7 cross-shaped peg-solitaire board
//! - Read accessors and move application for each board
//!
//! Boards are stored as flat row-major vectors of an enum, so a square can
//! never be confused between "whose piece" and "what rank".

use crate::cell::Cell;
use crate::moves::Move;
use serde::{Deserialize, Serialize};

/// Side length of the Checkers board
pub const CHECKERS_SIZE: u8 = 8;

/// Side length of the Marbles board
pub const MARBLES_SIZE: u8 = 7;

/// Men per side at the start of a Checkers game
pub const PIECES_PER_SIDE: u32 = 12;

/// Checkers side.
///
/// Red starts on rows 5-7 and advances toward row 0. Black starts on rows 0-2
/// and advances toward row 7. Red moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    Red,
    Black,
}

impl Player {
    pub const ALL: [Player; 2] = [Player::Red, Player::Black];

    pub fn opponent(self) -> Player {
        match self {
            Player::Red => Player::Black,
            Player::Black => Player::Red,
        }
    }

    /// Row delta of a forward step for this side's men
    pub fn forward(self) -> i8 {
        match self {
            Player::Red => -1,
            Player::Black => 1,
        }
    }

    /// Row on which this side's men are crowned
    pub fn crowning_row(self) -> u8 {
        match self {
            Player::Red => 0,
            Player::Black => CHECKERS_SIZE - 1,
        }
    }
}

/// Contents of a Checkers square
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Square {
    #[default]
    Empty,
    Man(Player),
    King(Player),
}

impl Square {
    /// The side owning the piece on this square, if any
    pub fn owner(self) -> Option<Player> {
        match self {
            Square::Empty => None,
            Square::Man(p) | Square::King(p) => Some(p),
        }
    }

    pub fn is_empty(self) -> bool {
        matches!(self, Square::Empty)
    }

    pub fn is_king(self) -> bool {
        matches!(self, Square::King(_))
    }

    pub fn is_man(self) -> bool {
        matches!(self, Square::Man(_))
    }
}

/// The 8x8 Checkers board.
///
/// Only dark squares ((row + col) odd) are ever occupied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckersBoard {
    squares: Vec<Square>,
}

impl Default for CheckersBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckersBoard {
    /// Create the standard opening layout: Black on rows 0-2, Red on rows 5-7.
    pub fn new() -> Self {
        let mut board = Self::empty();
        for row in 0..CHECKERS_SIZE {
            let owner = match row {
                0..=2 => Player::Black,
                5..=7 => Player::Red,
                _ => continue,
            };
            for col in 0..CHECKERS_SIZE {
                let cell = Cell::new(row, col);
                if cell.is_dark() {
                    board.put(cell, Square::Man(owner));
                }
            }
        }
        board
    }

    /// A board with no pieces on it
    pub fn empty() -> Self {
        Self {
            squares: vec![Square::Empty; CHECKERS_SIZE as usize * CHECKERS_SIZE as usize],
        }
    }

    /// Build a position from explicit placements. Placements on light or
    /// off-board squares are skipped.
    pub fn with_pieces(pieces: &[(Cell, Square)]) -> Self {
        let mut board = Self::empty();
        for &(cell, square) in pieces {
            if cell.in_bounds(CHECKERS_SIZE) && cell.is_dark() {
                board.put(cell, square);
            }
        }
        board
    }

    pub fn is_valid_cell(&self, cell: Cell) -> bool {
        cell.in_bounds(CHECKERS_SIZE)
    }

    /// What occupies a cell. Off-board cells read as empty.
    pub fn piece_at(&self, cell: Cell) -> Square {
        if self.is_valid_cell(cell) {
            self.squares[cell.index(CHECKERS_SIZE)]
        } else {
            Square::Empty
        }
    }

    fn put(&mut self, cell: Cell, square: Square) {
        let idx = cell.index(CHECKERS_SIZE);
        self.squares[idx] = square;
    }

    /// Number of pieces (men and kings) a side has on the board
    pub fn count_for(&self, player: Player) -> u32 {
        self.squares
            .iter()
            .filter(|s| s.owner() == Some(player))
            .count() as u32
    }

    /// Number of pieces of both sides
    pub fn total_pieces(&self) -> u32 {
        self.squares.iter().filter(|s| !s.is_empty()).count() as u32
    }

    /// Cells holding a side's pieces, in row-major order
    pub fn pieces(&self, player: Player) -> impl Iterator<Item = Cell> + '_ {
        self.squares
            .iter()
            .enumerate()
            .filter(move |(_, s)| s.owner() == Some(player))
            .map(|(i, _)| Cell::new(i as u8 / CHECKERS_SIZE, i as u8 % CHECKERS_SIZE))
    }

    /// Apply a move produced by the move generator.
    ///
    /// Relocates the piece, removes the captured piece and crowns a man that
    /// lands on its crowning row. Returns whether the piece was crowned.
    pub fn apply_move(&mut self, mv: &Move) -> bool {
        let piece = self.piece_at(mv.from);
        let Some(owner) = piece.owner() else {
            return false;
        };

        self.put(mv.from, Square::Empty);
        if let Some(captured) = mv.captured {
            self.put(captured, Square::Empty);
        }

        let crowned = piece.is_man() && mv.to.row == owner.crowning_row();
        let landed = if crowned { Square::King(owner) } else { piece };
        self.put(mv.to, landed);
        crowned
    }

    /// The board as rows, for rendering
    pub fn rows(&self) -> Vec<Vec<Square>> {
        self.squares
            .chunks(CHECKERS_SIZE as usize)
            .map(|row| row.to_vec())
            .collect()
    }
}

/// Contents of a Marbles hole
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hole {
    /// Outside the playable cross
    Invalid,
    Empty,
    Marble,
}

/// The 7x7 cross-shaped peg-solitaire board (33 holes).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarblesBoard {
    holes: Vec<Hole>,
}

impl Default for MarblesBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl MarblesBoard {
    /// Centre hole, empty at the start of a game
    pub const CENTER: Cell = Cell::new(3, 3);

    /// Every hole filled except the centre: 32 marbles.
    pub fn new() -> Self {
        let mut board = Self::cleared();
        for idx in 0..board.holes.len() {
            if board.holes[idx] == Hole::Empty {
                board.holes[idx] = Hole::Marble;
            }
        }
        let center = Self::CENTER.index(MARBLES_SIZE);
        board.holes[center] = Hole::Empty;
        board
    }

    /// A board whose only marbles are at the given cells. Cells outside the
    /// cross are skipped.
    pub fn with_marbles(marbles: &[Cell]) -> Self {
        let mut board = Self::cleared();
        for &cell in marbles {
            if Self::on_cross(cell) {
                board.holes[cell.index(MARBLES_SIZE)] = Hole::Marble;
            }
        }
        board
    }

    fn cleared() -> Self {
        let holes = (0..MARBLES_SIZE)
            .flat_map(|row| (0..MARBLES_SIZE).map(move |col| Cell::new(row, col)))
            .map(|cell| {
                if Self::on_cross(cell) {
                    Hole::Empty
                } else {
                    Hole::Invalid
                }
            })
            .collect();
        Self { holes }
    }

    /// A cell is playable iff its row or its column is in 2..=4.
    pub fn on_cross(cell: Cell) -> bool {
        cell.in_bounds(MARBLES_SIZE)
            && ((2..=4).contains(&cell.row) || (2..=4).contains(&cell.col))
    }

    pub fn is_valid_cell(&self, cell: Cell) -> bool {
        Self::on_cross(cell)
    }

    /// What occupies a hole. Anything off the cross reads as `Invalid`.
    pub fn hole_at(&self, cell: Cell) -> Hole {
        if cell.in_bounds(MARBLES_SIZE) {
            self.holes[cell.index(MARBLES_SIZE)]
        } else {
            Hole::Invalid
        }
    }

    pub fn marble_count(&self) -> u32 {
        self.holes.iter().filter(|h| **h == Hole::Marble).count() as u32
    }

    /// Cells holding marbles, in row-major order
    pub fn marbles(&self) -> impl Iterator<Item = Cell> + '_ {
        self.holes
            .iter()
            .enumerate()
            .filter(|(_, h)| **h == Hole::Marble)
            .map(|(i, _)| Cell::new(i as u8 / MARBLES_SIZE, i as u8 % MARBLES_SIZE))
    }

    /// Apply a jump produced by the move generator: the marble moves to the
    /// destination and the jumped marble is removed.
    pub fn apply_move(&mut self, mv: &Move) {
        if self.hole_at(mv.from) != Hole::Marble || self.hole_at(mv.to) != Hole::Empty {
            return;
        }
        self.holes[mv.from.index(MARBLES_SIZE)] = Hole::Empty;
        if let Some(jumped) = mv.captured {
            self.holes[jumped.index(MARBLES_SIZE)] = Hole::Empty;
        }
        self.holes[mv.to.index(MARBLES_SIZE)] = Hole::Marble;
    }

    /// The board as rows, for rendering
    pub fn rows(&self) -> Vec<Vec<Hole>> {
        self.holes
            .chunks(MARBLES_SIZE as usize)
            .map(|row| row.to_vec())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_checkers_opening_layout() {
        let board = CheckersBoard::new();

        assert_eq!(board.count_for(Player::Red), PIECES_PER_SIDE);
        assert_eq!(board.count_for(Player::Black), PIECES_PER_SIDE);

        for player in Player::ALL {
            for cell in board.pieces(player) {
                assert!(cell.is_dark(), "{} is a light square", cell);
                assert!(cell.row != 3 && cell.row != 4, "{} is in the gap", cell);
            }
        }
        assert_eq!(board.piece_at(Cell::new(0, 1)), Square::Man(Player::Black));
        assert_eq!(board.piece_at(Cell::new(7, 0)), Square::Man(Player::Red));
    }

    #[test]
    fn test_checkers_apply_simple_move() {
        let mut board = CheckersBoard::new();
        let mv = Move::step(Cell::new(5, 0), Cell::new(4, 1));

        let crowned = board.apply_move(&mv);

        assert!(!crowned);
        assert_eq!(board.piece_at(Cell::new(5, 0)), Square::Empty);
        assert_eq!(board.piece_at(Cell::new(4, 1)), Square::Man(Player::Red));
        assert_eq!(board.total_pieces(), 24);
    }

    #[test]
    fn test_checkers_capture_removes_piece() {
        let mut board = CheckersBoard::with_pieces(&[
            (Cell::new(5, 2), Square::Man(Player::Red)),
            (Cell::new(4, 3), Square::Man(Player::Black)),
        ]);

        board.apply_move(&Move::jump(Cell::new(5, 2), Cell::new(3, 4)));

        assert_eq!(board.count_for(Player::Black), 0);
        assert_eq!(board.piece_at(Cell::new(3, 4)), Square::Man(Player::Red));
    }

    #[test]
    fn test_checkers_crowning() {
        let mut board = CheckersBoard::with_pieces(&[
            (Cell::new(1, 2), Square::Man(Player::Red)),
            (Cell::new(6, 1), Square::Man(Player::Black)),
        ]);

        assert!(board.apply_move(&Move::step(Cell::new(1, 2), Cell::new(0, 1))));
        assert_eq!(board.piece_at(Cell::new(0, 1)), Square::King(Player::Red));

        assert!(board.apply_move(&Move::step(Cell::new(6, 1), Cell::new(7, 0))));
        assert_eq!(board.piece_at(Cell::new(7, 0)), Square::King(Player::Black));
    }

    #[test]
    fn test_king_is_not_recrowned() {
        let mut board =
            CheckersBoard::with_pieces(&[(Cell::new(1, 2), Square::King(Player::Red))]);
        assert!(!board.apply_move(&Move::step(Cell::new(1, 2), Cell::new(0, 1))));
    }

    #[test]
    fn test_with_pieces_skips_light_squares() {
        let board = CheckersBoard::with_pieces(&[(Cell::new(0, 0), Square::Man(Player::Red))]);
        assert_eq!(board.total_pieces(), 0);
    }

    #[test]
    fn test_marbles_opening_layout() {
        let board = MarblesBoard::new();

        assert_eq!(board.marble_count(), 32);
        assert_eq!(board.hole_at(MarblesBoard::CENTER), Hole::Empty);

        for (rows, cols) in [(0..2, 0..2), (0..2, 5..7), (5..7, 0..2), (5..7, 5..7)] {
            for row in rows.clone() {
                for col in cols.clone() {
                    assert_eq!(board.hole_at(Cell::new(row, col)), Hole::Invalid);
                }
            }
        }

        let valid = (0..MARBLES_SIZE)
            .flat_map(|r| (0..MARBLES_SIZE).map(move |c| Cell::new(r, c)))
            .filter(|c| board.is_valid_cell(*c))
            .count();
        assert_eq!(valid, 33);
    }

    #[test]
    fn test_marbles_jump() {
        let mut board = MarblesBoard::new();
        let mv = Move::jump(Cell::new(1, 3), Cell::new(3, 3));

        board.apply_move(&mv);

        assert_eq!(board.marble_count(), 31);
        assert_eq!(board.hole_at(Cell::new(1, 3)), Hole::Empty);
        assert_eq!(board.hole_at(Cell::new(2, 3)), Hole::Empty);
        assert_eq!(board.hole_at(Cell::new(3, 3)), Hole::Marble);
    }

    #[test]
    fn test_marbles_off_board_is_invalid() {
        let board = MarblesBoard::new();
        assert_eq!(board.hole_at(Cell::new(9, 3)), Hole::Invalid);
        assert!(!board.is_valid_cell(Cell::new(0, 0)));
    }
}
