//! Legal move generation for both games.
//!
//! Checkers generation works per piece: a piece that can capture may only
//! capture, but under [`CaptureRule::PerPiece`] a different piece of the same
//! side may still make a quiet move. [`CaptureRule::Global`] restores the
//! standard board-wide rule.
//!
//! Output order is deterministic: pieces in row-major order, directions in
//! the order of [`DIAGONALS`] / [`ORTHOGONALS`].

use crate::board::{CheckersBoard, Hole, MarblesBoard, Player, Square, CHECKERS_SIZE, MARBLES_SIZE};
use crate::cell::{Cell, DIAGONALS, ORTHOGONALS};
use crate::config::CaptureRule;
use serde::{Deserialize, Serialize};

/// A single step or jump.
///
/// A multi-jump is a sequence of moves by the same piece, each with its own
/// captured cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Cell,
    pub to: Cell,
    /// The jumped cell, if this move captures
    pub captured: Option<Cell>,
}

impl Move {
    /// A non-capturing move
    pub fn step(from: Cell, to: Cell) -> Self {
        Self {
            from,
            to,
            captured: None,
        }
    }

    /// A jump over the cell between `from` and `to`
    pub fn jump(from: Cell, to: Cell) -> Self {
        Self {
            from,
            to,
            captured: Some(from.midpoint(to)),
        }
    }

    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

/// Diagonal directions a square's piece may move in
fn directions(square: Square) -> Vec<(i8, i8)> {
    match square {
        Square::Empty => Vec::new(),
        Square::King(_) => DIAGONALS.to_vec(),
        Square::Man(player) => DIAGONALS
            .iter()
            .copied()
            .filter(|(dr, _)| *dr == player.forward())
            .collect(),
    }
}

/// Captures available to `player`'s piece at `from`
pub fn checkers_captures(board: &CheckersBoard, from: Cell, player: Player) -> Vec<Move> {
    let square = board.piece_at(from);
    if square.owner() != Some(player) {
        return Vec::new();
    }

    directions(square)
        .into_iter()
        .filter_map(|(dr, dc)| {
            let over = from.offset(dr, dc, CHECKERS_SIZE)?;
            let to = from.offset(2 * dr, 2 * dc, CHECKERS_SIZE)?;
            let jumps_opponent = board.piece_at(over).owner() == Some(player.opponent());
            (jumps_opponent && board.piece_at(to).is_empty()).then(|| Move::jump(from, to))
        })
        .collect()
}

/// Legal moves for the piece at `from`, ignoring the rest of the board.
///
/// If the piece has any capture, only its captures are returned.
pub fn checkers_piece_moves(board: &CheckersBoard, from: Cell, player: Player) -> Vec<Move> {
    let captures = checkers_captures(board, from, player);
    if !captures.is_empty() {
        return captures;
    }

    let square = board.piece_at(from);
    if square.owner() != Some(player) {
        return Vec::new();
    }

    directions(square)
        .into_iter()
        .filter_map(|(dr, dc)| from.offset(dr, dc, CHECKERS_SIZE))
        .filter(|to| board.piece_at(*to).is_empty())
        .map(|to| Move::step(from, to))
        .collect()
}

/// Whether any of `player`'s pieces has a capture
pub fn player_has_capture(board: &CheckersBoard, player: Player) -> bool {
    board
        .pieces(player)
        .any(|cell| !checkers_captures(board, cell, player).is_empty())
}

/// Legal moves for the piece at `from` under the given capture rule
pub fn checkers_moves(
    board: &CheckersBoard,
    from: Cell,
    player: Player,
    rule: CaptureRule,
) -> Vec<Move> {
    let moves = checkers_piece_moves(board, from, player);
    match rule {
        CaptureRule::PerPiece => moves,
        CaptureRule::Global => {
            let captures_here = moves.iter().any(Move::is_capture);
            if !captures_here && player_has_capture(board, player) {
                Vec::new()
            } else {
                moves
            }
        }
    }
}

/// Every legal move for `player` across all of their pieces
pub fn checkers_player_moves(board: &CheckersBoard, player: Player, rule: CaptureRule) -> Vec<Move> {
    let moves: Vec<Move> = board
        .pieces(player)
        .flat_map(|cell| checkers_piece_moves(board, cell, player))
        .collect();

    match rule {
        CaptureRule::PerPiece => moves,
        CaptureRule::Global => {
            if moves.iter().any(Move::is_capture) {
                moves.into_iter().filter(Move::is_capture).collect()
            } else {
                moves
            }
        }
    }
}

/// Whether `player` has at least one legal move.
///
/// Both capture rules agree here: a side with a capture always has a move.
pub fn has_any_checkers_move(board: &CheckersBoard, player: Player) -> bool {
    board
        .pieces(player)
        .any(|cell| !checkers_piece_moves(board, cell, player).is_empty())
}

/// Jumps available to the marble at `from`
pub fn marble_moves(board: &MarblesBoard, from: Cell) -> Vec<Move> {
    if board.hole_at(from) != Hole::Marble {
        return Vec::new();
    }

    ORTHOGONALS
        .iter()
        .filter_map(|&(dr, dc)| {
            let over = from.offset(dr, dc, MARBLES_SIZE)?;
            let to = from.offset(2 * dr, 2 * dc, MARBLES_SIZE)?;
            (board.hole_at(over) == Hole::Marble && board.hole_at(to) == Hole::Empty)
                .then(|| Move::jump(from, to))
        })
        .collect()
}

/// Whether any marble on the board can jump
pub fn has_any_marble_move(board: &MarblesBoard) -> bool {
    board.marbles().any(|cell| !marble_moves(board, cell).is_empty())
}
