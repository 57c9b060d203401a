//! End-of-game detection.
//!
//! Evaluated once per completed turn, after any multi-jump has finished.

use crate::board::{CheckersBoard, MarblesBoard, Player};
use crate::moves::{has_any_checkers_move, has_any_marble_move};
use crate::score::GameResult;
use serde::{Deserialize, Serialize};

/// How a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Terminal {
    /// Checkers won by `player`
    Winner { player: Player },
    /// Checkers drawn
    Draw,
    /// Marbles solved: one marble left
    Solved,
    /// Marbles stuck with more than one marble left
    Stuck { marbles_left: u32 },
}

impl Terminal {
    /// The result as seen by a user playing `side` (ignored for Marbles)
    pub fn result_for(self, side: Player) -> GameResult {
        match self {
            Terminal::Winner { player } if player == side => GameResult::Win,
            Terminal::Winner { .. } => GameResult::Loss,
            Terminal::Draw => GameResult::Draw,
            Terminal::Solved => GameResult::Win,
            Terminal::Stuck { .. } => GameResult::Loss,
        }
    }
}

/// Check a Checkers board after `mover` completed a turn.
///
/// The game is over when a side has no pieces, or when the side about to
/// move has no legal move.
pub fn evaluate_checkers(board: &CheckersBoard, mover: Player) -> Option<Terminal> {
    let next = mover.opponent();

    if board.count_for(next) == 0 {
        return Some(Terminal::Winner { player: mover });
    }
    if board.count_for(mover) == 0 {
        return Some(Terminal::Winner { player: next });
    }
    if !has_any_checkers_move(board, next) {
        return Some(Terminal::Winner { player: mover });
    }
    None
}

/// Draw once `quiet_plies` consecutive quiet turns reach the configured limit
pub fn quiet_draw(quiet_plies: u32, limit: Option<u32>) -> Option<Terminal> {
    match limit {
        Some(limit) if quiet_plies >= limit => Some(Terminal::Draw),
        _ => None,
    }
}

/// Check a Marbles board after a jump
pub fn evaluate_marbles(board: &MarblesBoard) -> Option<Terminal> {
    let left = board.marble_count();
    if left == 1 {
        return Some(Terminal::Solved);
    }
    if !has_any_marble_move(board) {
        return Some(Terminal::Stuck { marbles_left: left });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Square;
    use crate::cell::Cell;

    #[test]
    fn test_fresh_boards_are_not_terminal() {
        assert_eq!(evaluate_checkers(&CheckersBoard::new(), Player::Red), None);
        assert_eq!(evaluate_marbles(&MarblesBoard::new()), None);
    }

    #[test]
    fn test_no_pieces_left_is_a_win() {
        let board =
            CheckersBoard::with_pieces(&[(Cell::new(3, 4), Square::Man(Player::Red))]);
        assert_eq!(
            evaluate_checkers(&board, Player::Red),
            Some(Terminal::Winner { player: Player::Red })
        );
        // Whoever moved last, the side with pieces wins
        assert_eq!(
            evaluate_checkers(&board, Player::Black),
            Some(Terminal::Winner { player: Player::Red })
        );
    }

    #[test]
    fn test_blocked_opponent_loses() {
        let board = CheckersBoard::with_pieces(&[
            (Cell::new(6, 1), Square::Man(Player::Black)),
            (Cell::new(7, 0), Square::Man(Player::Red)),
            (Cell::new(7, 2), Square::Man(Player::Red)),
        ]);
        assert_eq!(
            evaluate_checkers(&board, Player::Red),
            Some(Terminal::Winner { player: Player::Red })
        );
    }

    #[test]
    fn test_single_marble_is_solved() {
        let board = MarblesBoard::with_marbles(&[Cell::new(3, 3)]);
        assert_eq!(evaluate_marbles(&board), Some(Terminal::Solved));
    }

    #[test]
    fn test_isolated_marbles_are_stuck() {
        let board = MarblesBoard::with_marbles(&[Cell::new(0, 2), Cell::new(6, 4)]);
        assert_eq!(
            evaluate_marbles(&board),
            Some(Terminal::Stuck { marbles_left: 2 })
        );
    }

    #[test]
    fn test_quiet_draw_limit() {
        assert_eq!(quiet_draw(40, None), None);
        assert_eq!(quiet_draw(39, Some(40)), None);
        assert_eq!(quiet_draw(40, Some(40)), Some(Terminal::Draw));
    }

    #[test]
    fn test_results() {
        let red_won = Terminal::Winner { player: Player::Red };
        assert_eq!(red_won.result_for(Player::Red), GameResult::Win);
        assert_eq!(red_won.result_for(Player::Black), GameResult::Loss);
        assert_eq!(Terminal::Solved.result_for(Player::Red), GameResult::Win);
        assert_eq!(
            Terminal::Stuck { marbles_left: 3 }.result_for(Player::Red),
            GameResult::Loss
        );
    }
}
