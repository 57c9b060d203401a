//! Computer opponent for Checkers.
//!
//! The session talks to the opponent only through [`OpponentAgent`], so a
//! search-based player can replace [`RandomAgent`] without touching the
//! session or the capture resolver.

use crate::board::{CheckersBoard, Player};
use crate::cell::Cell;
use crate::config::CaptureRule;
use crate::moves::{checkers_captures, checkers_player_moves, Move};
use rand::prelude::*;

/// Picks moves for the computer side
pub trait OpponentAgent: Send + Sync {
    /// Choose the first move of a turn
    fn choose_move(&mut self, board: &CheckersBoard, player: Player) -> Option<Move>;

    /// Choose the next jump of a multi-jump by the piece at `from`
    fn continue_chain(&mut self, board: &CheckersBoard, player: Player, from: Cell) -> Option<Move> {
        checkers_captures(board, from, player).into_iter().next()
    }
}

/// Uniformly random legal moves
pub struct RandomAgent {
    pub rule: CaptureRule,
    rng: StdRng,
}

impl RandomAgent {
    pub fn new(rule: CaptureRule) -> Self {
        Self {
            rule,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(rule: CaptureRule, seed: u64) -> Self {
        Self {
            rule,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl OpponentAgent for RandomAgent {
    fn choose_move(&mut self, board: &CheckersBoard, player: Player) -> Option<Move> {
        let moves = checkers_player_moves(board, player, self.rule);
        moves.choose(&mut self.rng).copied()
    }

    fn continue_chain(&mut self, board: &CheckersBoard, player: Player, from: Cell) -> Option<Move> {
        let jumps = checkers_captures(board, from, player);
        jumps.choose(&mut self.rng).copied()
    }
}
