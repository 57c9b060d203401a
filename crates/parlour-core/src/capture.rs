//! Selection and multi-jump handling for Checkers.
//!
//! The resolver is a small state machine owned by the session:
//!
//! ```text
//! Idle ──select──▶ PieceSelected ──capture, more jumps──▶ AwaitingContinuation
//!   ▲                   │                                        │
//!   └──deselect / move ends turn ◀──────── last jump ────────────┘
//! ```
//!
//! While awaiting a continuation only jumps from the landing cell are legal
//! and the side to move does not change. Crowning ends the chain even if the
//! new king could jump again.

use crate::board::{CheckersBoard, Player};
use crate::cell::Cell;
use crate::config::CaptureRule;
use crate::moves::{checkers_captures, checkers_moves, Move};
use serde::{Deserialize, Serialize};

/// Turn sub-state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ChainState {
    /// Nothing selected
    #[default]
    Idle,
    /// A piece is selected; `moves` are its legal moves
    PieceSelected { cell: Cell, moves: Vec<Move> },
    /// Mid multi-jump: the piece at `cell` must jump again
    AwaitingContinuation { cell: Cell, moves: Vec<Move> },
}

/// What happened after a move was applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The same piece must keep jumping; the turn is not over
    ChainContinues { at: Cell, moves: Vec<Move> },
    /// The turn is over
    TurnEnded { crowned: bool },
}

#[derive(Debug, Clone, Default)]
pub struct CaptureResolver {
    state: ChainState,
}

impl CaptureResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ChainState {
        &self.state
    }

    /// The selected piece, or the chaining piece mid multi-jump
    pub fn selected(&self) -> Option<Cell> {
        match &self.state {
            ChainState::Idle => None,
            ChainState::PieceSelected { cell, .. }
            | ChainState::AwaitingContinuation { cell, .. } => Some(*cell),
        }
    }

    /// Legal moves for the selected piece
    pub fn legal_moves(&self) -> &[Move] {
        match &self.state {
            ChainState::Idle => &[],
            ChainState::PieceSelected { moves, .. }
            | ChainState::AwaitingContinuation { moves, .. } => moves,
        }
    }

    /// The cell the next move must start from, while a multi-jump is pending
    pub fn pending_chain(&self) -> Option<Cell> {
        match &self.state {
            ChainState::AwaitingContinuation { cell, .. } => Some(*cell),
            _ => None,
        }
    }

    /// Select `player`'s piece at `cell` and compute its moves.
    ///
    /// Has no effect mid multi-jump.
    pub fn select(
        &mut self,
        board: &CheckersBoard,
        cell: Cell,
        player: Player,
        rule: CaptureRule,
    ) -> &[Move] {
        if self.pending_chain().is_none() {
            let moves = checkers_moves(board, cell, player, rule);
            self.state = ChainState::PieceSelected { cell, moves };
        }
        self.legal_moves()
    }

    /// Drop the selection. A pending multi-jump cannot be dropped.
    pub fn deselect(&mut self) {
        if self.pending_chain().is_none() {
            self.state = ChainState::Idle;
        }
    }

    /// The legal move of the selected piece that lands on `to`
    pub fn find_move(&self, to: Cell) -> Option<Move> {
        self.legal_moves().iter().copied().find(|m| m.to == to)
    }

    /// Apply `mv` for `player` and work out whether the turn continues.
    pub fn resolve(&mut self, board: &mut CheckersBoard, mv: Move, player: Player) -> Resolution {
        let crowned = board.apply_move(&mv);

        if mv.is_capture() && !crowned {
            let more = checkers_captures(board, mv.to, player);
            if !more.is_empty() {
                self.state = ChainState::AwaitingContinuation {
                    cell: mv.to,
                    moves: more.clone(),
                };
                return Resolution::ChainContinues {
                    at: mv.to,
                    moves: more,
                };
            }
        }

        self.state = ChainState::Idle;
        Resolution::TurnEnded { crowned }
    }

    /// Back to `Idle`, discarding any pending chain
    pub fn reset(&mut self) {
        self.state = ChainState::Idle;
    }
}
