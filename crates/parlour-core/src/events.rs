//! Events emitted by a session and the reasons input gets ignored.
//!
//! Every session operation returns the events it caused, in order, so a UI
//! can animate a turn without diffing board snapshots.

use crate::board::Player;
use crate::cell::Cell;
use crate::moves::Move;
use crate::score::GameResult;
use crate::terminal::Terminal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a cell click changed nothing.
///
/// None of these are fatal; the engine absorbs them as no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoredInput {
    #[error("Cell is off the board")]
    OutOfBounds,

    #[error("Nothing selectable on that cell")]
    InvalidSelection,

    #[error("A multi-jump must be continued by the same piece")]
    ChainInProgress,

    #[error("Opponent is thinking")]
    OpponentThinking,

    #[error("Not your turn")]
    NotYourTurn,

    #[error("Game is over")]
    GameOver,

    #[error("Session is closed or the input is out of date")]
    StaleInput,
}

/// Something that happened in a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A piece or marble was selected
    PieceSelected { cell: Cell, moves: Vec<Move> },

    /// The selection was dropped
    SelectionCleared,

    /// A move was applied to the board. `player` is `None` in Marbles.
    MoveApplied {
        player: Option<Player>,
        #[serde(rename = "move")]
        mv: Move,
        crowned: bool,
    },

    /// The piece that just jumped must jump again
    ChainContinues { at: Cell, moves: Vec<Move> },

    /// The other side is now to move
    TurnPassed { next: Player },

    /// The computer will move after `delay_ms`; the callback must present `epoch`
    OpponentThinking { epoch: u64, delay_ms: u64 },

    /// The game ended
    GameOver {
        terminal: Terminal,
        result: GameResult,
    },

    /// The input was ignored
    InputIgnored { reason: IgnoredInput },
}
