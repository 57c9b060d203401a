//! Parlour - board-game engine for the community site's games room
//!
//! This crate provides the rules and turn handling for two games:
//! - Checkers, against the computer or a second player on the same device
//! - Marbles, a single-player peg-solitaire puzzle on a cross-shaped board
//!
//! # Architecture
//!
//! The engine is platform-agnostic. It can be compiled to:
//! - Native Rust, hosted by `parlour-host` for a local UI process
//! - WebAssembly, driven directly by the browser
//!
//! # Modules
//!
//! - [`cell`]: Grid coordinates
//! - [`board`]: Board models for both games
//! - [`moves`]: Legal move generation
//! - [`capture`]: Selection and multi-jump state machine
//! - [`terminal`]: End-of-game detection
//! - [`bot`]: Computer opponent
//! - [`score`]: Boundary to the points ledger
//! - [`session`]: Turn order, timing and reporting

pub mod board;
pub mod bot;
pub mod capture;
pub mod cell;
pub mod config;
pub mod events;
pub mod moves;
pub mod score;
pub mod session;
pub mod terminal;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use board::{CheckersBoard, Hole, MarblesBoard, Player, Square};
pub use bot::{OpponentAgent, RandomAgent};
pub use capture::{CaptureResolver, ChainState, Resolution};
pub use cell::Cell;
pub use config::{CaptureRule, OpponentMode, SessionConfig, DEFAULT_THINK_DELAY_MS};
pub use events::{IgnoredInput, SessionEvent};
pub use moves::Move;
pub use score::{
    GameKind, GameResult, NullReporter, QueuedReporter, ScoreError, ScoreReport, ScoreReporter,
};
pub use session::{
    BoardSnapshot, GameSession, SessionSnapshot, Tallies, COMPUTER_SIDE, HUMAN_SIDE,
};
pub use terminal::Terminal;
