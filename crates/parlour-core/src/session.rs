//! Game sessions.
//!
//! A session owns one board exclusively and is the only thing that changes
//! it. Input arrives as cell clicks through [`GameSession::select_cell`];
//! every other state change goes through [`GameSession::play_opponent_turn`],
//! [`GameSession::reset`] or [`GameSession::close`].
//!
//! # Opponent timing
//!
//! When the computer becomes the side to move, the session raises its
//! thinking flag and emits [`SessionEvent::OpponentThinking`] with the current
//! epoch. The host arms a timer and, when it fires, calls
//! [`GameSession::play_opponent_turn`] with that epoch. `reset` and `close`
//! bump the epoch, so a timer that outlives its board does nothing.

use crate::board::{CheckersBoard, Hole, MarblesBoard, Player, Square};
use crate::bot::{OpponentAgent, RandomAgent};
use crate::capture::{CaptureResolver, Resolution};
use crate::cell::Cell;
use crate::config::{CaptureRule, OpponentMode, SessionConfig};
use crate::events::{IgnoredInput, SessionEvent};
use crate::moves::{checkers_player_moves, marble_moves, Move};
use crate::score::{GameKind, GameResult, ScoreReporter};
use crate::terminal::{evaluate_checkers, evaluate_marbles, quiet_draw, Terminal};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// The side the local user plays in Checkers
pub const HUMAN_SIDE: Player = Player::Red;

/// The side the computer plays in Checkers
pub const COMPUTER_SIDE: Player = Player::Black;

/// Finished games from the local user's point of view.
///
/// Cleared with the board on reset unless the session keeps them; never
/// persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tallies {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl Tallies {
    pub fn record(&mut self, result: GameResult) {
        match result {
            GameResult::Win => self.wins += 1,
            GameResult::Loss => self.losses += 1,
            GameResult::Draw => self.draws += 1,
        }
    }
}

/// Pieces each Checkers side has taken this game
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Captures {
    pub red: u32,
    pub black: u32,
}

impl Captures {
    fn credit(&mut self, player: Player) {
        match player {
            Player::Red => self.red += 1,
            Player::Black => self.black += 1,
        }
    }
}

/// Board contents for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "game", rename_all = "lowercase")]
pub enum BoardSnapshot {
    Checkers {
        rows: Vec<Vec<Square>>,
        red_pieces: u32,
        black_pieces: u32,
        captures: Captures,
    },
    Marbles {
        rows: Vec<Vec<Hole>>,
        marbles_left: u32,
    },
}

/// Everything the UI needs to draw a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub board: BoardSnapshot,
    /// Side to move (Checkers only)
    pub active_player: Option<Player>,
    pub selected: Option<Cell>,
    pub legal_moves: Vec<Move>,
    pub pending_chain: Option<Cell>,
    pub terminal: Option<Terminal>,
    pub opponent_thinking: bool,
    pub epoch: u64,
    pub tallies: Tallies,
    pub move_count: u32,
    pub last_move: Option<Move>,
}

/// A move that has been applied, as seen by the session
struct Applied {
    player: Option<Player>,
    mv: Move,
    crowned: bool,
    /// Further jumps owed by the same piece
    chain: Option<Vec<Move>>,
}

/// Result of one click inside a game
enum Click {
    Ignored(IgnoredInput),
    Selected { cell: Cell, moves: Vec<Move> },
    Cleared,
    Moved(Applied),
}

struct CheckersGame {
    board: CheckersBoard,
    active: Player,
    resolver: CaptureResolver,
    /// Consecutive moves without a capture or a man moving
    quiet_plies: u32,
    captures: Captures,
}

impl CheckersGame {
    fn new(board: CheckersBoard, active: Player) -> Self {
        Self {
            board,
            active,
            resolver: CaptureResolver::new(),
            quiet_plies: 0,
            captures: Captures::default(),
        }
    }

    fn click(&mut self, cell: Cell, rule: CaptureRule) -> Click {
        if !self.board.is_valid_cell(cell) {
            return Click::Ignored(IgnoredInput::OutOfBounds);
        }

        if self.resolver.pending_chain().is_some() {
            return match self.resolver.find_move(cell) {
                Some(mv) => Click::Moved(self.apply(mv)),
                None => Click::Ignored(IgnoredInput::ChainInProgress),
            };
        }

        if self.resolver.selected().is_some() {
            return match self.resolver.find_move(cell) {
                Some(mv) => Click::Moved(self.apply(mv)),
                None => {
                    self.resolver.deselect();
                    Click::Cleared
                }
            };
        }

        if self.board.piece_at(cell).owner() == Some(self.active) {
            let moves = self
                .resolver
                .select(&self.board, cell, self.active, rule)
                .to_vec();
            return Click::Selected { cell, moves };
        }

        Click::Ignored(IgnoredInput::InvalidSelection)
    }

    fn apply(&mut self, mv: Move) -> Applied {
        let player = self.active;
        let was_man = self.board.piece_at(mv.from).is_man();

        let resolution = self.resolver.resolve(&mut self.board, mv, player);

        if mv.is_capture() {
            self.captures.credit(player);
        }
        if mv.is_capture() || was_man {
            self.quiet_plies = 0;
        } else {
            self.quiet_plies += 1;
        }

        match resolution {
            Resolution::ChainContinues { moves, .. } => Applied {
                player: Some(player),
                mv,
                crowned: false,
                chain: Some(moves),
            },
            Resolution::TurnEnded { crowned } => Applied {
                player: Some(player),
                mv,
                crowned,
                chain: None,
            },
        }
    }
}

struct MarblesGame {
    board: MarblesBoard,
    selected: Option<Cell>,
    moves: Vec<Move>,
}

impl MarblesGame {
    fn new(board: MarblesBoard) -> Self {
        Self {
            board,
            selected: None,
            moves: Vec::new(),
        }
    }

    fn click(&mut self, cell: Cell) -> Click {
        if !self.board.is_valid_cell(cell) {
            return Click::Ignored(IgnoredInput::OutOfBounds);
        }

        if self.selected.is_some() {
            let chosen = self.moves.iter().copied().find(|m| m.to == cell);
            self.selected = None;
            self.moves.clear();
            return match chosen {
                Some(mv) => {
                    self.board.apply_move(&mv);
                    Click::Moved(Applied {
                        player: None,
                        mv,
                        crowned: false,
                        chain: None,
                    })
                }
                None => Click::Cleared,
            };
        }

        if self.board.hole_at(cell) == Hole::Marble {
            self.moves = marble_moves(&self.board, cell);
            self.selected = Some(cell);
            return Click::Selected {
                cell,
                moves: self.moves.clone(),
            };
        }

        Click::Ignored(IgnoredInput::InvalidSelection)
    }
}

enum Game {
    Checkers(CheckersGame),
    Marbles(MarblesGame),
}

impl Game {
    fn new(kind: GameKind) -> Self {
        match kind {
            GameKind::Checkers => Game::Checkers(CheckersGame::new(CheckersBoard::new(), HUMAN_SIDE)),
            GameKind::Marbles => Game::Marbles(MarblesGame::new(MarblesBoard::new())),
        }
    }
}

/// One game window: a board, its turn state and the computer opponent.
pub struct GameSession {
    config: SessionConfig,
    game: Game,
    terminal: Option<Terminal>,
    epoch: u64,
    opponent_thinking: bool,
    closed: bool,
    tallies: Tallies,
    move_count: u32,
    last_move: Option<Move>,
    agent: Box<dyn OpponentAgent>,
    reporter: Arc<dyn ScoreReporter>,
}

impl GameSession {
    /// Start a session with a random computer opponent
    pub fn new(config: SessionConfig, reporter: Arc<dyn ScoreReporter>) -> Self {
        let agent = Box::new(RandomAgent::new(config.capture_rule));
        Self::with_agent(config, agent, reporter)
    }

    /// Start a session with a specific computer opponent
    pub fn with_agent(
        config: SessionConfig,
        agent: Box<dyn OpponentAgent>,
        reporter: Arc<dyn ScoreReporter>,
    ) -> Self {
        info!(
            game = %config.game,
            opponent = ?config.opponent,
            capture_rule = ?config.capture_rule,
            "Starting session"
        );
        Self {
            game: Game::new(config.game),
            config,
            terminal: None,
            epoch: 0,
            opponent_thinking: false,
            closed: false,
            tallies: Tallies::default(),
            move_count: 0,
            last_move: None,
            agent,
            reporter,
        }
    }

    /// Replace the board with a Checkers position.
    ///
    /// A position where `to_move` has no pieces or no moves is already
    /// over. Otherwise, if the computer is to move, the session starts out
    /// thinking and the caller is expected to schedule
    /// [`GameSession::play_opponent_turn`].
    pub fn with_checkers_position(mut self, board: CheckersBoard, to_move: Player) -> Self {
        self.config.game = GameKind::Checkers;
        self.terminal = evaluate_checkers(&board, to_move.opponent());
        self.game = Game::Checkers(CheckersGame::new(board, to_move));
        self.opponent_thinking = self.terminal.is_none()
            && self.config.has_computer_opponent()
            && to_move == COMPUTER_SIDE;
        self
    }

    /// Replace the board with a Marbles position
    pub fn with_marbles_position(mut self, board: MarblesBoard) -> Self {
        self.config.game = GameKind::Marbles;
        self.game = Game::Marbles(MarblesGame::new(board));
        self.opponent_thinking = false;
        self
    }

    // ==================== Input ====================

    /// Handle a click on `(row, col)`.
    ///
    /// Input that cannot be acted on yields a single
    /// [`SessionEvent::InputIgnored`] and leaves the session untouched.
    #[instrument(level = "debug", skip(self), fields(game = %self.config.game, epoch = self.epoch))]
    pub fn select_cell(&mut self, row: u8, col: u8) -> Vec<SessionEvent> {
        let cell = Cell::new(row, col);

        if let Err(reason) = self.accepts_input() {
            debug!(%cell, %reason, "Input ignored");
            return vec![SessionEvent::InputIgnored { reason }];
        }

        let click = match &mut self.game {
            Game::Checkers(game) => game.click(cell, self.config.capture_rule),
            Game::Marbles(game) => game.click(cell),
        };

        match click {
            Click::Ignored(reason) => {
                debug!(%cell, %reason, "Input ignored");
                vec![SessionEvent::InputIgnored { reason }]
            }
            Click::Selected { cell, moves } => vec![SessionEvent::PieceSelected { cell, moves }],
            Click::Cleared => vec![SessionEvent::SelectionCleared],
            Click::Moved(applied) => {
                let mut events = Vec::new();
                self.after_move(applied, &mut events);
                events
            }
        }
    }

    fn accepts_input(&self) -> Result<(), IgnoredInput> {
        if self.closed {
            return Err(IgnoredInput::StaleInput);
        }
        if self.terminal.is_some() {
            return Err(IgnoredInput::GameOver);
        }
        if self.opponent_thinking {
            return Err(IgnoredInput::OpponentThinking);
        }
        if self.config.has_computer_opponent() && self.active_player() == Some(COMPUTER_SIDE) {
            return Err(IgnoredInput::NotYourTurn);
        }
        Ok(())
    }

    /// Play the computer's turn scheduled under `epoch`.
    ///
    /// Does nothing if the session was reset or closed since the turn was
    /// scheduled, or if no computer turn is pending.
    #[instrument(level = "debug", skip(self), fields(current = self.epoch))]
    pub fn play_opponent_turn(&mut self, epoch: u64) -> Vec<SessionEvent> {
        if self.closed || epoch != self.epoch {
            debug!(epoch, current = self.epoch, "Dropping stale opponent move");
            return Vec::new();
        }
        if !self.opponent_thinking {
            debug!(epoch, "No opponent move pending");
            return Vec::new();
        }
        self.opponent_thinking = false;

        let rule = self.config.capture_rule;
        let mut applied_moves = Vec::new();
        let player = {
            let Game::Checkers(game) = &mut self.game else {
                return Vec::new();
            };
            let player = game.active;
            let mut choice = self.agent.choose_move(&game.board, player);

            loop {
                let legal = match game.resolver.pending_chain() {
                    Some(_) => game.resolver.legal_moves().to_vec(),
                    None => checkers_player_moves(&game.board, player, rule),
                };

                let mv = match choice {
                    Some(mv) if legal.contains(&mv) => mv,
                    other => {
                        if let Some(bad) = other {
                            warn!(?bad, "Opponent chose an illegal move, playing first legal move");
                        }
                        match legal.first() {
                            Some(mv) => *mv,
                            None => {
                                warn!(?player, "Opponent has no legal move");
                                break;
                            }
                        }
                    }
                };

                if game.resolver.pending_chain().is_none() {
                    game.resolver.select(&game.board, mv.from, player, rule);
                }
                let applied = game.apply(mv);
                let chain_at = applied.chain.as_ref().map(|_| applied.mv.to);
                applied_moves.push(applied);

                match chain_at {
                    Some(at) => choice = self.agent.continue_chain(&game.board, player, at),
                    None => break,
                }
            }
            player
        };

        let mut events = Vec::new();
        if applied_moves.is_empty() {
            // The side that cannot move loses
            self.finish(
                Terminal::Winner {
                    player: player.opponent(),
                },
                &mut events,
            );
            return events;
        }
        for applied in applied_moves {
            self.after_move(applied, &mut events);
        }
        events
    }

    fn after_move(&mut self, applied: Applied, events: &mut Vec<SessionEvent>) {
        self.move_count += 1;
        self.last_move = Some(applied.mv);
        debug!(player = ?applied.player, from = %applied.mv.from, to = %applied.mv.to, "Move applied");

        events.push(SessionEvent::MoveApplied {
            player: applied.player,
            mv: applied.mv,
            crowned: applied.crowned,
        });

        if let Some(moves) = applied.chain {
            events.push(SessionEvent::ChainContinues {
                at: applied.mv.to,
                moves,
            });
            return;
        }

        self.end_turn(events);
    }

    fn end_turn(&mut self, events: &mut Vec<SessionEvent>) {
        let terminal = match &self.game {
            Game::Checkers(game) => evaluate_checkers(&game.board, game.active)
                .or_else(|| quiet_draw(game.quiet_plies, self.config.quiet_ply_limit)),
            Game::Marbles(game) => evaluate_marbles(&game.board),
        };

        if let Some(terminal) = terminal {
            self.finish(terminal, events);
            return;
        }

        if let Game::Checkers(game) = &mut self.game {
            let next = game.active.opponent();
            game.active = next;
            events.push(SessionEvent::TurnPassed { next });

            if self.config.has_computer_opponent() && next == COMPUTER_SIDE {
                self.opponent_thinking = true;
                events.push(SessionEvent::OpponentThinking {
                    epoch: self.epoch,
                    delay_ms: self.config.think_delay_ms,
                });
            }
        }
    }

    fn finish(&mut self, terminal: Terminal, events: &mut Vec<SessionEvent>) {
        self.terminal = Some(terminal);
        let result = terminal.result_for(HUMAN_SIDE);
        self.tallies.record(result);
        info!(game = %self.config.game, ?terminal, %result, moves = self.move_count, "Game over");

        if self.reports_outcomes() {
            if let Err(err) =
                self.reporter
                    .report_outcome(&self.config.user_id, self.config.game, result)
            {
                warn!(user = %self.config.user_id, error = %err, "Failed to record score");
            }
        }

        events.push(SessionEvent::GameOver { terminal, result });
    }

    /// Human-vs-human Checkers is never scored
    fn reports_outcomes(&self) -> bool {
        match self.config.game {
            GameKind::Marbles => true,
            GameKind::Checkers => self.config.opponent == OpponentMode::Computer,
        }
    }

    // ==================== Lifecycle ====================

    /// Start a fresh game on the same session. Any scheduled computer move
    /// is invalidated. Returns the new epoch.
    pub fn reset(&mut self) -> u64 {
        if self.closed {
            return self.epoch;
        }
        self.epoch += 1;
        self.game = Game::new(self.config.game);
        self.terminal = None;
        if !self.config.keep_tallies {
            self.tallies = Tallies::default();
        }
        self.opponent_thinking = false;
        self.move_count = 0;
        self.last_move = None;
        info!(epoch = self.epoch, game = %self.config.game, "Session reset");
        self.epoch
    }

    /// Close the session. Every later call is a no-op.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.epoch += 1;
        self.opponent_thinking = false;
        info!(game = %self.config.game, tallies = ?self.tallies, "Session closed");
    }

    // ==================== Queries ====================

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn is_opponent_thinking(&self) -> bool {
        self.opponent_thinking
    }

    pub fn terminal(&self) -> Option<Terminal> {
        self.terminal
    }

    pub fn tallies(&self) -> Tallies {
        self.tallies
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    /// Side to move (Checkers only)
    pub fn active_player(&self) -> Option<Player> {
        match &self.game {
            Game::Checkers(game) => Some(game.active),
            Game::Marbles(_) => None,
        }
    }

    pub fn selected_cell(&self) -> Option<Cell> {
        match &self.game {
            Game::Checkers(game) => game.resolver.selected(),
            Game::Marbles(game) => game.selected,
        }
    }

    /// Legal moves of the selected piece
    pub fn legal_moves(&self) -> &[Move] {
        match &self.game {
            Game::Checkers(game) => game.resolver.legal_moves(),
            Game::Marbles(game) => &game.moves,
        }
    }

    /// The cell a pending multi-jump must continue from
    pub fn pending_chain(&self) -> Option<Cell> {
        match &self.game {
            Game::Checkers(game) => game.resolver.pending_chain(),
            Game::Marbles(_) => None,
        }
    }

    pub fn checkers_board(&self) -> Option<&CheckersBoard> {
        match &self.game {
            Game::Checkers(game) => Some(&game.board),
            Game::Marbles(_) => None,
        }
    }

    pub fn marbles_board(&self) -> Option<&MarblesBoard> {
        match &self.game {
            Game::Checkers(_) => None,
            Game::Marbles(game) => Some(&game.board),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let board = match &self.game {
            Game::Checkers(game) => BoardSnapshot::Checkers {
                rows: game.board.rows(),
                red_pieces: game.board.count_for(Player::Red),
                black_pieces: game.board.count_for(Player::Black),
                captures: game.captures,
            },
            Game::Marbles(game) => BoardSnapshot::Marbles {
                rows: game.board.rows(),
                marbles_left: game.board.marble_count(),
            },
        };

        SessionSnapshot {
            board,
            active_player: self.active_player(),
            selected: self.selected_cell(),
            legal_moves: self.legal_moves().to_vec(),
            pending_chain: self.pending_chain(),
            terminal: self.terminal,
            opponent_thinking: self.opponent_thinking,
            epoch: self.epoch,
            tallies: self.tallies,
            move_count: self.move_count,
            last_move: self.last_move,
        }
    }
}
