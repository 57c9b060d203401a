//! Session host: owns the open game windows and drives their timers.

use crate::config::HostConfig;
use crate::ledger::PointsLedger;
use crate::protocol::{ClientMessage, ServerMessage, SessionInfo};
use dashmap::DashMap;
use parlour_core::{GameSession, SessionEvent};
use std::sync::{Arc, Weak};
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, info_span, instrument, warn, Span};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("Session {0} not found")]
    SessionNotFound(Uuid),
}

/// A computer move waiting out its thinking delay
struct PendingTurn {
    epoch: u64,
    handle: JoinHandle<()>,
}

/// Shared host state.
pub struct HostState {
    /// Open sessions by id
    pub sessions: DashMap<Uuid, GameSession>,
    /// At most one scheduled computer move per session
    timers: DashMap<Uuid, PendingTurn>,
    /// Receives every finished-game outcome
    pub ledger: Arc<PointsLedger>,
    pub config: HostConfig,
    outbox: mpsc::UnboundedSender<ServerMessage>,
}

impl HostState {
    /// Create the state and the receiving end of its outgoing messages
    pub fn new(config: HostConfig) -> (Arc<Self>, mpsc::UnboundedReceiver<ServerMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let state = Self {
            sessions: DashMap::new(),
            timers: DashMap::new(),
            ledger: Arc::new(PointsLedger::new()),
            config,
            outbox: tx,
        };
        (Arc::new(state), rx)
    }

    pub fn send(&self, msg: ServerMessage) {
        if self.outbox.send(msg).is_err() {
            warn!("Outbox closed, dropping message");
        }
    }

    /// Abort the session's scheduled computer move, if any
    fn cancel_timer(&self, session_id: Uuid) {
        if let Some((_, pending)) = self.timers.remove(&session_id) {
            debug!(session = %session_id, epoch = pending.epoch, "Cancelling computer move");
            pending.handle.abort();
        }
    }

    fn cancel_all_timers(&self) {
        for entry in self.timers.iter() {
            entry.handle.abort();
        }
        self.timers.clear();
    }

    pub fn session_infos(&self) -> Vec<SessionInfo> {
        self.sessions
            .iter()
            .map(|entry| SessionInfo {
                id: *entry.key(),
                game: entry.config().game,
                user_id: entry.config().user_id.clone(),
                move_count: entry.move_count(),
                finished: entry.terminal().is_some(),
            })
            .collect()
    }
}

/// Read client messages line by line until EOF, writing replies to `writer`.
pub async fn run_host<R, W>(
    state: Arc<HostState>,
    mut outgoing: mpsc::UnboundedReceiver<ServerMessage>,
    reader: R,
    mut writer: W,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    // Forward outgoing messages to the writer
    let send_task = tokio::spawn(async move {
        while let Some(msg) = outgoing.recv().await {
            let Ok(mut line) = serde_json::to_string(&msg) else {
                continue;
            };
            line.push('\n');
            if writer.write_all(line.as_bytes()).await.is_err() || writer.flush().await.is_err() {
                break;
            }
        }
    });

    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<ClientMessage>(&line) {
            Ok(msg) => {
                if let Err(e) = handle_message(msg, &state) {
                    warn!("{}", e);
                    state.send(ServerMessage::Error {
                        message: e.to_string(),
                    });
                }
            }
            Err(e) => {
                warn!(error = %e, "Invalid message: {}", line);
                state.send(ServerMessage::Error {
                    message: format!("Invalid message: {}", e),
                });
            }
        }
    }

    info!(
        open = state.sessions.len(),
        outcomes = state.ledger.history().len(),
        "Input closed, shutting down"
    );
    state.cancel_all_timers();
    for mut entry in state.sessions.iter_mut() {
        entry.close();
    }
    state.sessions.clear();

    // Timers only hold weak references, so this drops the last sender and
    // the writer stops once the queued replies are flushed.
    drop(state);
    if let Err(e) = send_task.await {
        error!("Writer task failed: {}", e);
    }
    Ok(())
}

/// Handle a client message.
pub fn handle_message(msg: ClientMessage, state: &Arc<HostState>) -> Result<(), HostError> {
    let span = match msg.session_id() {
        Some(id) => info_span!("session", session = %id),
        None => Span::none(),
    };
    let _entered = span.enter();

    match msg {
        ClientMessage::CreateSession { config } => {
            let config = state.config.apply(config);
            let session_id = Uuid::new_v4();
            let session = GameSession::new(config, state.ledger.clone());
            let snapshot = session.snapshot();
            info!(session = %session_id, game = %session.config().game, "Session created");

            state.sessions.insert(session_id, session);
            state.send(ServerMessage::SessionCreated {
                session_id,
                snapshot,
            });
        }

        ClientMessage::SelectCell {
            session_id,
            row,
            col,
        } => {
            let mut session = state
                .sessions
                .get_mut(&session_id)
                .ok_or(HostError::SessionNotFound(session_id))?;
            let events = session.select_cell(row, col);
            let snapshot = session.snapshot();
            drop(session); // Release lock before scheduling

            // Queue this reply before a zero-delay computer move can land
            let thinking = thinking_epoch(&events);
            state.send(ServerMessage::Events {
                session_id,
                events,
                snapshot,
            });
            if let Some((epoch, delay_ms)) = thinking {
                schedule_opponent(state, session_id, epoch, delay_ms);
            }
        }

        ClientMessage::Reset { session_id } => {
            let mut session = state
                .sessions
                .get_mut(&session_id)
                .ok_or(HostError::SessionNotFound(session_id))?;
            session.reset();
            let snapshot = session.snapshot();
            drop(session);
            state.cancel_timer(session_id);

            state.send(ServerMessage::Snapshot {
                session_id,
                snapshot,
            });
        }

        ClientMessage::Close { session_id } => {
            let (_, mut session) = state
                .sessions
                .remove(&session_id)
                .ok_or(HostError::SessionNotFound(session_id))?;
            session.close();
            state.cancel_timer(session_id);
            state.send(ServerMessage::Closed { session_id });
        }

        ClientMessage::Snapshot { session_id } => {
            let snapshot = state
                .sessions
                .get(&session_id)
                .map(|s| s.snapshot())
                .ok_or(HostError::SessionNotFound(session_id))?;
            state.send(ServerMessage::Snapshot {
                session_id,
                snapshot,
            });
        }

        ClientMessage::ListSessions => {
            let sessions = state.session_infos();
            state.send(ServerMessage::SessionList { sessions });
        }

        ClientMessage::Points { user_id } => {
            let points = state.ledger.points(&user_id);
            state.send(ServerMessage::Points { user_id, points });
        }

        ClientMessage::Ping => {
            state.send(ServerMessage::Pong);
        }
    }
    Ok(())
}

/// The epoch and delay if the events hand the turn to the computer
fn thinking_epoch(events: &[SessionEvent]) -> Option<(u64, u64)> {
    events.iter().find_map(|event| match *event {
        SessionEvent::OpponentThinking { epoch, delay_ms } => Some((epoch, delay_ms)),
        _ => None,
    })
}

/// Start the thinking-delay timer for the computer's move.
fn schedule_opponent(state: &Arc<HostState>, session_id: Uuid, epoch: u64, delay_ms: u64) {
    let weak: Weak<HostState> = Arc::downgrade(state);
    let handle = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        let Some(state) = weak.upgrade() else {
            return;
        };
        state
            .timers
            .remove_if(&session_id, |_, pending| pending.epoch == epoch);
        play_opponent(&state, session_id, epoch);
    });

    if let Some(stale) = state.timers.insert(session_id, PendingTurn { epoch, handle }) {
        stale.handle.abort();
    }
}

#[instrument(skip(state, session_id), fields(session = %session_id))]
fn play_opponent(state: &Arc<HostState>, session_id: Uuid, epoch: u64) {
    let Some(mut session) = state.sessions.get_mut(&session_id) else {
        debug!("Session gone before the computer moved");
        return;
    };
    let events = session.play_opponent_turn(epoch);
    if events.is_empty() {
        return;
    }
    let snapshot = session.snapshot();
    drop(session);

    state.send(ServerMessage::Events {
        session_id,
        events,
        snapshot,
    });
}
