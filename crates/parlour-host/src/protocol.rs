//! JSON-lines protocol between the UI process and the host.
//!
//! One message per line on stdin (client) and stdout (host).

use parlour_core::{SessionConfig, SessionEvent, SessionSnapshot};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Messages sent from the UI to the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ClientMessage {
    /// Open a new game window
    CreateSession {
        #[serde(default)]
        config: SessionConfig,
    },

    /// Click a cell
    SelectCell { session_id: Uuid, row: u8, col: u8 },

    /// Start a new game in the same window
    Reset { session_id: Uuid },

    /// Close the window
    Close { session_id: Uuid },

    /// Request the current state
    Snapshot { session_id: Uuid },

    /// Request the open sessions
    ListSessions,

    /// Request a user's point balance
    Points { user_id: String },

    /// Ping for keepalive
    Ping,
}

impl ClientMessage {
    /// The session a message is addressed to, if any
    pub fn session_id(&self) -> Option<Uuid> {
        match self {
            ClientMessage::SelectCell { session_id, .. }
            | ClientMessage::Reset { session_id }
            | ClientMessage::Close { session_id }
            | ClientMessage::Snapshot { session_id } => Some(*session_id),
            ClientMessage::CreateSession { .. }
            | ClientMessage::ListSessions
            | ClientMessage::Points { .. }
            | ClientMessage::Ping => None,
        }
    }
}

/// Messages sent from the host to the UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ServerMessage {
    /// Session opened
    SessionCreated {
        session_id: Uuid,
        snapshot: SessionSnapshot,
    },

    /// Events caused by a click or by the computer's move
    Events {
        session_id: Uuid,
        events: Vec<SessionEvent>,
        snapshot: SessionSnapshot,
    },

    /// Current state of a session
    Snapshot {
        session_id: Uuid,
        snapshot: SessionSnapshot,
    },

    /// Open sessions
    SessionList { sessions: Vec<SessionInfo> },

    /// A user's point balance
    Points { user_id: String, points: u32 },

    /// Session closed
    Closed { session_id: Uuid },

    /// Error occurred
    Error { message: String },

    /// Pong response
    Pong,
}

/// Session summary for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub id: Uuid,
    pub game: parlour_core::GameKind,
    pub user_id: String,
    pub move_count: u32,
    pub finished: bool,
}
