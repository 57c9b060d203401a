//! Session configuration.

use crate::score::GameKind;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Delay before the computer opponent moves
pub const DEFAULT_THINK_DELAY_MS: u64 = 1000;

/// Who plays the Black side of a Checkers game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpponentMode {
    /// The computer plays Black after a thinking delay
    #[default]
    Computer,
    /// Two humans share the device
    Local,
}

/// How mandatory capture is enforced in Checkers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureRule {
    /// A piece that can capture must capture, but a different piece may still
    /// make a quiet move.
    #[default]
    PerPiece,
    /// Standard draughts: while any piece can capture, only captures are legal.
    Global,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown capture rule '{0}' (expected 'per_piece' or 'global')")]
pub struct ParseCaptureRuleError(String);

impl FromStr for CaptureRule {
    type Err = ParseCaptureRuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per_piece" | "per-piece" | "piece" => Ok(CaptureRule::PerPiece),
            "global" | "board" => Ok(CaptureRule::Global),
            other => Err(ParseCaptureRuleError(other.to_string())),
        }
    }
}

/// Everything needed to start a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Which game to play
    pub game: GameKind,
    /// Opponent for Checkers (ignored for Marbles)
    pub opponent: OpponentMode,
    /// Mandatory capture enforcement for Checkers
    pub capture_rule: CaptureRule,
    /// Computer "thinking" delay in milliseconds
    pub think_delay_ms: u64,
    /// Account credited with points when a game ends
    pub user_id: String,
    /// End Checkers in a draw after this many consecutive turns without a
    /// capture or a man moving. `None` disables draws.
    pub quiet_ply_limit: Option<u32>,
    /// Carry win/loss tallies over when the board is reset
    pub keep_tallies: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            game: GameKind::Checkers,
            opponent: OpponentMode::Computer,
            capture_rule: CaptureRule::PerPiece,
            think_delay_ms: DEFAULT_THINK_DELAY_MS,
            user_id: String::new(),
            quiet_ply_limit: None,
            keep_tallies: false,
        }
    }
}

impl SessionConfig {
    /// Checkers against the computer
    pub fn checkers(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }

    /// Checkers for two humans on one device
    pub fn checkers_local() -> Self {
        Self {
            opponent: OpponentMode::Local,
            ..Self::default()
        }
    }

    /// Single-player peg solitaire
    pub fn marbles(user_id: impl Into<String>) -> Self {
        Self {
            game: GameKind::Marbles,
            user_id: user_id.into(),
            ..Self::default()
        }
    }

    pub fn with_capture_rule(mut self, rule: CaptureRule) -> Self {
        self.capture_rule = rule;
        self
    }

    pub fn with_think_delay(mut self, delay_ms: u64) -> Self {
        self.think_delay_ms = delay_ms;
        self
    }

    pub fn with_quiet_ply_limit(mut self, limit: u32) -> Self {
        self.quiet_ply_limit = Some(limit);
        self
    }

    pub fn with_kept_tallies(mut self) -> Self {
        self.keep_tallies = true;
        self
    }

    /// Whether a Black-side computer opponent takes part
    pub fn has_computer_opponent(&self) -> bool {
        self.game == GameKind::Checkers && self.opponent == OpponentMode::Computer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_capture_rule() {
        assert_eq!("per_piece".parse::<CaptureRule>(), Ok(CaptureRule::PerPiece));
        assert_eq!(" Global ".parse::<CaptureRule>(), Ok(CaptureRule::Global));
        assert!("strict".parse::<CaptureRule>().is_err());
    }

    #[test]
    fn test_config_defaults_from_partial_json() {
        let config: SessionConfig = serde_json::from_str(r#"{"game": "marbles"}"#).unwrap();
        assert_eq!(config.game, GameKind::Marbles);
        assert_eq!(config.capture_rule, CaptureRule::PerPiece);
        assert_eq!(config.think_delay_ms, DEFAULT_THINK_DELAY_MS);
        assert_eq!(config.quiet_ply_limit, None);
        assert!(!config.keep_tallies);
    }

    #[test]
    fn test_computer_opponent_only_in_checkers() {
        assert!(SessionConfig::checkers("u1").has_computer_opponent());
        assert!(!SessionConfig::checkers_local().has_computer_opponent());
        assert!(!SessionConfig::marbles("u1").has_computer_opponent());
    }
}
