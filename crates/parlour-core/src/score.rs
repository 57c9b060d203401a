//! Boundary to the external points ledger.
//!
//! The engine only reports outcomes; storing them is someone else's job.
//! Reporting is fire-and-forget: a failed report is logged by the session
//! and never touches the board.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;

/// Which game an outcome belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    #[default]
    Checkers,
    Marbles,
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameKind::Checkers => write!(f, "checkers"),
            GameKind::Marbles => write!(f, "marbles"),
        }
    }
}

/// Outcome from the local user's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameResult {
    Win,
    Loss,
    Draw,
}

impl GameResult {
    /// Points the ledger credits for this result
    pub fn points(self) -> u32 {
        match self {
            GameResult::Win => 10,
            GameResult::Loss => 0,
            GameResult::Draw => 5,
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameResult::Win => write!(f, "win"),
            GameResult::Loss => write!(f, "loss"),
            GameResult::Draw => write!(f, "draw"),
        }
    }
}

/// Errors a ledger may return
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ScoreError {
    #[error("No user to credit")]
    UnknownUser,

    #[error("Ledger rejected the outcome: {0}")]
    Rejected(String),

    #[error("Ledger unavailable: {0}")]
    Unavailable(String),
}

/// A recorded outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub user_id: String,
    pub game: GameKind,
    pub result: GameResult,
    pub points: u32,
}

impl ScoreReport {
    pub fn new(user_id: &str, game: GameKind, result: GameResult) -> Self {
        Self {
            user_id: user_id.to_string(),
            game,
            result,
            points: result.points(),
        }
    }
}

/// Receives finished-game outcomes
pub trait ScoreReporter: Send + Sync {
    fn report_outcome(
        &self,
        user_id: &str,
        game: GameKind,
        result: GameResult,
    ) -> Result<(), ScoreError>;
}

/// Discards every report
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl ScoreReporter for NullReporter {
    fn report_outcome(&self, _: &str, _: GameKind, _: GameResult) -> Result<(), ScoreError> {
        Ok(())
    }
}

/// Holds reports until a caller drains them, e.g. a browser page that posts
/// them to the ledger itself.
#[derive(Debug, Default)]
pub struct QueuedReporter {
    reports: Mutex<Vec<ScoreReport>>,
}

impl QueuedReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every queued report
    pub fn drain(&self) -> Vec<ScoreReport> {
        std::mem::take(&mut *self.queue())
    }

    // Poison is recovered: every holder leaves the Vec whole.
    fn queue(&self) -> MutexGuard<'_, Vec<ScoreReport>> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl ScoreReporter for QueuedReporter {
    fn report_outcome(
        &self,
        user_id: &str,
        game: GameKind,
        result: GameResult,
    ) -> Result<(), ScoreError> {
        self.queue().push(ScoreReport::new(user_id, game, result));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_mapping() {
        assert_eq!(GameResult::Win.points(), 10);
        assert_eq!(GameResult::Loss.points(), 0);
        assert_eq!(GameResult::Draw.points(), 5);
    }

    #[test]
    fn test_queued_reporter_drains() {
        let reporter = QueuedReporter::new();
        reporter
            .report_outcome("ana", GameKind::Marbles, GameResult::Win)
            .unwrap();

        let reports = reporter.drain();
        assert_eq!(reports, vec![ScoreReport::new("ana", GameKind::Marbles, GameResult::Win)]);
        assert_eq!(reports[0].points, 10);
        assert!(reporter.drain().is_empty());
    }

    #[test]
    fn test_poisoned_queue_still_reports_and_drains() {
        let reporter = std::sync::Arc::new(QueuedReporter::new());
        let holder = reporter.clone();
        let _ = std::thread::spawn(move || {
            let _guard = holder.reports.lock().unwrap();
            panic!("poison the queue");
        })
        .join();
        assert!(reporter.reports.is_poisoned());

        reporter
            .report_outcome("ana", GameKind::Checkers, GameResult::Draw)
            .unwrap();
        assert_eq!(reporter.drain().len(), 1);
        assert!(reporter.drain().is_empty());
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&GameKind::Checkers).unwrap(), "\"checkers\"");
        assert_eq!(serde_json::to_string(&GameResult::Loss).unwrap(), "\"loss\"");
        assert_eq!(GameResult::Draw.to_string(), "draw");
    }
}
