//! In-memory points ledger.
//!
//! Stands in for the site's points service: credits each reported outcome
//! and keeps a running balance per user for the lifetime of the host.

use dashmap::DashMap;
use parlour_core::{GameKind, GameResult, ScoreError, ScoreReport, ScoreReporter};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::info;

#[derive(Debug, Default)]
pub struct PointsLedger {
    balances: DashMap<String, u32>,
    history: Mutex<Vec<ScoreReport>>,
}

impl PointsLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current balance for a user (0 if never credited)
    pub fn points(&self, user_id: &str) -> u32 {
        self.balances.get(user_id).map(|b| *b).unwrap_or(0)
    }

    /// Every outcome recorded so far, oldest first
    pub fn history(&self) -> Vec<ScoreReport> {
        self.history_log().clone()
    }

    // Poison is recovered: every holder leaves the Vec whole.
    fn history_log(&self) -> MutexGuard<'_, Vec<ScoreReport>> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ScoreReporter for PointsLedger {
    fn report_outcome(
        &self,
        user_id: &str,
        game: GameKind,
        result: GameResult,
    ) -> Result<(), ScoreError> {
        if user_id.trim().is_empty() {
            return Err(ScoreError::UnknownUser);
        }

        let report = ScoreReport::new(user_id, game, result);
        let balance = {
            let mut entry = self.balances.entry(user_id.to_string()).or_insert(0);
            *entry += report.points;
            *entry
        };
        info!(user = %user_id, %game, %result, points = report.points, balance, "Outcome recorded");

        self.history_log().push(report);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credits_points() {
        let ledger = PointsLedger::new();

        ledger
            .report_outcome("ana", GameKind::Checkers, GameResult::Win)
            .unwrap();
        ledger
            .report_outcome("ana", GameKind::Marbles, GameResult::Loss)
            .unwrap();
        ledger
            .report_outcome("ana", GameKind::Checkers, GameResult::Draw)
            .unwrap();

        assert_eq!(ledger.points("ana"), 15);
        assert_eq!(ledger.points("bo"), 0);
        assert_eq!(ledger.history().len(), 3);
    }

    #[test]
    fn test_poisoned_history_keeps_recording() {
        let ledger = std::sync::Arc::new(PointsLedger::new());
        let holder = ledger.clone();
        let _ = std::thread::spawn(move || {
            let _guard = holder.history.lock().unwrap();
            panic!("poison the history");
        })
        .join();

        ledger
            .report_outcome("ana", GameKind::Checkers, GameResult::Win)
            .unwrap();
        assert_eq!(ledger.points("ana"), 10);
        assert_eq!(ledger.history().len(), 1);
    }

    #[test]
    fn test_rejects_anonymous_outcome() {
        let ledger = PointsLedger::new();
        assert_eq!(
            ledger.report_outcome("", GameKind::Marbles, GameResult::Win),
            Err(ScoreError::UnknownUser)
        );
        assert!(ledger.history().is_empty());
    }
}
