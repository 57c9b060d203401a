//! WebAssembly bindings for the Parlour engine.
//!
//! The page owns the thinking-delay timer: when a call returns an
//! `opponent_thinking` event, it waits `delay_ms` and calls
//! `playOpponentTurn(epoch)`. Finished-game outcomes are queued and handed
//! to the page through `takeReports` for posting to the points ledger.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
use crate::config::SessionConfig;
#[cfg(feature = "wasm")]
use crate::events::SessionEvent;
#[cfg(feature = "wasm")]
use crate::score::QueuedReporter;
#[cfg(feature = "wasm")]
use crate::session::GameSession;
#[cfg(feature = "wasm")]
use std::sync::Arc;

/// Initialize panic hook for better error messages in browser console
#[cfg(feature = "wasm")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

#[cfg(feature = "wasm")]
fn events_json(events: &[SessionEvent]) -> String {
    serde_json::to_string(events).unwrap_or_else(|_| "[]".to_string())
}

/// WASM-exposed session wrapper
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub struct WasmSession {
    session: GameSession,
    reports: Arc<QueuedReporter>,
}

#[cfg(feature = "wasm")]
#[wasm_bindgen]
impl WasmSession {
    /// Create a session from a JSON `SessionConfig`
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<WasmSession, JsValue> {
        let config: SessionConfig = serde_json::from_str(config_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid session config: {}", e)))?;

        let reports = Arc::new(QueuedReporter::new());
        Ok(WasmSession {
            session: GameSession::new(config, reports.clone()),
            reports,
        })
    }

    /// Click a cell; returns the resulting events as JSON
    #[wasm_bindgen(js_name = selectCell)]
    pub fn select_cell(&mut self, row: u8, col: u8) -> String {
        events_json(&self.session.select_cell(row, col))
    }

    /// Timer callback for the computer's move
    #[wasm_bindgen(js_name = playOpponentTurn)]
    pub fn play_opponent_turn(&mut self, epoch: u64) -> String {
        events_json(&self.session.play_opponent_turn(epoch))
    }

    /// Start a new game, returning the new epoch
    pub fn reset(&mut self) -> u64 {
        self.session.reset()
    }

    pub fn close(&mut self) {
        self.session.close();
    }

    /// Whether the computer is about to move
    #[wasm_bindgen(js_name = isOpponentThinking)]
    pub fn is_opponent_thinking(&self) -> bool {
        self.session.is_opponent_thinking()
    }

    /// Get the session snapshot as JSON
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> String {
        serde_json::to_string(&self.session.snapshot()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Drain finished-game outcomes as a JSON array
    #[wasm_bindgen(js_name = takeReports)]
    pub fn take_reports(&self) -> String {
        serde_json::to_string(&self.reports.drain()).unwrap_or_else(|_| "[]".to_string())
    }
}
