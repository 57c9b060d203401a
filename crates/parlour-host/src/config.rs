//! Host configuration from the environment.

use parlour_core::{CaptureRule, SessionConfig};
use tracing::warn;

/// Settings applied to every session the host opens
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostConfig {
    /// Credited when a client does not name a user (`PARLOUR_USER`)
    pub default_user: Option<String>,
    /// Overrides the thinking delay (`PARLOUR_THINK_DELAY_MS`)
    pub think_delay_ms: Option<u64>,
    /// Overrides the capture rule (`PARLOUR_CAPTURE_RULE`)
    pub capture_rule: Option<CaptureRule>,
}

impl HostConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`; unparsable values are logged and skipped.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default_user = lookup("PARLOUR_USER").filter(|u| !u.trim().is_empty());

        let think_delay_ms = lookup("PARLOUR_THINK_DELAY_MS").and_then(|raw| {
            raw.trim()
                .parse()
                .map_err(|e| warn!(value = %raw, error = %e, "Ignoring PARLOUR_THINK_DELAY_MS"))
                .ok()
        });

        let capture_rule = lookup("PARLOUR_CAPTURE_RULE").and_then(|raw| {
            raw.parse()
                .map_err(|e| warn!(error = %e, "Ignoring PARLOUR_CAPTURE_RULE"))
                .ok()
        });

        Self {
            default_user,
            think_delay_ms,
            capture_rule,
        }
    }

    /// Fill in a client's session config with the host's settings
    pub fn apply(&self, mut config: SessionConfig) -> SessionConfig {
        if config.user_id.trim().is_empty() {
            if let Some(user) = &self.default_user {
                config.user_id = user.clone();
            }
        }
        if let Some(delay) = self.think_delay_ms {
            config.think_delay_ms = delay;
        }
        if let Some(rule) = self.capture_rule {
            config.capture_rule = rule;
        }
        config
    }
}
