//! Engine configuration.
//!
//! Plain struct with defaults, deserializable so hosts can keep it next to
//! their own settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tunables for the focus engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusConfig {
    /// Delay between inserting an empty live region and setting its text.
    pub announce_delay_ms: u64,
    /// Time after the call at which a live region is removed.
    pub display_window_ms: u64,
    /// Scroll newly focused elements into view.
    pub scroll_into_view: bool,
    /// Maximum history entries kept. Oldest are dropped first.
    pub history_limit: Option<usize>,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            announce_delay_ms: 100,
            display_window_ms: 1000,
            scroll_into_view: true,
            history_limit: None,
        }
    }
}

impl FocusConfig {
    pub fn announce_delay(&self) -> Duration {
        Duration::from_millis(self.announce_delay_ms)
    }

    pub fn display_window(&self) -> Duration {
        Duration::from_millis(self.display_window_ms)
    }
}
