//! Round configuration types and defaults.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for one slot-round/block-round pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundConfig {
    /// Slot to inspect in the block round instead of the quorum winner.
    /// `None` or `0` means "use the quorum result".
    #[serde(default)]
    pub slot_override: Option<u64>,

    /// Per-query timeout in seconds (default: 30). `0` disables the timeout,
    /// in which case one unresponsive node stalls the round.
    #[serde(default = "default_query_timeout_seconds")]
    pub query_timeout_seconds: u64,

    /// Maximum number of node queries in flight at once (default: 64).
    #[serde(default = "default_max_concurrent_queries")]
    pub max_concurrent_queries: usize,

    /// Commitment level passed to the nodes (`processed`, `confirmed`,
    /// `finalized`). Nodes apply their own default when unset.
    #[serde(default)]
    pub commitment: Option<String>,
}

fn default_query_timeout_seconds() -> u64 {
    30
}

fn default_max_concurrent_queries() -> usize {
    64
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            slot_override: None,
            query_timeout_seconds: default_query_timeout_seconds(),
            max_concurrent_queries: default_max_concurrent_queries(),
            commitment: None,
        }
    }
}

impl RoundConfig {
    /// Returns the operator override slot, treating `0` as absent.
    #[must_use]
    pub fn override_slot(&self) -> Option<u64> {
        self.slot_override.filter(|slot| *slot > 0)
    }

    /// Returns the per-query timeout, or `None` when disabled.
    #[must_use]
    pub fn query_timeout(&self) -> Option<Duration> {
        (self.query_timeout_seconds > 0).then(|| Duration::from_secs(self.query_timeout_seconds))
    }
}
