//! Client configuration.
//!
//! An explicit configuration object constructed once and passed to the
//! service, instead of process-wide singleton state. Defaults match the
//! backend's published per-operation budgets.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default number of retries after the initial attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Default base delay between retries, in milliseconds.
pub const DEFAULT_BASE_DELAY_MS: u64 = 1000;
/// Default result cap for full-text search.
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;
/// Default size of the recent-context window.
pub const DEFAULT_CONTEXT_LIMIT: u32 = 5;
/// Default age threshold for bulk cleanup, in days.
pub const DEFAULT_CLEANUP_DAYS: u32 = 90;
/// Default lookback window for analytics, in days.
pub const DEFAULT_ANALYTICS_DAYS: u32 = 30;

/// Per-operation request deadlines, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutBudgets {
    pub health: u64,
    pub list_summaries: u64,
    pub history: u64,
    pub append: u64,
    pub delete: u64,
    pub search: u64,
    pub context: u64,
    pub cleanup: u64,
    pub analytics: u64,
    pub batch_delete: u64,
}

impl Default for TimeoutBudgets {
    fn default() -> Self {
        Self {
            health: 10_000,
            list_summaries: 45_000,
            history: 30_000,
            append: 15_000,
            delete: 20_000,
            search: 30_000,
            context: 25_000,
            cleanup: 60_000,
            analytics: 60_000,
            batch_delete: 45_000,
        }
    }
}

/// Configuration for the HTTP conversation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the conversation store, without a trailing slash.
    pub base_url: String,
    /// Retries after the initial attempt, for retryable failures.
    pub max_retries: u32,
    /// Base backoff delay in milliseconds; the wait before retry N is
    /// `base_delay_ms * N`.
    pub base_delay_ms: u64,
    /// Whether internal tooling records are hidden from transcripts.
    pub filter_control_records: bool,
    /// Per-operation deadlines.
    pub timeouts: TimeoutBudgets,
}

impl ClientConfig {
    /// Creates a configuration with default budgets for the given store.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay_ms: DEFAULT_BASE_DELAY_MS,
            filter_control_records: true,
            timeouts: TimeoutBudgets::default(),
        }
    }

    /// Overrides the retry count.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Overrides the base backoff delay.
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay_ms = base_delay.as_millis() as u64;
        self
    }

    /// Enables or disables hiding of internal tooling records.
    pub fn with_control_filter(mut self, enabled: bool) -> Self {
        self.filter_control_records = enabled;
        self
    }
}
