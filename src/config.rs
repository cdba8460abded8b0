//! Scorer configuration.

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub const DATA_API_BASE: &str = "https://data-api.polymarket.com";

/// Configuration for data fetching and leaderboard scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorerConfig {
    /// Base URL of the Polymarket Data API
    pub api_base_url: String,

    /// Per-request HTTP timeout in seconds
    pub http_timeout_secs: u64,

    /// Upper bound on time spent retrying a single request, in seconds
    pub max_retry_secs: u64,

    /// Records requested per page from list endpoints
    pub page_size: u32,

    /// Maximum records fetched per endpoint per wallet
    pub max_records: usize,

    /// Wallets fetched concurrently when scoring a leaderboard
    pub fetch_concurrency: usize,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            api_base_url: DATA_API_BASE.to_string(),
            http_timeout_secs: 30,
            max_retry_secs: 60,
            page_size: 50,      // Closed positions endpoint caps at 50
            max_records: 2_000,
            fetch_concurrency: 4,
        }
    }
}

impl ScorerConfig {
    /// Reject settings that would stall or never fetch anything.
    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.is_empty() {
            anyhow::bail!("API base URL must not be empty");
        }
        if self.http_timeout_secs == 0 {
            anyhow::bail!("HTTP timeout must be at least 1 second");
        }
        if self.page_size == 0 || self.page_size > 500 {
            anyhow::bail!("Page size must be between 1 and 500, got {}", self.page_size);
        }
        if self.max_records == 0 {
            anyhow::bail!("Max records must be positive");
        }
        if self.fetch_concurrency == 0 {
            anyhow::bail!("Fetch concurrency must be positive");
        }
        Ok(())
    }
}
