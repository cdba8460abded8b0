//! Trader model representing a Polymarket trader profile.

use serde::{Deserialize, Serialize};

use super::metrics::ScoredMetrics;

/// Trader profile with leaderboard figures and computed metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trader {
    /// Wallet address (0x-prefixed)
    pub address: String,

    /// Display name / pseudonym
    #[serde(default)]
    pub pseudonym: String,

    /// P&L reported by the leaderboard, if the trader came from there
    #[serde(default)]
    pub leaderboard_pnl: Option<f64>,

    /// Volume reported by the leaderboard
    #[serde(default)]
    pub leaderboard_volume: Option<f64>,

    /// Calculated performance metrics
    pub metrics: Option<ScoredMetrics>,
}

impl Trader {
    /// Create a new trader from address.
    pub fn new(address: String) -> Self {
        Self {
            address,
            pseudonym: String::new(),
            leaderboard_pnl: None,
            leaderboard_volume: None,
            metrics: None,
        }
    }

    /// Get display name (pseudonym or truncated address).
    pub fn display_name(&self) -> String {
        if !self.pseudonym.is_empty() {
            self.pseudonym.clone()
        } else if self.address.chars().count() > 10 {
            let len = self.address.chars().count();
            let head: String = self.address.chars().take(6).collect();
            let tail: String = self.address.chars().skip(len - 4).collect();
            format!("{}...{}", head, tail)
        } else {
            self.address.clone()
        }
    }

    /// Final score for ranking, 0 when not yet scored.
    pub fn score(&self) -> f64 {
        self.metrics.as_ref().map(|m| m.final_score).unwrap_or(0.0)
    }
}
