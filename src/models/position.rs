//! Open and closed positions as reported by the Data API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Open stake in a prediction market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Market condition ID
    pub condition_id: String,

    /// Market title for display
    #[serde(default)]
    pub title: String,

    /// Outcome token held (e.g., "Yes", "No")
    #[serde(default)]
    pub outcome: String,

    /// Number of outcome tokens held
    pub size: f64,

    /// Average entry price per token
    pub avg_price: f64,

    /// Initial cost basis in USDC
    pub initial_value: f64,

    /// Current market value in USDC
    #[serde(default)]
    pub current_value: f64,

    /// Unrealized P&L in USDC
    #[serde(default)]
    pub cash_pnl: f64,

    /// Unrealized P&L as percentage
    #[serde(default)]
    pub percent_pnl: f64,
}

impl Position {
    /// Capital committed to this position.
    pub fn stake(&self) -> f64 {
        self.initial_value
    }
}

/// Stake whose market has resolved or been exited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosedPosition {
    /// Market condition ID
    pub condition_id: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub outcome: String,

    pub size: f64,

    pub avg_price: f64,

    /// Exit price per token
    #[serde(default)]
    pub cur_price: f64,

    /// Realized P&L in USDC
    pub realized_pnl: f64,

    /// When the position was closed, if the API reported it
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl ClosedPosition {
    /// Capital committed to this position.
    pub fn stake(&self) -> f64 {
        self.size * self.avg_price
    }

    /// Sort key for chronological ordering; missing timestamps sort as the epoch.
    pub fn sort_key(&self) -> i64 {
        self.created_at.map(|t| t.timestamp_millis()).unwrap_or(0)
    }
}
