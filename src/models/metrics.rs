//! Scored performance metrics for a trader.

use serde::{Deserialize, Serialize};

/// Consecutive-win tracking over closed positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Streaks {
    /// Longest run of winning closed positions
    pub longest_streak: u32,

    /// Run of wins ending at the most recent closed position
    pub current_streak: u32,

    pub total_wins: u32,

    pub total_losses: u32,
}

/// Standardized performance metrics and composite score for one trader.
///
/// Every field is recomputed from scratch on each call to
/// [`MetricsCalculator::compute`](crate::metrics::MetricsCalculator::compute).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoredMetrics {
    // === P&L ===
    /// Realized + unrealized P&L plus rewards, in USDC
    pub total_pnl: f64,

    /// Return on total stake, in percent
    pub roi: f64,

    // === Win/Loss ===
    /// Winning share of closed positions with P&L, in percent
    pub win_rate: f64,

    /// Unique markets traded (open and closed)
    pub total_trades: u32,

    pub winning_trades: u32,

    pub losing_trades: u32,

    /// Closed positions counted toward the win rate
    pub total_trades_with_pnl: u32,

    // === Exposure ===
    /// Capital committed across all stakes, in USDC
    pub total_stakes: f64,

    /// Most negative single P&L (0 if none)
    pub worst_loss: f64,

    /// Most positive single P&L (0 if none)
    pub largest_win: f64,

    /// Largest peak-to-trough decline of cumulative realized P&L
    pub max_drawdown: f64,

    /// Coefficient of variation of stake sizes
    pub stake_volatility: f64,

    // === Volume ===
    pub total_volume: f64,

    pub buy_volume: f64,

    pub sell_volume: f64,

    // === Scores ===
    /// Composite score (0 to 100)
    pub final_score: f64,

    /// Mean of the largest losses relative to total stake; `None` below ten markets
    pub risk_score: Option<f64>,

    pub win_score: f64,

    pub confidence_score: f64,

    pub roi_score: f64,

    pub pnl_score: f64,

    pub streaks: Streaks,
}

impl ScoredMetrics {
    /// Whether the trader had any stake at all.
    pub fn has_activity(&self) -> bool {
        self.total_trades > 0
    }
}
