//! Trader scoring: sub-score curves, drawdown, and the metrics calculator.

mod calculator;
mod drawdown;
mod scores;

pub use calculator::MetricsCalculator;
pub use drawdown::max_drawdown;
pub use scores::{confidence_score, log_interpolate, pnl_score, risk_score, roi_score, win_score};
