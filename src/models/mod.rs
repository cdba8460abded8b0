//! Data models for traders, positions, activity, and scored metrics.

mod activity;
mod metrics;
mod position;
mod trader;

pub use activity::{Activity, TradeSide, REWARD_ACTIVITY};
pub use metrics::{ScoredMetrics, Streaks};
pub use position::{ClosedPosition, Position};
pub use trader::Trader;
