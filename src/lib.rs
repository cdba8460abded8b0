//! Polymarket trader scoring.
//!
//! Turns a wallet's open positions, closed positions and activity feed into
//! a standardized set of performance metrics and a 0-100 composite score.
//! The scoring engine in [`metrics`] is pure and synchronous; [`api`] fetches
//! its inputs from the Polymarket Data API.

pub mod api;
pub mod config;
pub mod metrics;
pub mod models;
pub mod ranking;

pub use metrics::MetricsCalculator;
pub use models::{Activity, ClosedPosition, Position, ScoredMetrics, Streaks};
