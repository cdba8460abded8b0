//! Leaderboard ranking by final score, plus score distribution summaries.

use std::cmp::Ordering;

use serde::Serialize;
use statrs::statistics::{Data, OrderStatistics, Statistics};

use crate::models::Trader;

/// A scored trader with its 1-based position in the ranking.
#[derive(Debug, Clone, Serialize)]
pub struct RankedTrader {
    pub rank: usize,
    pub trader: Trader,
}

/// Order traders by final score, breaking ties by total P&L then address.
///
/// Unscored traders rank as score 0 with zero P&L.
pub fn rank_traders(mut traders: Vec<Trader>) -> Vec<RankedTrader> {
    traders.sort_by(compare_traders);

    traders
        .into_iter()
        .enumerate()
        .map(|(i, trader)| RankedTrader { rank: i + 1, trader })
        .collect()
}

fn compare_traders(a: &Trader, b: &Trader) -> Ordering {
    let pnl = |t: &Trader| t.metrics.as_ref().map(|m| m.total_pnl).unwrap_or(0.0);

    b.score()
        .total_cmp(&a.score())
        .then_with(|| pnl(b).total_cmp(&pnl(a)))
        .then_with(|| a.address.cmp(&b.address))
}

/// Distribution of final scores across a ranking.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoreSummary {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub median: f64,
    pub upper_quartile: f64,
    pub top_score: f64,
}

impl ScoreSummary {
    pub fn from_ranked(ranked: &[RankedTrader]) -> Self {
        let scores: Vec<f64> = ranked.iter().map(|r| r.trader.score()).collect();
        if scores.is_empty() {
            return Self::default();
        }

        let count = scores.len();
        let mean = scores.iter().mean();
        let std_dev = scores.iter().population_std_dev();
        let top_score = Statistics::max(&scores);

        let mut data = Data::new(scores);

        Self {
            count,
            mean,
            std_dev,
            median: data.median(),
            upper_quartile: data.upper_quartile(),
            top_score,
        }
    }
}
