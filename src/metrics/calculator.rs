//! Calculator for trader performance metrics: P&L, win rate, drawdown, composite score.

use std::collections::HashSet;

use tracing::debug;

use crate::models::{Activity, ClosedPosition, Position, ScoredMetrics, Streaks, TradeSide};

use super::drawdown::max_drawdown;
use super::scores::{confidence_score, pnl_score, risk_score, roi_score, win_score};

/// Calculator for computing trader performance metrics.
pub struct MetricsCalculator;

/// Reward and volume totals from the activity feed.
#[derive(Debug, Default)]
struct ActivityTotals {
    rewards: f64,
    buy_volume: f64,
    sell_volume: f64,
}

impl ActivityTotals {
    fn record(mut self, activity: &Activity) -> Self {
        if activity.is_reward() {
            self.rewards += activity.usdc_size;
        }
        // Events without a side (rewards, merges, redemptions) count toward neither bucket
        match activity.side {
            Some(TradeSide::Buy) => self.buy_volume += activity.usdc_size,
            Some(TradeSide::Sell) => self.sell_volume += activity.usdc_size,
            None => {}
        }
        self
    }
}

/// Running state threaded through the closed- and open-position passes.
#[derive(Debug)]
struct Accumulator {
    stake_count: u32,
    total_stakes: f64,
    stake_sq_sum: f64,
    stakes_of_wins: f64,

    realized_pnl: f64,
    unrealized_pnl: f64,
    equity_curve: Vec<f64>,

    trades_with_pnl: u32,
    winning_trades: u32,
    losing_trades: u32,
    current_streak: u32,
    longest_streak: u32,

    losses: Vec<f64>,
    worst_loss: f64,
    largest_win: f64,
}

impl Accumulator {
    fn new() -> Self {
        Self {
            stake_count: 0,
            total_stakes: 0.0,
            stake_sq_sum: 0.0,
            stakes_of_wins: 0.0,
            realized_pnl: 0.0,
            unrealized_pnl: 0.0,
            equity_curve: vec![0.0],
            trades_with_pnl: 0,
            winning_trades: 0,
            losing_trades: 0,
            current_streak: 0,
            longest_streak: 0,
            losses: Vec::new(),
            worst_loss: 0.0,
            largest_win: 0.0,
        }
    }

    fn add_stake(&mut self, stake: f64) {
        self.stake_count += 1;
        self.total_stakes += stake;
        self.stake_sq_sum += stake * stake;
    }

    fn note_loss(&mut self, pnl: f64) {
        self.losses.push(pnl);
        if pnl < self.worst_loss {
            self.worst_loss = pnl;
        }
    }

    fn note_win(&mut self, pnl: f64) {
        if pnl > self.largest_win {
            self.largest_win = pnl;
        }
    }

    /// Fold step for closed positions, which must arrive in chronological order.
    fn record_closed(mut self, pos: &ClosedPosition) -> Self {
        let stake = pos.stake();
        let pnl = pos.realized_pnl;

        self.add_stake(stake);
        self.realized_pnl += pnl;
        self.equity_curve.push(self.realized_pnl);
        self.trades_with_pnl += 1;

        if pnl > 0.0 {
            self.winning_trades += 1;
            self.current_streak += 1;
            self.longest_streak = self.longest_streak.max(self.current_streak);
            self.stakes_of_wins += stake;
            self.note_win(pnl);
        } else if pnl < 0.0 {
            self.losing_trades += 1;
            self.current_streak = 0;
            self.note_loss(pnl);
        }

        self
    }

    /// Fold step for open positions. Unrealized P&L never touches streaks or win counts.
    fn record_open(mut self, pos: &Position) -> Self {
        let pnl = pos.cash_pnl;

        self.add_stake(pos.stake());
        self.unrealized_pnl += pnl;

        if pnl < 0.0 {
            self.note_loss(pnl);
        } else if pnl > 0.0 {
            self.note_win(pnl);
        }

        self
    }

    /// Coefficient of variation (population std-dev / mean) of all stakes.
    fn stake_volatility(&self) -> f64 {
        if self.stake_count == 0 {
            return 0.0;
        }

        let n = self.stake_count as f64;
        let mean = self.total_stakes / n;
        if mean <= 0.0 {
            return 0.0;
        }

        let variance = (self.stake_sq_sum / n - mean * mean).max(0.0);
        variance.sqrt() / mean
    }
}

impl MetricsCalculator {
    /// Compute the full metric set from a trader's open positions, closed
    /// positions and activity feed.
    ///
    /// Pure and total: identical inputs always yield identical metrics.
    pub fn compute(
        positions: &[Position],
        closed_positions: &[ClosedPosition],
        activities: &[Activity],
    ) -> ScoredMetrics {
        let mut sorted: Vec<&ClosedPosition> = closed_positions.iter().collect();
        sorted.sort_by_key(|p| p.sort_key());

        let activity = activities
            .iter()
            .fold(ActivityTotals::default(), ActivityTotals::record);

        let acc = sorted
            .into_iter()
            .fold(Accumulator::new(), Accumulator::record_closed);
        let acc = positions.iter().fold(acc, Accumulator::record_open);

        let total_pnl = acc.realized_pnl + acc.unrealized_pnl + activity.rewards;

        // Partially closed markets appear in both groups but count once here
        let total_trades = closed_positions
            .iter()
            .map(|p| p.condition_id.as_str())
            .chain(positions.iter().map(|p| p.condition_id.as_str()))
            .collect::<HashSet<_>>()
            .len() as u32;

        let roi = if acc.total_stakes > 0.0 {
            total_pnl / acc.total_stakes * 100.0
        } else {
            0.0
        };

        let win_fraction = if acc.trades_with_pnl > 0 {
            acc.winning_trades as f64 / acc.trades_with_pnl as f64
        } else {
            0.0
        };
        let stake_win_fraction = if acc.total_stakes > 0.0 {
            acc.stakes_of_wins / acc.total_stakes
        } else {
            0.0
        };

        let pnl = pnl_score(total_pnl);

        let metrics = ScoredMetrics {
            total_pnl,
            roi,
            win_rate: win_fraction * 100.0,
            total_trades,
            winning_trades: acc.winning_trades,
            losing_trades: acc.losing_trades,
            total_trades_with_pnl: acc.trades_with_pnl,
            total_stakes: acc.total_stakes,
            worst_loss: acc.worst_loss,
            largest_win: acc.largest_win,
            max_drawdown: max_drawdown(&acc.equity_curve),
            stake_volatility: acc.stake_volatility(),
            total_volume: activity.buy_volume + activity.sell_volume,
            buy_volume: activity.buy_volume,
            sell_volume: activity.sell_volume,
            final_score: pnl * 100.0,
            risk_score: risk_score(&acc.losses, acc.total_stakes, total_trades),
            win_score: win_score(win_fraction, stake_win_fraction),
            confidence_score: confidence_score(total_trades as f64),
            roi_score: roi_score(roi / 100.0),
            pnl_score: pnl,
            streaks: Streaks {
                longest_streak: acc.longest_streak,
                current_streak: acc.current_streak,
                total_wins: acc.winning_trades,
                total_losses: acc.losing_trades,
            },
        };

        debug!(
            total_trades = metrics.total_trades,
            total_pnl = metrics.total_pnl,
            final_score = metrics.final_score,
            "Computed trader metrics"
        );

        metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const EPS: f64 = 1e-9;

    fn closed(id: &str, size: f64, avg_price: f64, pnl: f64, ts: Option<i64>) -> ClosedPosition {
        ClosedPosition {
            condition_id: id.to_string(),
            title: String::new(),
            outcome: "Yes".to_string(),
            size,
            avg_price,
            cur_price: 0.0,
            realized_pnl: pnl,
            created_at: ts.and_then(|s| Utc.timestamp_opt(s, 0).single()),
        }
    }

    fn open(id: &str, initial_value: f64, cash_pnl: f64) -> Position {
        Position {
            condition_id: id.to_string(),
            title: String::new(),
            outcome: "Yes".to_string(),
            size: initial_value * 2.0,
            avg_price: 0.5,
            initial_value,
            current_value: initial_value + cash_pnl,
            cash_pnl,
            percent_pnl: if initial_value > 0.0 { cash_pnl / initial_value * 100.0 } else { 0.0 },
        }
    }

    fn activity(kind: &str, side: Option<TradeSide>, usdc_size: f64) -> Activity {
        Activity {
            activity_type: kind.to_string(),
            side,
            usdc_size,
        }
    }

    #[test]
    fn test_empty_inputs() {
        let m = MetricsCalculator::compute(&[], &[], &[]);

        assert_eq!(m.total_trades, 0);
        assert_eq!(m.total_pnl, 0.0);
        assert_eq!(m.roi, 0.0);
        assert_eq!(m.win_rate, 0.0);
        assert_eq!(m.stake_volatility, 0.0);
        assert_eq!(m.max_drawdown, 0.0);
        assert_eq!(m.risk_score, None);
        assert_eq!(m.confidence_score, 0.0);
        assert_eq!(m.roi_score, 0.5);
        assert!((m.final_score - 15.0).abs() < EPS);
        assert!(!m.has_activity());
    }

    #[test]
    fn test_single_winning_closed_position() {
        let m = MetricsCalculator::compute(&[], &[closed("0xa", 10.0, 0.5, 25.0, None)], &[]);

        assert!((m.total_stakes - 5.0).abs() < EPS);
        assert_eq!(m.total_trades_with_pnl, 1);
        assert_eq!(m.winning_trades, 1);
        assert_eq!(m.total_trades, 1);
        assert!((m.win_rate - 100.0).abs() < EPS);
        assert!((m.total_pnl - 25.0).abs() < EPS);
        assert!((m.roi - 500.0).abs() < EPS);
        assert_eq!(m.streaks.longest_streak, 1);
        assert!((m.win_score - 1.0).abs() < EPS);
        assert!((m.final_score - m.pnl_score * 100.0).abs() < EPS);
        assert!((m.roi_score - roi_score(5.0)).abs() < EPS);
    }

    #[test]
    fn test_loss_then_win_streaks() {
        let closed_positions = vec![
            closed("0xa", 40.0, 0.5, -20.0, Some(1_000)),
            closed("0xb", 40.0, 0.5, 30.0, Some(2_000)),
        ];
        let m = MetricsCalculator::compute(&[], &closed_positions, &[]);

        assert_eq!(m.streaks.current_streak, 1);
        assert_eq!(m.streaks.longest_streak, 1);
        assert_eq!(m.streaks.total_wins, 1);
        assert_eq!(m.streaks.total_losses, 1);
        assert_eq!(m.worst_loss, -20.0);
        assert_eq!(m.largest_win, 30.0);
        // Curve 0 -> -20 -> 10
        assert_eq!(m.max_drawdown, 20.0);
    }

    #[test]
    fn test_closed_positions_sorted_chronologically() {
        // Supplied newest first; missing timestamp sorts as the epoch
        let closed_positions = vec![
            closed("0xc", 10.0, 0.5, 5.0, Some(3_000)),
            closed("0xb", 10.0, 0.5, 5.0, Some(2_000)),
            closed("0xa", 10.0, 0.5, -5.0, None),
        ];
        let m = MetricsCalculator::compute(&[], &closed_positions, &[]);

        assert_eq!(m.streaks.current_streak, 2);
        assert_eq!(m.streaks.longest_streak, 2);
        assert_eq!(m.max_drawdown, 5.0);
    }

    #[test]
    fn test_zero_pnl_counts_without_streak_change() {
        let closed_positions = vec![
            closed("0xa", 10.0, 0.5, 3.0, Some(1)),
            closed("0xb", 10.0, 0.5, 0.0, Some(2)),
            closed("0xc", 10.0, 0.5, 3.0, Some(3)),
        ];
        let m = MetricsCalculator::compute(&[], &closed_positions, &[]);

        assert_eq!(m.total_trades_with_pnl, 3);
        assert_eq!(m.winning_trades, 2);
        assert_eq!(m.losing_trades, 0);
        assert_eq!(m.streaks.current_streak, 2);
        assert!(m.winning_trades + m.losing_trades <= m.total_trades_with_pnl);
    }

    #[test]
    fn test_open_positions_do_not_affect_streaks() {
        let positions = vec![open("0xo1", 100.0, -60.0), open("0xo2", 50.0, 80.0)];
        let closed_positions = vec![closed("0xa", 10.0, 0.5, 2.0, Some(1))];
        let m = MetricsCalculator::compute(&positions, &closed_positions, &[]);

        assert_eq!(m.streaks.current_streak, 1);
        assert_eq!(m.streaks.total_losses, 0);
        assert_eq!(m.losing_trades, 0);
        assert_eq!(m.total_trades_with_pnl, 1);
        assert_eq!(m.worst_loss, -60.0);
        assert_eq!(m.largest_win, 80.0);
        assert!((m.total_pnl - 22.0).abs() < EPS);
        assert!((m.total_stakes - 155.0).abs() < EPS);
        // Drawdown only follows realized P&L
        assert_eq!(m.max_drawdown, 0.0);
    }

    #[test]
    fn test_market_counted_once_across_groups() {
        // Partially closed market: stake and P&L from both groups, one market
        let positions = vec![open("0xa", 20.0, 4.0)];
        let closed_positions = vec![closed("0xa", 10.0, 0.5, 6.0, None)];
        let m = MetricsCalculator::compute(&positions, &closed_positions, &[]);

        assert_eq!(m.total_trades, 1);
        assert!((m.total_stakes - 25.0).abs() < EPS);
        assert!((m.total_pnl - 10.0).abs() < EPS);
    }

    #[test]
    fn test_activity_rewards_and_volume() {
        let activities = vec![
            activity("TRADE", Some(TradeSide::Buy), 100.0),
            activity("TRADE", Some(TradeSide::Sell), 40.0),
            activity("REWARD", None, 7.5),
            // Known gap: events without a side are left out of volume
            activity("MERGE", None, 1_000.0),
            activity("REDEEM", None, 250.0),
        ];
        let m = MetricsCalculator::compute(&[], &[], &activities);

        assert_eq!(m.buy_volume, 100.0);
        assert_eq!(m.sell_volume, 40.0);
        assert_eq!(m.total_volume, 140.0);
        assert!((m.total_pnl - 7.5).abs() < EPS);
        // No stake, so ROI stays at zero even with reward income
        assert_eq!(m.roi, 0.0);
    }

    #[test]
    fn test_stake_volatility() {
        // Stakes 10, 20, 30: mean 20, population std-dev sqrt(200/3)
        let closed_positions = vec![
            closed("0xa", 20.0, 0.5, 1.0, None),
            closed("0xb", 40.0, 0.5, 1.0, None),
        ];
        let positions = vec![open("0xc", 30.0, 0.0)];
        let m = MetricsCalculator::compute(&positions, &closed_positions, &[]);

        let expected = (200.0f64 / 3.0).sqrt() / 20.0;
        assert!((m.stake_volatility - expected).abs() < 1e-9);

        let uniform = vec![
            closed("0xa", 20.0, 0.5, 1.0, None),
            closed("0xb", 20.0, 0.5, 1.0, None),
        ];
        let m = MetricsCalculator::compute(&[], &uniform, &[]);
        assert!(m.stake_volatility.abs() < 1e-9);
    }

    #[test]
    fn test_risk_score_uses_unique_markets_and_open_losses() {
        let mut closed_positions: Vec<ClosedPosition> = (0..9)
            .map(|i| closed(&format!("0x{i}"), 20.0, 0.5, 2.0, Some(i)))
            .collect();
        closed_positions.push(closed("0xloss", 20.0, 0.5, -8.0, Some(100)));
        let positions = vec![open("0xopen", 100.0, -30.0)];

        let m = MetricsCalculator::compute(&positions, &closed_positions, &[]);

        assert_eq!(m.total_trades, 11);
        // One sample (11 / 10): the open position's 30 loss over 200 stake
        let risk = m.risk_score.unwrap();
        assert!((risk - 0.15).abs() < EPS);
        assert!((m.confidence_score - confidence_score(11.0)).abs() < EPS);
    }

    #[test]
    fn test_win_score_blends_count_and_stake() {
        // One small win, one large loss
        let closed_positions = vec![
            closed("0xa", 10.0, 0.5, 5.0, Some(1)),
            closed("0xb", 30.0, 0.5, -15.0, Some(2)),
        ];
        let m = MetricsCalculator::compute(&[], &closed_positions, &[]);

        // 0.5 * (1/2) + 0.5 * (5/20)
        assert!((m.win_score - 0.375).abs() < EPS);
        assert!((m.win_rate - 50.0).abs() < EPS);
    }

    #[test]
    fn test_compute_is_idempotent() {
        let positions = vec![open("0xo", 40.0, -3.0)];
        let closed_positions = vec![
            closed("0xa", 10.0, 0.4, 12.0, Some(5)),
            closed("0xb", 25.0, 0.6, -4.0, None),
        ];
        let activities = vec![
            activity("TRADE", Some(TradeSide::Buy), 12.0),
            activity("REWARD", None, 1.0),
        ];

        let first = MetricsCalculator::compute(&positions, &closed_positions, &activities);
        let second = MetricsCalculator::compute(&positions, &closed_positions, &activities);
        assert_eq!(first, second);
    }
}
