//! API response types for Polymarket Data API.

use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Activity, ClosedPosition, Position, TradeSide};

/// Leaderboard entry from /v1/leaderboard endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: Option<String>,
    pub proxy_wallet: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub vol: f64,
    #[serde(default)]
    pub pnl: f64,
}

/// Position response from /positions endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionResponse {
    pub condition_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub outcome: String,
    #[serde(default)]
    pub size: f64,
    #[serde(default)]
    pub avg_price: f64,
    #[serde(default)]
    pub initial_value: f64,
    #[serde(default)]
    pub current_value: f64,
    #[serde(default)]
    pub cash_pnl: f64,
    #[serde(default)]
    pub percent_pnl: f64,
}

impl From<PositionResponse> for Position {
    fn from(p: PositionResponse) -> Self {
        Self {
            condition_id: p.condition_id,
            title: p.title,
            outcome: p.outcome,
            size: p.size,
            avg_price: p.avg_price,
            initial_value: p.initial_value,
            current_value: p.current_value,
            cash_pnl: p.cash_pnl,
            percent_pnl: p.percent_pnl,
        }
    }
}

/// Closed position response from /closed-positions endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosedPositionResponse {
    pub condition_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub outcome: String,
    #[serde(default, alias = "totalBought")]
    pub size: f64,
    #[serde(default)]
    pub avg_price: f64,
    #[serde(default)]
    pub cur_price: f64,
    #[serde(default)]
    pub realized_pnl: f64,
    /// Unix seconds
    #[serde(default)]
    pub timestamp: Option<i64>,
}

impl From<ClosedPositionResponse> for ClosedPosition {
    fn from(p: ClosedPositionResponse) -> Self {
        Self {
            condition_id: p.condition_id,
            title: p.title,
            outcome: p.outcome,
            size: p.size,
            avg_price: p.avg_price,
            cur_price: p.cur_price,
            realized_pnl: p.realized_pnl,
            created_at: p.timestamp.and_then(|ts| Utc.timestamp_opt(ts, 0).single()),
        }
    }
}

/// Activity response from /activity endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityResponse {
    #[serde(rename = "type")]
    pub activity_type: String,
    #[serde(default)]
    pub condition_id: Option<String>,
    #[serde(default)]
    pub usdc_size: f64,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub side: Option<String>,
}

impl From<ActivityResponse> for Activity {
    fn from(a: ActivityResponse) -> Self {
        Self {
            side: a.side.as_deref().and_then(TradeSide::parse),
            activity_type: a.activity_type,
            usdc_size: a.usdc_size,
        }
    }
}

/// Query parameters for the leaderboard endpoint.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_period: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_position() {
        let json = r#"{
            "proxyWallet": "0x56687bf447db6ffa42ffe2204a05edaa20f55839",
            "conditionId": "0xcond",
            "title": "Will it rain?",
            "outcome": "Yes",
            "outcomeIndex": 0,
            "size": 120.5,
            "avgPrice": 0.41,
            "curPrice": 0.37,
            "initialValue": 49.405,
            "currentValue": 44.585,
            "cashPnl": -4.82,
            "percentPnl": -9.756
        }"#;

        let parsed: PositionResponse = serde_json::from_str(json).unwrap();
        let pos = Position::from(parsed);

        assert_eq!(pos.condition_id, "0xcond");
        assert_eq!(pos.initial_value, 49.405);
        assert_eq!(pos.cash_pnl, -4.82);
    }

    #[test]
    fn test_parse_closed_position_timestamp() {
        let json = r#"{
            "conditionId": "0xcond",
            "avgPrice": 0.25,
            "totalBought": 400,
            "realizedPnl": 300,
            "curPrice": 1,
            "timestamp": 1700000000
        }"#;

        let parsed: ClosedPositionResponse = serde_json::from_str(json).unwrap();
        let pos = ClosedPosition::from(parsed);

        assert_eq!(pos.size, 400.0);
        assert_eq!(pos.stake(), 100.0);
        assert_eq!(pos.sort_key(), 1_700_000_000_000);
    }

    #[test]
    fn test_parse_activity_without_side() {
        let json = r#"[
            {"type": "TRADE", "side": "BUY", "usdcSize": 12.5, "timestamp": 1},
            {"type": "REWARD", "usdcSize": 0.8, "timestamp": 2},
            {"type": "MERGE", "side": "", "usdcSize": 40, "timestamp": 3},
            {"type": "REDEEM", "side": null, "usdcSize": 15, "timestamp": 4}
        ]"#;

        let parsed: Vec<ActivityResponse> = serde_json::from_str(json).unwrap();
        let activities: Vec<Activity> = parsed.into_iter().map(Activity::from).collect();

        assert_eq!(activities[0].side, Some(TradeSide::Buy));
        assert!(activities[1].is_reward());
        assert_eq!(activities[1].side, None);
        assert_eq!(activities[2].side, None);
        assert_eq!(activities[3].side, None);
        assert_eq!(activities[3].usdc_size, 15.0);
    }

    #[test]
    fn test_leaderboard_params_skip_empty() {
        let params = LeaderboardParams {
            time_period: Some("MONTH".to_string()),
            limit: Some(50),
            ..Default::default()
        };
        let json = serde_json::to_value(&params).unwrap();

        assert_eq!(json["timePeriod"], "MONTH");
        assert_eq!(json["limit"], 50);
        assert!(json.get("category").is_none());
    }
}
