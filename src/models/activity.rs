//! Wallet activity events (trades, rewards, redemptions, merges).

use serde::{Deserialize, Serialize};

/// Direction of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    /// Parse the exact wire labels. Anything else is not a side.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "BUY" => Some(TradeSide::Buy),
            "SELL" => Some(TradeSide::Sell),
            _ => None,
        }
    }
}

/// Activity type that credits a reward payout to the wallet.
pub const REWARD_ACTIVITY: &str = "REWARD";

/// Single wallet event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Event type as reported by the API (e.g. "TRADE", "REWARD", "REDEEM")
    pub activity_type: String,

    /// Trade direction, only present for buy/sell events
    #[serde(default)]
    pub side: Option<TradeSide>,

    /// Notional USDC moved by the event
    #[serde(default)]
    pub usdc_size: f64,
}

impl Activity {
    pub fn is_reward(&self) -> bool {
        self.activity_type == REWARD_ACTIVITY
    }
}
