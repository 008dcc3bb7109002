//! Input and output types for compounding projections.

use serde::{Deserialize, Serialize};

/// Starting point and per-trade model for a projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompoundingPlanInput {
    /// Balance before the first trade.
    pub starting_balance: f64,
    /// Percent of the current balance risked on every trade.
    pub risk_per_trade_pct: f64,
    /// Reward:risk of a winning trade.
    #[serde(rename = "expectedRR")]
    pub expected_rr: f64,
    /// Expected win rate in percent.
    pub expected_winrate_pct: f64,
    /// Number of trades to project. Signed so a negative count reaches
    /// validation with its field name.
    pub number_of_trades: i64,
}

/// Balance after one trade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompoundingStep {
    /// 1-based trade number.
    pub trade_number: u32,
    /// Balance after the trade, rounded to cents.
    pub balance: f64,
}

/// Projected balance path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompoundingPlanResult {
    /// Echo of the starting balance.
    pub starting_balance: f64,
    /// Balance after the last trade.
    pub ending_balance: f64,
    /// Balance multiplier applied per trade. Below 1 means negative expectancy.
    pub growth_factor_per_trade: f64,
    /// Expected value of one trade in R-multiples.
    #[serde(rename = "expectedRPerTrade")]
    pub expected_r_per_trade: f64,
    /// Overall change from start to end, percent.
    pub total_return_pct: f64,
    /// Number of projected trades.
    pub number_of_trades: u32,
    /// One entry per trade, in order.
    pub steps: Vec<CompoundingStep>,
}
