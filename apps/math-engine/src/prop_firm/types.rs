//! Prop-firm account rules, trading assumptions and the resulting plan.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stage of a prop-firm account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PropFirmPhase {
    /// First evaluation stage.
    Challenge,
    /// Second evaluation stage.
    Verification,
    /// Live funded account.
    Funded,
}

impl fmt::Display for PropFirmPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Challenge => write!(f, "challenge"),
            Self::Verification => write!(f, "verification"),
            Self::Funded => write!(f, "funded"),
        }
    }
}

/// Rules of a prop-firm account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropFirmConfig {
    /// Starting account size.
    pub account_size: f64,
    /// Account currency code, used in notes only.
    pub currency: String,
    /// Profit target as a percent of the account.
    pub target_return_pct: f64,
    /// Maximum loss allowed in one day, percent of the account.
    pub max_daily_drawdown_pct: f64,
    /// Maximum loss allowed overall, percent of the account.
    pub max_total_drawdown_pct: f64,
    /// Minimum number of trading days the firm requires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_trading_days: Option<u32>,
    /// Account stage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<PropFirmPhase>,
}

/// Account rules plus the trader's assumptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropFirmPlanInput {
    /// Account rules.
    pub config: PropFirmConfig,
    /// Risk the trader intends to take per trade, percent of the account.
    pub risk_per_trade_pct: f64,
    /// Expected reward:risk per winning trade.
    #[serde(rename = "expectedRR")]
    pub expected_rr: f64,
    /// Expected win rate in percent.
    pub expected_winrate_pct: f64,
    /// Most trades the trader takes in a day. Signed so a negative count
    /// reaches validation with its field name.
    pub max_trades_per_day: i64,
}

/// Loss limits, targets and the recommended risk per trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropFirmPlanResult {
    /// Daily loss limit, percent.
    pub daily_loss_limit_pct: f64,
    /// Daily loss limit in account currency.
    pub daily_loss_limit_amount: f64,
    /// Total loss limit, percent.
    pub total_loss_limit_pct: f64,
    /// Total loss limit in account currency.
    pub total_loss_limit_amount: f64,
    /// Profit target, percent.
    pub target_profit_pct: f64,
    /// Profit target in account currency.
    pub target_profit_amount: f64,
    /// Largest per-trade risk that survives a full day of losses.
    pub max_risk_per_trade_pct_by_daily_rule: f64,
    /// Largest per-trade risk that survives the estimated losing streak.
    pub max_risk_per_trade_pct_by_total_rule: f64,
    /// Smallest of the two caps and the requested risk.
    pub safe_risk_per_trade_pct: f64,
    /// 95th-percentile consecutive losses for the expected win rate.
    pub estimated_losing_streak: u32,
    /// Human-readable trace of every figure, in a fixed order.
    pub notes: Vec<String>,
}
