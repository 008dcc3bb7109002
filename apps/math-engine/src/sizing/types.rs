//! Input and output types for position sizing.

use serde::{Deserialize, Serialize};

/// Input parameters for a risk-based position size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionSizeInput {
    /// Account balance in account currency.
    pub account_size: f64,
    /// Percent of the account to risk on the trade (1 = 1%).
    pub risk_percent: f64,
    /// Distance from entry to stop, in price units.
    pub stop_loss_distance: f64,
    /// Currency value of one price unit for one unit of size
    /// (pip value, point value, tick value).
    pub value_per_unit: f64,
}

/// Result of a position size calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionSizeResult {
    /// Currency amount lost if the stop is hit.
    pub risk_amount: f64,
    /// Trade size (lots, contracts, shares) that risks exactly `risk_amount`.
    pub position_size: f64,
    /// Echo of the requested risk percent.
    pub risk_percent: f64,
    /// Echo of the stop distance.
    pub stop_loss_distance: f64,
    /// Echo of the per-unit value.
    pub value_per_unit: f64,
}
