//! Compounding projection on the fixed-point grid.

use crate::error::MathError;
use crate::numeric::FixedDecimal;
use crate::validation::{require_positive, require_within};

use super::types::{CompoundingPlanInput, CompoundingPlanResult, CompoundingStep};

/// Default cap on projected trades per call.
pub const DEFAULT_MAX_TRADES: u32 = 5_000;

/// Balances are reported in cents.
const BALANCE_DIGITS: u32 = 2;

/// Working scale for the projection. Wide enough that a risk percent with
/// eight decimals still multiplies into the growth factor without truncation.
const PROJECTION_SCALE: u32 = 12;

/// Projects balance growth for a fixed risk fraction and expectancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompoundingProjector {
    max_trades: u32,
}

impl Default for CompoundingProjector {
    fn default() -> Self {
        Self {
            max_trades: DEFAULT_MAX_TRADES,
        }
    }
}

impl CompoundingProjector {
    /// Projector with a custom trade cap.
    #[must_use]
    pub const fn with_max_trades(max_trades: u32) -> Self {
        Self { max_trades }
    }

    /// Largest `numberOfTrades` this projector accepts.
    #[must_use]
    pub const fn max_trades(&self) -> u32 {
        self.max_trades
    }

    /// Project the balance after each of `number_of_trades` trades.
    ///
    /// `expected_r = winrate * rr - (1 - winrate)` and
    /// `growth = 1 + risk_pct / 100 * expected_r`; every step multiplies the
    /// previous balance by `growth` and rounds to cents. Both are computed
    /// from the percent inputs with the divisions last, so no intermediate
    /// fraction is truncated.
    ///
    /// # Errors
    ///
    /// - [`MathError::InvalidInput`] for a non-positive field, a win rate
    ///   above 100, or more trades than the cap.
    /// - [`MathError::Overflow`] if the balance leaves the fixed-point range.
    pub fn project(&self, input: &CompoundingPlanInput) -> Result<CompoundingPlanResult, MathError> {
        let starting_balance = require_positive("startingBalance", input.starting_balance)?;
        let risk_pct = require_positive("riskPerTradePct", input.risk_per_trade_pct)?;
        let rr = require_positive("expectedRR", input.expected_rr)?;
        let winrate_pct = require_positive("expectedWinratePct", input.expected_winrate_pct)?;
        require_within("expectedWinratePct", winrate_pct, 0.0, 100.0)?;
        let number_of_trades = self.check_trade_count(input.number_of_trades)?;

        let one = FixedDecimal::one(PROJECTION_SCALE);
        let hundred = FixedDecimal::from_int(100, PROJECTION_SCALE)?;
        let ten_thousand = FixedDecimal::from_int(10_000, PROJECTION_SCALE)?;

        // winrate * rr - (1 - winrate), scaled by 100: winrate_pct * (rr + 1) - 100
        let edge_pct = fixed(winrate_pct)?
            .try_mul(fixed(rr)?.try_add(one)?)?
            .try_sub(hundred)?;
        let expected_r = edge_pct.try_div(hundred)?;
        let growth = one.try_add(fixed(risk_pct)?.try_mul(edge_pct)?.try_div(ten_thousand)?)?;

        let start = fixed(starting_balance)?;
        let mut balance = start;
        let mut steps = Vec::with_capacity(number_of_trades as usize);
        for trade_number in 1..=number_of_trades {
            balance = balance.try_mul(growth)?.round_dp(BALANCE_DIGITS);
            steps.push(CompoundingStep {
                trade_number,
                balance: balance.to_f64(),
            });
        }

        let total_return_pct = balance
            .try_sub(start)?
            .try_div(start)?
            .try_mul(hundred)?
            .round_dp(4)
            .to_f64();

        tracing::debug!(
            trades = number_of_trades,
            growth = %growth,
            ending_balance = %balance,
            "Built compounding plan"
        );

        Ok(CompoundingPlanResult {
            starting_balance,
            ending_balance: balance.to_f64(),
            growth_factor_per_trade: growth.to_f64(),
            expected_r_per_trade: expected_r.to_f64(),
            total_return_pct,
            number_of_trades,
            steps,
        })
    }

    fn check_trade_count(&self, number_of_trades: i64) -> Result<u32, MathError> {
        if number_of_trades < 1 {
            return Err(MathError::InvalidInput {
                field: "numberOfTrades",
                reason: format!("must be at least 1, got {number_of_trades}"),
            });
        }
        u32::try_from(number_of_trades)
            .ok()
            .filter(|count| *count <= self.max_trades)
            .ok_or_else(|| MathError::InvalidInput {
                field: "numberOfTrades",
                reason: format!("must not exceed {}, got {number_of_trades}", self.max_trades),
            })
    }
}

/// Project with the default trade cap.
///
/// # Errors
///
/// See [`CompoundingProjector::project`].
pub fn build_compounding_plan(
    input: &CompoundingPlanInput,
) -> Result<CompoundingPlanResult, MathError> {
    CompoundingProjector::default().project(input)
}

fn fixed(value: f64) -> Result<FixedDecimal, MathError> {
    FixedDecimal::from_f64(value, PROJECTION_SCALE)
}
