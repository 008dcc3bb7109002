//! Prop-firm risk planning.
//!
//! The daily rule assumes every trade of the day is a full loss of the same
//! size. It ignores partial losses and mixed days, which keeps the cap
//! conservative; do not relax it without revisiting the risk posture.

use crate::error::MathError;
use crate::numeric::{DEFAULT_SCALE, FixedDecimal};
use crate::validation::require_positive;

use super::types::{PropFirmConfig, PropFirmPlanInput, PropFirmPlanResult};

/// Tail probability for the losing-streak estimate (95th percentile).
const STREAK_TAIL_PROBABILITY: f64 = 0.05;

/// Win-rate bounds that keep `ln(1 - winrate)` finite and negative.
const MIN_WINRATE: f64 = 0.01;
const MAX_WINRATE: f64 = 0.99;

/// Worst-case consecutive losses at 95% confidence for a win rate in percent.
///
/// Uses the geometric tail `P(streak >= L) ~ loss^L <= 0.05`, so
/// `L = ln(0.05) / ln(loss)`, rounded and never below one. The win rate is
/// clamped to `[1%, 99%]`; a non-finite rate is treated as 1%.
#[must_use]
pub fn estimate_losing_streak(expected_winrate_pct: f64) -> u32 {
    let winrate = if expected_winrate_pct.is_finite() {
        (expected_winrate_pct / 100.0).clamp(MIN_WINRATE, MAX_WINRATE)
    } else {
        MIN_WINRATE
    };
    let loss_probability = 1.0 - winrate;
    let streak = (STREAK_TAIL_PROBABILITY.ln() / loss_probability.ln()).max(1.0);
    streak.round() as u32
}

/// Derive loss limits, targets and a safe per-trade risk from account rules.
///
/// # Errors
///
/// Returns [`MathError::InvalidInput`] when `accountSize` is not positive or
/// `maxTradesPerDay` is below one.
pub fn build_prop_firm_plan(input: &PropFirmPlanInput) -> Result<PropFirmPlanResult, MathError> {
    let config = &input.config;
    let account_size = require_positive("accountSize", config.account_size)?;
    if input.max_trades_per_day < 1 {
        return Err(MathError::InvalidInput {
            field: "maxTradesPerDay",
            reason: format!("must be at least 1, got {}", input.max_trades_per_day),
        });
    }

    let daily_loss_limit_amount = account_size * config.max_daily_drawdown_pct / 100.0;
    let total_loss_limit_amount = account_size * config.max_total_drawdown_pct / 100.0;
    let target_profit_amount = account_size * config.target_return_pct / 100.0;

    let estimated_losing_streak = estimate_losing_streak(input.expected_winrate_pct);

    let by_daily_rule = ratio(config.max_daily_drawdown_pct, input.max_trades_per_day)?;
    let by_total_rule = ratio(
        config.max_total_drawdown_pct,
        i64::from(estimated_losing_streak),
    )?;
    let safe_risk = by_daily_rule.min(by_total_rule).min(input.risk_per_trade_pct);

    tracing::debug!(
        estimated_losing_streak,
        by_daily_rule,
        by_total_rule,
        safe_risk,
        "Built prop-firm plan"
    );

    let currency = &config.currency;
    let notes = vec![
        account_note(config),
        format!(
            "Profit target: {:.2}% = {target_profit_amount:.2} {currency}",
            config.target_return_pct
        ),
        format!(
            "Daily loss limit: {:.2}% = {daily_loss_limit_amount:.2} {currency}",
            config.max_daily_drawdown_pct
        ),
        format!(
            "Total loss limit: {:.2}% = {total_loss_limit_amount:.2} {currency}",
            config.max_total_drawdown_pct
        ),
        format!(
            "Estimated losing streak (95% confidence) at {:.2}% win rate: {estimated_losing_streak} trades",
            input.expected_winrate_pct
        ),
        format!(
            "Max risk per trade by daily rule: {:.2}% / {} trades = {by_daily_rule:.2}%",
            config.max_daily_drawdown_pct, input.max_trades_per_day
        ),
        format!(
            "Max risk per trade by total rule: {:.2}% / {estimated_losing_streak} losses = {by_total_rule:.2}%",
            config.max_total_drawdown_pct
        ),
        format!(
            "Safe risk per trade: {safe_risk:.2}% (requested {:.2}%)",
            input.risk_per_trade_pct
        ),
        format!(
            "Expected R:R {:.2} at {:.2}% win rate",
            input.expected_rr, input.expected_winrate_pct
        ),
    ];

    Ok(PropFirmPlanResult {
        daily_loss_limit_pct: config.max_daily_drawdown_pct,
        daily_loss_limit_amount,
        total_loss_limit_pct: config.max_total_drawdown_pct,
        total_loss_limit_amount,
        target_profit_pct: config.target_return_pct,
        target_profit_amount,
        max_risk_per_trade_pct_by_daily_rule: by_daily_rule,
        max_risk_per_trade_pct_by_total_rule: by_total_rule,
        safe_risk_per_trade_pct: safe_risk,
        estimated_losing_streak,
        notes,
    })
}

/// `pct / count` on the fixed-point grid.
fn ratio(pct: f64, count: i64) -> Result<f64, MathError> {
    let pct = FixedDecimal::from_f64(pct, DEFAULT_SCALE)?;
    let count = FixedDecimal::from_int(count, DEFAULT_SCALE)?;
    Ok(pct.try_div(count)?.to_f64())
}

fn account_note(config: &PropFirmConfig) -> String {
    let mut note = format!("Account: {:.2} {}", config.account_size, config.currency);
    if let Some(phase) = config.phase {
        note.push_str(&format!(", phase: {phase}"));
    }
    if let Some(days) = config.min_trading_days {
        note.push_str(&format!(", min trading days: {days}"));
    }
    note
}
