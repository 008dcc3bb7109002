//! Prop-firm risk planning.
//!
//! Turns account rules (daily and total drawdown, profit target) and trading
//! assumptions (risk per trade, reward:risk, win rate, trades per day) into
//! currency thresholds and a recommended per-trade risk.
//!
//! The per-trade cap is the smaller of:
//! - the daily rule: `max_daily_drawdown_pct / max_trades_per_day`
//! - the total rule: `max_total_drawdown_pct / estimated_losing_streak`
//!
//! and never more than the risk the trader asked for.

mod planner;
mod types;

pub use planner::{build_prop_firm_plan, estimate_losing_streak};
pub use types::{PropFirmConfig, PropFirmPhase, PropFirmPlanInput, PropFirmPlanResult};
