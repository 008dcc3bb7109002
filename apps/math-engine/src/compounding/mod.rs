//! Compounding growth projection.
//!
//! Models every trade as the expected outcome: a balance multiplier of
//! `1 + risk_fraction * expected_r`, where `expected_r` is the expectancy in
//! R-multiples from the win rate and reward:risk. A multiplier below one is a
//! valid result; it means the assumptions lose money on average.

mod projector;
mod types;

pub use projector::{CompoundingProjector, DEFAULT_MAX_TRADES, build_compounding_plan};
pub use types::{CompoundingPlanInput, CompoundingPlanResult, CompoundingStep};
