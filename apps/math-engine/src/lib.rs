// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Math Engine - deterministic trading math
//!
//! Pure calculators behind the trading companion's risk and planning tools.
//! Identical input always yields identical output; nothing here reads a
//! clock, a random source or the network.
//!
//! # Components
//!
//! - `numeric`: [`FixedDecimal`], the scaled-integer type every percent and
//!   ratio path goes through
//! - `sizing`: units to trade for a given account risk and stop distance
//! - `prop_firm`: loss limits, profit target and a losing-streak based safe
//!   risk per trade for prop-firm accounts
//! - `compounding`: balance path under a fixed risk fraction and expectancy
//! - `parse`: exact answers to percent questions and bounded arithmetic
//! - `task`: the closed [`MathTask`] enum and the [`MathEngine`] dispatcher
//!
//! # Outer layers
//!
//! - `server`: axum HTTP/JSON API
//! - `config`: YAML configuration with environment interpolation
//! - `observability`: `tracing` subscriber setup

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Compounding growth projection.
pub mod compounding;

/// Configuration loading and validation.
pub mod config;

/// Error types and API error codes.
pub mod error;

/// Fixed-point decimal arithmetic.
pub mod numeric;

/// Logging setup.
pub mod observability;

/// Percent and arithmetic question answering.
pub mod parse;

/// Prop-firm risk planning.
pub mod prop_firm;

/// HTTP/JSON server.
pub mod server;

/// Position sizing.
pub mod sizing;

/// Task dispatch.
pub mod task;

mod validation;

pub use compounding::{CompoundingPlanInput, CompoundingPlanResult, build_compounding_plan};
pub use error::{ErrorCode, MathError, ParseError};
pub use numeric::FixedDecimal;
pub use parse::{ParseOutcome, parse_math_question};
pub use prop_firm::{PropFirmPlanInput, PropFirmPlanResult, build_prop_firm_plan};
pub use sizing::{PositionSizeInput, PositionSizeResult, calculate_position_size};
pub use task::{EngineLimits, MathEngine, MathTask, MathTaskResult, run_math_task};
