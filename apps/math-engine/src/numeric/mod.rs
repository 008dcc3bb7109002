//! Exact numeric types.
//!
//! Floating point produces visibly wrong cents on chained percent operations,
//! so every percent and ratio path in the engine goes through
//! [`FixedDecimal`]. Single-multiply linear formulas (position sizing,
//! drawdown amounts) stay on `f64`.

mod fixed;

pub use fixed::{DEFAULT_SCALE, FixedDecimal, MAX_SCALE};
