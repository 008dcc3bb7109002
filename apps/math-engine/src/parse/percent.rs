//! Exact percent arithmetic.

use crate::error::MathError;
use crate::numeric::{DEFAULT_SCALE, FixedDecimal};

fn hundred() -> FixedDecimal {
    FixedDecimal::from_raw(100 * FixedDecimal::one(DEFAULT_SCALE).raw(), DEFAULT_SCALE)
}

/// `percent`% of `total`, computed as `percent × total / 100`.
///
/// # Example
///
/// ```
/// use math_engine::parse::percent_of;
///
/// assert_eq!(percent_of(33.3333, 9.0).unwrap().to_string(), "2.999997");
/// ```
pub fn percent_of(percent: f64, total: f64) -> Result<FixedDecimal, MathError> {
    percent_of_fixed(
        FixedDecimal::from_f64(percent, DEFAULT_SCALE)?,
        FixedDecimal::from_f64(total, DEFAULT_SCALE)?,
    )
}

/// [`percent_of`] on values that are already fixed-point.
pub fn percent_of_fixed(
    percent: FixedDecimal,
    total: FixedDecimal,
) -> Result<FixedDecimal, MathError> {
    percent.try_mul(total)?.try_div(hundred())
}

/// What percent `part` is of `whole`, computed as `part / whole × 100`.
///
/// # Errors
///
/// [`MathError::DivisionByZero`] when `whole` is zero.
pub fn what_percent_is(part: f64, whole: f64) -> Result<FixedDecimal, MathError> {
    what_percent_is_fixed(
        FixedDecimal::from_f64(part, DEFAULT_SCALE)?,
        FixedDecimal::from_f64(whole, DEFAULT_SCALE)?,
    )
}

/// [`what_percent_is`] on values that are already fixed-point.
pub fn what_percent_is_fixed(
    part: FixedDecimal,
    whole: FixedDecimal,
) -> Result<FixedDecimal, MathError> {
    if whole.is_zero() {
        return Err(MathError::DivisionByZero {
            context: "what_percent_is",
        });
    }
    part.try_div(whole)?.try_mul(hundred())
}
