//! Scaled-integer decimal used for every percent and ratio computation.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Neg;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Serialize, Serializer};

use crate::error::MathError;

/// Default number of fractional digits.
pub const DEFAULT_SCALE: u32 = 8;

/// Largest supported scale. Keeps `10^scale` and its square inside `i128`.
pub const MAX_SCALE: u32 = 18;

/// A decimal stored as `raw / 10^scale`.
///
/// Values of different scale never mix: `try_add`, `try_sub`, `try_mul` and
/// `try_div` panic when the scales differ, since that can only come from a
/// programming error and never from user data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedDecimal {
    raw: i128,
    scale: u32,
}

const fn pow10(exp: u32) -> i128 {
    10_i128.pow(exp)
}

impl FixedDecimal {
    /// Zero at the given scale.
    #[must_use]
    pub fn zero(scale: u32) -> Self {
        Self::from_raw(0, scale)
    }

    /// One at the given scale.
    #[must_use]
    pub fn one(scale: u32) -> Self {
        Self::from_raw(pow10(scale), scale)
    }

    /// Build from an already-scaled integer.
    #[must_use]
    pub fn from_raw(raw: i128, scale: u32) -> Self {
        assert!(
            scale <= MAX_SCALE,
            "fixed-point scale {scale} exceeds maximum {MAX_SCALE}"
        );
        Self { raw, scale }
    }

    /// Build from an integer.
    pub fn from_int(value: i64, scale: u32) -> Result<Self, MathError> {
        i128::from(value)
            .checked_mul(pow10(scale))
            .map(|raw| Self::from_raw(raw, scale))
            .ok_or(MathError::Overflow {
                operation: "from_int",
            })
    }

    /// Build from a float.
    ///
    /// Non-finite input becomes zero. The float's shortest round-trip decimal
    /// form is used, so `0.7` is read as exactly `0.7` rather than its binary
    /// approximation.
    pub fn from_f64(value: f64, scale: u32) -> Result<Self, MathError> {
        if !value.is_finite() {
            return Ok(Self::zero(scale));
        }
        let decimal = Decimal::from_str(&value.to_string()).map_err(|_| MathError::Overflow {
            operation: "from_f64",
        })?;
        Self::from_decimal(decimal, scale)
    }

    /// Build from text the way the chat layer coerces numbers: commas and
    /// surrounding whitespace are stripped and anything unparsable is zero.
    #[must_use]
    pub fn from_str_lossy(text: &str, scale: u32) -> Self {
        let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
        parse_decimal(&cleaned)
            .and_then(|d| Self::from_decimal(d, scale).ok())
            .unwrap_or_else(|| Self::zero(scale))
    }

    /// Build from a `Decimal`, rounding half away from zero to `scale` digits.
    pub fn from_decimal(value: Decimal, scale: u32) -> Result<Self, MathError> {
        let rounded = value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
        let shift = scale.saturating_sub(rounded.scale());
        rounded
            .mantissa()
            .checked_mul(pow10(shift))
            .map(|raw| Self::from_raw(raw, scale))
            .ok_or(MathError::Overflow {
                operation: "from_decimal",
            })
    }

    /// Underlying scaled integer.
    #[must_use]
    pub const fn raw(&self) -> i128 {
        self.raw
    }

    /// Number of fractional digits.
    #[must_use]
    pub const fn scale(&self) -> u32 {
        self.scale
    }

    /// Whether the value is exactly zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.raw == 0
    }

    /// Whether the value is below zero.
    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.raw < 0
    }

    fn assert_same_scale(&self, other: &Self, op: &str) {
        assert!(
            self.scale == other.scale,
            "cannot {op} fixed-point values of scale {} and {}",
            self.scale,
            other.scale
        );
    }

    /// `self + rhs`.
    pub fn try_add(self, rhs: Self) -> Result<Self, MathError> {
        self.assert_same_scale(&rhs, "add");
        self.raw
            .checked_add(rhs.raw)
            .map(|raw| Self::from_raw(raw, self.scale))
            .ok_or(MathError::Overflow { operation: "add" })
    }

    /// `self - rhs`.
    pub fn try_sub(self, rhs: Self) -> Result<Self, MathError> {
        self.assert_same_scale(&rhs, "subtract");
        self.raw
            .checked_sub(rhs.raw)
            .map(|raw| Self::from_raw(raw, self.scale))
            .ok_or(MathError::Overflow {
                operation: "subtract",
            })
    }

    /// `self * rhs`, truncated toward zero onto the scale grid.
    pub fn try_mul(self, rhs: Self) -> Result<Self, MathError> {
        self.assert_same_scale(&rhs, "multiply");
        let unit = pow10(self.scale);
        // a*b/unit == (a/unit)*b + (a%unit)*b/unit; both terms share a's sign
        // so truncation matches the single division without the i128 blowup.
        let whole = (self.raw / unit).checked_mul(rhs.raw);
        let frac = (self.raw % unit).checked_mul(rhs.raw).map(|p| p / unit);
        whole
            .zip(frac)
            .and_then(|(w, f)| w.checked_add(f))
            .map(|raw| Self::from_raw(raw, self.scale))
            .ok_or(MathError::Overflow {
                operation: "multiply",
            })
    }

    /// `self / rhs`, truncated toward zero onto the scale grid.
    pub fn try_div(self, rhs: Self) -> Result<Self, MathError> {
        self.assert_same_scale(&rhs, "divide");
        if rhs.raw == 0 {
            return Err(MathError::DivisionByZero {
                context: "fixed-point division",
            });
        }
        self.raw
            .checked_mul(pow10(self.scale))
            .map(|scaled| Self::from_raw(scaled / rhs.raw, self.scale))
            .ok_or(MathError::Overflow {
                operation: "divide",
            })
    }

    /// Round to `digits` fractional digits, half away from zero, keeping the scale.
    #[must_use]
    pub fn round_dp(self, digits: u32) -> Self {
        if digits >= self.scale {
            return self;
        }
        let step = pow10(self.scale - digits);
        let mut quotient = self.raw / step;
        let remainder = self.raw % step;
        if remainder.abs() * 2 >= step {
            quotient += self.raw.signum();
        }
        Self::from_raw(quotient * step, self.scale)
    }

    /// Exact `Decimal` form, when it fits in 96 bits.
    #[must_use]
    pub fn to_decimal(&self) -> Option<Decimal> {
        Decimal::try_from_i128_with_scale(self.raw, self.scale).ok()
    }

    /// Nearest float, for display and JSON output.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.to_decimal()
            .and_then(|d| d.to_string().parse::<f64>().ok())
            .unwrap_or_else(|| self.raw as f64 / pow10(self.scale) as f64)
    }

    /// Format with exactly `digits` fractional digits, rounding half away from zero.
    #[must_use]
    pub fn to_fixed(&self, digits: u32) -> String {
        let rounded = self.round_dp(digits);
        let unit = pow10(rounded.scale);
        let sign = if rounded.raw < 0 { "-" } else { "" };
        let magnitude = rounded.raw.unsigned_abs();
        let whole = magnitude / unit.unsigned_abs();
        if digits == 0 {
            return format!("{sign}{whole}");
        }
        let frac = magnitude % unit.unsigned_abs();
        let frac_digits = format!("{frac:0width$}", width = rounded.scale as usize);
        let mut shown: String = frac_digits.chars().take(digits as usize).collect();
        while shown.len() < digits as usize {
            shown.push('0');
        }
        format!("{sign}{whole}.{shown}")
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    if text.is_empty() {
        return Some(Decimal::ZERO);
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

impl PartialOrd for FixedDecimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        (self.scale == other.scale).then(|| self.raw.cmp(&other.raw))
    }
}

impl Neg for FixedDecimal {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            raw: -self.raw,
            scale: self.scale,
        }
    }
}

impl fmt::Display for FixedDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.to_fixed(self.scale);
        let trimmed = if text.contains('.') {
            text.trim_end_matches('0').trim_end_matches('.')
        } else {
            text.as_str()
        };
        write!(f, "{trimmed}")
    }
}

/// Serialized as its exact decimal text, like `rust_decimal` with `serde-with-str`.
impl Serialize for FixedDecimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Strict parse at [`DEFAULT_SCALE`]; commas are allowed, anything else
/// non-numeric is rejected.
impl FromStr for FixedDecimal {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
        let decimal = Decimal::from_str(&cleaned).map_err(|e| MathError::InvalidInput {
            field: "value",
            reason: format!("'{s}' is not a number: {e}"),
        })?;
        Self::from_decimal(decimal, DEFAULT_SCALE)
    }
}
