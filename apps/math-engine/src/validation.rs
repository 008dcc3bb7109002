//! Input validation shared by the calculators.

use crate::error::MathError;

/// Require a finite value strictly greater than zero.
pub(crate) fn require_positive(field: &'static str, value: f64) -> Result<f64, MathError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(MathError::not_positive(field, value))
    }
}

/// Require a finite value inside `[min, max]`.
pub(crate) fn require_within(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<f64, MathError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(MathError::InvalidInput {
            field,
            reason: format!("must be between {min} and {max}, got {value}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0.0 ; "zero")]
    #[test_case(-1.0 ; "negative")]
    #[test_case(f64::NAN ; "nan")]
    #[test_case(f64::INFINITY ; "infinite")]
    fn test_require_positive_rejects(value: f64) {
        let err = require_positive("accountSize", value).unwrap_err();
        assert!(matches!(err, MathError::InvalidInput { field: "accountSize", .. }));
    }

    #[test]
    fn test_require_positive_accepts() {
        assert_eq!(require_positive("x", 0.01).ok(), Some(0.01));
    }

    #[test]
    fn test_require_within() {
        assert!(require_within("pct", 100.0, 0.0, 100.0).is_ok());
        assert!(require_within("pct", 100.1, 0.0, 100.0).is_err());
    }
}
