//! Risk-based position sizing.

use crate::error::MathError;
use crate::validation::require_positive;

use super::types::{PositionSizeInput, PositionSizeResult};

/// Size a position so that hitting the stop loses `risk_percent` of the account.
///
/// `risk_amount = account_size * risk_percent / 100` and
/// `position_size = risk_amount / (stop_loss_distance * value_per_unit)`.
///
/// # Errors
///
/// Returns [`MathError::InvalidInput`] naming the first field that is not a
/// finite number greater than zero.
pub fn calculate_position_size(input: &PositionSizeInput) -> Result<PositionSizeResult, MathError> {
    let account_size = require_positive("accountSize", input.account_size)?;
    let risk_percent = require_positive("riskPercent", input.risk_percent)?;
    let stop_loss_distance = require_positive("stopLossDistance", input.stop_loss_distance)?;
    let value_per_unit = require_positive("valuePerUnit", input.value_per_unit)?;

    let risk_amount = account_size * risk_percent / 100.0;
    let position_size = risk_amount / (stop_loss_distance * value_per_unit);

    Ok(PositionSizeResult {
        risk_amount,
        position_size,
        risk_percent,
        stop_loss_distance,
        value_per_unit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn default_input() -> PositionSizeInput {
        PositionSizeInput {
            account_size: 100_000.0,
            risk_percent: 1.0,
            stop_loss_distance: 50.0,
            value_per_unit: 10.0,
        }
    }

    #[test]
    fn test_basic_sizing() {
        let result = calculate_position_size(&default_input()).unwrap();

        assert_eq!(result.risk_amount, 1000.0);
        assert_eq!(result.position_size, 2.0);
        assert_eq!(result.risk_percent, 1.0);
        assert_eq!(result.stop_loss_distance, 50.0);
        assert_eq!(result.value_per_unit, 10.0);
    }

    #[test]
    fn test_forex_lot_sizing() {
        // 10k account, 2% risk, 25 pip stop, $10 per pip per standard lot
        let input = PositionSizeInput {
            account_size: 10_000.0,
            risk_percent: 2.0,
            stop_loss_distance: 25.0,
            value_per_unit: 10.0,
        };

        let result = calculate_position_size(&input).unwrap();
        assert_eq!(result.risk_amount, 200.0);
        assert!((result.position_size - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_tighter_stop_means_bigger_size() {
        let wide = calculate_position_size(&default_input()).unwrap();
        let mut input = default_input();
        input.stop_loss_distance = 25.0;
        let tight = calculate_position_size(&input).unwrap();

        assert_eq!(tight.risk_amount, wide.risk_amount);
        assert!(tight.position_size > wide.position_size);
    }

    #[test_case("accountSize", |i: &mut PositionSizeInput| { i.account_size = 0.0; } ; "account_size")]
    #[test_case("riskPercent", |i: &mut PositionSizeInput| { i.risk_percent = -1.0; } ; "risk_percent")]
    #[test_case("stopLossDistance", |i: &mut PositionSizeInput| { i.stop_loss_distance = 0.0; } ; "stop_loss_distance")]
    #[test_case("valuePerUnit", |i: &mut PositionSizeInput| { i.value_per_unit = f64::NAN; } ; "value_per_unit")]
    fn test_invalid_field_is_named(expected: &str, mutate: fn(&mut PositionSizeInput)) {
        let mut input = default_input();
        mutate(&mut input);

        match calculate_position_size(&input) {
            Err(MathError::InvalidInput { field, .. }) => assert_eq!(field, expected),
            other => panic!("expected InvalidInput for {expected}, got {other:?}"),
        }
    }

    #[test]
    fn test_first_invalid_field_wins() {
        let input = PositionSizeInput {
            account_size: 0.0,
            risk_percent: 0.0,
            stop_loss_distance: 0.0,
            value_per_unit: 0.0,
        };

        let Err(MathError::InvalidInput { field, .. }) = calculate_position_size(&input) else {
            panic!("expected InvalidInput");
        };
        assert_eq!(field, "accountSize");
    }

    #[test]
    fn test_deserializes_camel_case() {
        let json = r#"{"accountSize":5000,"riskPercent":0.5,"stopLossDistance":2.5,"valuePerUnit":1}"#;
        let input: PositionSizeInput = serde_json::from_str(json).unwrap();

        let result = calculate_position_size(&input).unwrap();
        assert_eq!(result.risk_amount, 25.0);
        assert_eq!(result.position_size, 10.0);
    }
}
