//! End-to-end scenarios and property tests for the math engine.
//!
//! Properties:
//! 1. Determinism: the same task always produces the same result
//! 2. Losing-streak monotonicity: a higher win rate never lengthens the streak
//! 3. Safe risk never exceeds the requested risk
//! 4. Zero-expectancy compounding leaves the balance unchanged

use proptest::prelude::*;
use rust_decimal_macros::dec;

use math_engine::compounding::CompoundingPlanInput;
use math_engine::parse::{evaluate_expression, percent_of, what_percent_is};
use math_engine::prop_firm::{PropFirmConfig, PropFirmPlanInput, estimate_losing_streak};
use math_engine::sizing::PositionSizeInput;
use math_engine::{
    FixedDecimal, MathEngine, MathError, MathTask, MathTaskResult, ParseOutcome, run_math_task,
};

fn prop_firm_input(risk: f64, winrate: f64, trades_per_day: i64) -> PropFirmPlanInput {
    PropFirmPlanInput {
        config: PropFirmConfig {
            account_size: 100_000.0,
            currency: "USD".to_string(),
            target_return_pct: 10.0,
            max_daily_drawdown_pct: 5.0,
            max_total_drawdown_pct: 10.0,
            min_trading_days: Some(4),
            phase: None,
        },
        risk_per_trade_pct: risk,
        expected_rr: 2.0,
        expected_winrate_pct: winrate,
        max_trades_per_day: trades_per_day,
    }
}

// ── Scenarios ────────────────────────────────────────────────────────

#[test]
fn test_prop_firm_challenge_scenario() {
    let task: MathTask = serde_json::from_value(serde_json::json!({
        "type": "prop-firm-plan",
        "input": {
            "config": {
                "accountSize": 100000,
                "currency": "USD",
                "targetReturnPct": 10,
                "maxDailyDrawdownPct": 5,
                "maxTotalDrawdownPct": 10,
                "phase": "challenge"
            },
            "riskPerTradePct": 2,
            "expectedRR": 2,
            "expectedWinratePct": 40,
            "maxTradesPerDay": 4
        }
    }))
    .unwrap();

    let MathTaskResult::PropFirmPlan(plan) = run_math_task(&task).unwrap() else {
        panic!("wrong result variant");
    };

    assert_eq!(plan.target_profit_amount, 10_000.0);
    assert_eq!(plan.daily_loss_limit_amount, 5_000.0);
    assert_eq!(plan.total_loss_limit_amount, 10_000.0);
    assert_eq!(plan.estimated_losing_streak, 6);
    assert_eq!(plan.max_risk_per_trade_pct_by_daily_rule, 1.25);
    assert!((plan.max_risk_per_trade_pct_by_total_rule - 1.666_666_66).abs() < 1e-8);
    assert_eq!(plan.safe_risk_per_trade_pct, 1.25);
    assert_eq!(plan.notes.len(), 9);
    assert!(plan.notes[0].contains("phase: challenge"));
}

#[test]
fn test_position_size_round_trip() {
    let task = MathTask::PositionSize(PositionSizeInput {
        account_size: 100_000.0,
        risk_percent: 1.0,
        stop_loss_distance: 50.0,
        value_per_unit: 10.0,
    });

    let MathTaskResult::PositionSize(result) = run_math_task(&task).unwrap() else {
        panic!("wrong result variant");
    };

    assert_eq!(result.risk_amount, 1000.0);
    assert_eq!(result.position_size, 2.0);
    assert_eq!(
        result.position_size * result.stop_loss_distance * result.value_per_unit,
        result.risk_amount
    );
}

#[test]
fn test_compounding_three_trades() {
    let task = MathTask::CompoundingPlan(CompoundingPlanInput {
        starting_balance: 10_000.0,
        risk_per_trade_pct: 1.0,
        expected_rr: 2.0,
        expected_winrate_pct: 45.0,
        number_of_trades: 3,
    });

    let MathTaskResult::CompoundingPlan(plan) = run_math_task(&task).unwrap() else {
        panic!("wrong result variant");
    };

    let balances: Vec<f64> = plan.steps.iter().map(|s| s.balance).collect();
    assert_eq!(balances, vec![10_035.0, 10_070.12, 10_105.37]);
    assert_eq!(plan.growth_factor_per_trade, 1.0035);
    assert_eq!(plan.ending_balance, 10_105.37);
}

#[test]
fn test_percent_answers_are_exact() {
    assert_eq!(percent_of(33.3333, 9.0).unwrap().to_string(), "2.999997");
    assert_eq!(
        percent_of(14.5, 0.7).unwrap().to_decimal(),
        Some(dec!(0.10150000))
    );
    assert_eq!(
        what_percent_is(5.0, 0.0),
        Err(MathError::DivisionByZero {
            context: "what_percent_is"
        })
    );
}

#[test]
fn test_unsafe_expression_is_never_executed() {
    assert!(matches!(
        evaluate_expression("2+alert(1)"),
        Err(MathError::Parse(_))
    ));

    let engine = MathEngine::default();
    assert_eq!(
        engine.parse_question("2+alert(1)").unwrap(),
        ParseOutcome::Declined
    );
}

#[test]
fn test_expression_is_exact() {
    let sum = evaluate_expression("0.1 + 0.2").unwrap();
    assert_eq!(sum, "0.3".parse::<FixedDecimal>().unwrap());
}

// ── Properties ───────────────────────────────────────────────────────

fn arb_position_input() -> impl Strategy<Value = PositionSizeInput> {
    (1.0..1e9_f64, 0.01..10.0_f64, 0.01..1e4_f64, 0.01..1e3_f64).prop_map(
        |(account_size, risk_percent, stop_loss_distance, value_per_unit)| PositionSizeInput {
            account_size,
            risk_percent,
            stop_loss_distance,
            value_per_unit,
        },
    )
}

fn arb_compounding_input() -> impl Strategy<Value = CompoundingPlanInput> {
    (100.0..1e6_f64, 0.1..5.0_f64, 0.5..5.0_f64, 1.0..99.0_f64, 1..200_i64).prop_map(
        |(starting_balance, risk_per_trade_pct, expected_rr, expected_winrate_pct, number_of_trades)| {
            CompoundingPlanInput {
                starting_balance,
                risk_per_trade_pct,
                expected_rr,
                expected_winrate_pct,
                number_of_trades,
            }
        },
    )
}

proptest! {
    /// Identical tasks produce identical results.
    #[test]
    fn deterministic_tasks(
        position in arb_position_input(),
        compounding in arb_compounding_input(),
        risk in 0.1..5.0_f64,
        winrate in 1.0..99.0_f64,
    ) {
        for task in [
            MathTask::PositionSize(position),
            MathTask::CompoundingPlan(compounding),
            MathTask::PropFirmPlan(prop_firm_input(risk, winrate, 3)),
        ] {
            prop_assert_eq!(run_math_task(&task), run_math_task(&task));
        }
    }

    /// A higher win rate never produces a longer losing streak.
    #[test]
    fn streak_is_monotonic(low in 0.0..100.0_f64, delta in 0.0..100.0_f64) {
        let high = (low + delta).min(100.0);
        prop_assert!(estimate_losing_streak(high) <= estimate_losing_streak(low));
        prop_assert!(estimate_losing_streak(low) >= 1);
    }

    /// The recommended risk never exceeds what was asked for.
    #[test]
    fn safe_risk_never_exceeds_requested(
        risk in 0.01..20.0_f64,
        winrate in 0.0..100.0_f64,
        trades_per_day in 1..50_i64,
    ) {
        let task = MathTask::PropFirmPlan(prop_firm_input(risk, winrate, trades_per_day));
        let Ok(MathTaskResult::PropFirmPlan(plan)) = run_math_task(&task) else {
            return Err(TestCaseError::fail("prop-firm plan failed"));
        };
        prop_assert!(plan.safe_risk_per_trade_pct <= risk);
        prop_assert!(plan.safe_risk_per_trade_pct <= plan.max_risk_per_trade_pct_by_daily_rule);
        prop_assert!(plan.safe_risk_per_trade_pct <= plan.max_risk_per_trade_pct_by_total_rule);
    }

    /// Zero expectancy (win rate exactly 1 / (1 + RR)) leaves every balance unchanged.
    #[test]
    fn zero_edge_compounding_is_flat(
        starting_balance in 100..1_000_000_u32,
        rr in prop::sample::select(vec![(1.0, 50.0), (3.0, 25.0), (4.0, 20.0)]),
        number_of_trades in 1..100_i64,
    ) {
        let (expected_rr, expected_winrate_pct) = rr;
        let task = MathTask::CompoundingPlan(CompoundingPlanInput {
            starting_balance: f64::from(starting_balance),
            risk_per_trade_pct: 1.0,
            expected_rr,
            expected_winrate_pct,
            number_of_trades,
        });
        let Ok(MathTaskResult::CompoundingPlan(plan)) = run_math_task(&task) else {
            return Err(TestCaseError::fail("compounding plan failed"));
        };
        prop_assert_eq!(plan.growth_factor_per_trade, 1.0);
        prop_assert!(plan.steps.iter().all(|s| s.balance == f64::from(starting_balance)));
    }
}
