//! Tests for return derivation
//!
//! These tests verify that:
//! - Daily simple and log returns match their closed-form values
//! - Coarser frequencies resample to the last observation of each period
//! - Partial first and last periods are included, not dropped
//! - Series statistics use the population convention
//! - Compounding derived returns recovers the original prices
//! - Short histories fail with a structured error

use jiff::ToSpan;
use jiff::civil::date;

use crate::error::AnalysisError;
use crate::model::{Frequency, PricePoint, PriceSeries, ReturnKind};
use crate::returns::compute_returns;

/// Build a daily series from consecutive closes starting 2024-01-02.
fn daily_series(prices: &[f64]) -> PriceSeries {
    let start = date(2024, 1, 2);
    let points = prices
        .iter()
        .enumerate()
        .map(|(i, &price)| PricePoint {
            date: start.checked_add((i as i64).days()).unwrap(),
            price,
        })
        .collect();
    PriceSeries::new(points).unwrap()
}

/// Test daily simple returns on a small hand-checked history
#[test]
fn test_daily_simple_returns() {
    let prices = daily_series(&[100.0, 102.0, 101.0, 105.0, 103.0]);
    let returns = compute_returns(&prices, Frequency::Daily, ReturnKind::Simple).unwrap();

    let expected = [
        0.02,
        -1.0 / 102.0,
        4.0 / 101.0,
        -2.0 / 105.0,
    ];
    assert_eq!(returns.len(), expected.len());
    for (got, want) in returns.values().zip(expected) {
        assert!(
            (got - want).abs() < 1e-12,
            "Expected {want:.6}, got {got:.6}"
        );
    }
}

/// Test that log returns are the natural log of the price ratio
#[test]
fn test_daily_log_returns() {
    let prices = daily_series(&[100.0, 102.0, 101.0]);
    let returns = compute_returns(&prices, Frequency::Daily, ReturnKind::Log).unwrap();

    let values: Vec<f64> = returns.values().collect();
    assert!((values[0] - (102.0_f64 / 100.0).ln()).abs() < 1e-12);
    assert!((values[1] - (101.0_f64 / 102.0).ln()).abs() < 1e-12);
    assert_eq!(returns.kind(), ReturnKind::Log);
    assert_eq!(returns.frequency(), Frequency::Daily);
}

/// Test that each return observation carries the later period's end date
#[test]
fn test_return_dates_are_period_ends() {
    let prices = daily_series(&[100.0, 102.0, 101.0]);
    let returns = compute_returns(&prices, Frequency::Daily, ReturnKind::Simple).unwrap();

    let dates: Vec<_> = returns.observations().iter().map(|o| o.date).collect();
    assert_eq!(dates, vec![date(2024, 1, 3), date(2024, 1, 4)]);
}

/// Test monthly resampling keeps the last observation of each month
#[test]
fn test_monthly_returns_resample_to_period_ends() {
    let points = vec![
        PricePoint { date: date(2024, 1, 2), price: 100.0 },
        PricePoint { date: date(2024, 1, 15), price: 105.0 },
        PricePoint { date: date(2024, 1, 31), price: 110.0 },
        PricePoint { date: date(2024, 2, 5), price: 108.0 },
        PricePoint { date: date(2024, 2, 27), price: 112.0 },
        PricePoint { date: date(2024, 3, 28), price: 120.0 },
    ];
    let prices = PriceSeries::new(points).unwrap();
    let returns = compute_returns(&prices, Frequency::Monthly, ReturnKind::Simple).unwrap();

    // Period ends: Jan 31 @ 110, Feb 27 @ 112, Mar 28 @ 120
    assert_eq!(returns.len(), 2);
    let observations = returns.observations();
    assert_eq!(observations[0].date, date(2024, 2, 27));
    assert!((observations[0].value - (112.0 / 110.0 - 1.0)).abs() < 1e-12);
    assert_eq!(observations[1].date, date(2024, 3, 28));
    assert!((observations[1].value - (120.0 / 112.0 - 1.0)).abs() < 1e-12);
}

/// Test quarterly resampling across a year boundary
#[test]
fn test_quarterly_returns_cross_year() {
    let points = vec![
        PricePoint { date: date(2023, 11, 14), price: 90.0 },
        PricePoint { date: date(2023, 12, 29), price: 100.0 },
        PricePoint { date: date(2024, 2, 9), price: 104.0 },
        PricePoint { date: date(2024, 3, 28), price: 110.0 },
        PricePoint { date: date(2024, 4, 1), price: 111.0 },
    ];
    let prices = PriceSeries::new(points).unwrap();
    let returns = compute_returns(&prices, Frequency::Quarterly, ReturnKind::Simple).unwrap();

    // Q4 2023 ends @ 100, Q1 2024 ends @ 110, Q2 2024 (partial) ends @ 111
    assert_eq!(returns.len(), 2);
    let observations = returns.observations();
    assert!((observations[0].value - 0.10).abs() < 1e-12);
    assert_eq!(observations[0].date, date(2024, 3, 28));
    assert!((observations[1].value - (111.0 / 110.0 - 1.0)).abs() < 1e-12);
    assert_eq!(observations[1].date, date(2024, 4, 1));
}

/// Test yearly resampling with partial first and last years
#[test]
fn test_yearly_returns_partial_periods() {
    let points = vec![
        PricePoint { date: date(2022, 10, 3), price: 80.0 },
        PricePoint { date: date(2022, 12, 30), price: 85.0 },
        PricePoint { date: date(2023, 6, 15), price: 95.0 },
        PricePoint { date: date(2023, 12, 29), price: 100.0 },
        PricePoint { date: date(2024, 3, 5), price: 104.0 },
    ];
    let prices = PriceSeries::new(points).unwrap();
    let returns = compute_returns(&prices, Frequency::Yearly, ReturnKind::Simple).unwrap();

    // 2022 ends @ 85, 2023 ends @ 100, 2024 (partial) ends @ 104
    assert_eq!(returns.len(), 2);
    let values: Vec<f64> = returns.values().collect();
    assert!((values[0] - (100.0 / 85.0 - 1.0)).abs() < 1e-12);
    assert!((values[1] - 0.04).abs() < 1e-12);
}

/// Test that one period end yields an empty series, not an error
#[test]
fn test_coarse_frequency_single_period_is_empty() {
    // Two observations, both inside January 2024
    let prices = daily_series(&[100.0, 101.0]);
    let returns = compute_returns(&prices, Frequency::Monthly, ReturnKind::Simple).unwrap();

    assert!(returns.is_empty());
    assert!(returns.statistics().is_none());
}

/// Test population statistics over a hand-checked sample
#[test]
fn test_return_statistics() {
    let prices = daily_series(&[100.0, 101.0, 103.02, 101.9898]);
    let returns = compute_returns(&prices, Frequency::Daily, ReturnKind::Simple).unwrap();
    let stats = returns.statistics().unwrap();

    // Returns are exactly [0.01, 0.02, -0.01]
    assert_eq!(stats.count, 3);
    let expected_mean = (0.01 + 0.02 - 0.01) / 3.0;
    assert!(
        (stats.mean - expected_mean).abs() < 1e-12,
        "Expected {expected_mean}, got {}",
        stats.mean
    );
    let expected_var = ((0.01 - expected_mean).powi(2)
        + (0.02 - expected_mean).powi(2)
        + (-0.01 - expected_mean).powi(2))
        / 3.0;
    assert!((stats.std_dev - expected_var.sqrt()).abs() < 1e-12);
    assert!((stats.min + 0.01).abs() < 1e-12);
    assert!((stats.max - 0.02).abs() < 1e-12);
}

/// Test that compounding derived returns walks back up the price history,
/// under both conventions
#[test]
fn test_compounding_derived_returns_recovers_prices() {
    let closes = [100.0, 102.0, 101.0, 105.0, 103.0, 99.5, 107.25];
    let prices = daily_series(&closes);

    for kind in [ReturnKind::Simple, ReturnKind::Log] {
        let returns = compute_returns(&prices, Frequency::Daily, kind).unwrap();
        let mut price = closes[0];
        for (observation, &expected) in returns.observations().iter().zip(&closes[1..]) {
            price = kind.compound(price, observation.value);
            assert!(
                (price - expected).abs() < 1e-9,
                "Expected {expected:.4}, got {price:.4}"
            );
        }
    }
}

/// Test that fewer than two observations is an error
#[test]
fn test_insufficient_history_is_rejected() {
    let prices = daily_series(&[100.0]);
    let err = compute_returns(&prices, Frequency::Daily, ReturnKind::Simple).unwrap_err();

    assert_eq!(
        err,
        AnalysisError::InsufficientData {
            context: "return derivation",
            required: 2,
            actual: 1,
        }
    );
}

/// Test that series construction rejects bad inputs
#[test]
fn test_price_series_validation() {
    let bad_price = PriceSeries::new(vec![
        PricePoint { date: date(2024, 1, 2), price: 100.0 },
        PricePoint { date: date(2024, 1, 3), price: 0.0 },
    ]);
    assert!(bad_price.is_err());

    let bad_order = PriceSeries::new(vec![
        PricePoint { date: date(2024, 1, 3), price: 100.0 },
        PricePoint { date: date(2024, 1, 2), price: 101.0 },
    ]);
    assert!(bad_order.is_err());

    // Duplicate dates are out of order too
    let duplicate = PriceSeries::new(vec![
        PricePoint { date: date(2024, 1, 2), price: 100.0 },
        PricePoint { date: date(2024, 1, 2), price: 101.0 },
    ]);
    assert!(duplicate.is_err());
}
