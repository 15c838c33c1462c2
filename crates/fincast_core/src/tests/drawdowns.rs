//! Tests for drawdown analysis
//!
//! These tests verify that:
//! - Running peaks never decrease and drawdowns are never positive
//! - The maximum drawdown is the most negative fraction, earliest on ties
//! - Monotone histories report exactly zero
//! - An empty series is a structured error

use jiff::ToSpan;
use jiff::civil::date;

use crate::drawdown::compute_drawdowns;
use crate::error::AnalysisError;
use crate::model::{PricePoint, PriceSeries};

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

/// Test the peak and drawdown sequence on a hand-checked history
#[test]
fn test_drawdown_sequence() {
    let prices = daily_series(&[100.0, 102.0, 101.0, 105.0, 103.0]);
    let report = compute_drawdowns(&prices).unwrap();

    let peaks: Vec<f64> = report.points.iter().map(|p| p.peak).collect();
    assert_eq!(peaks, vec![100.0, 102.0, 102.0, 105.0, 105.0]);

    let expected = [0.0, 0.0, -1.0 / 102.0, 0.0, -2.0 / 105.0];
    for (point, want) in report.points.iter().zip(expected) {
        assert!(
            (point.drawdown - want).abs() < 1e-12,
            "Expected {want:.6} at {}, got {:.6}",
            point.date,
            point.drawdown
        );
    }

    assert!((report.max_drawdown + 2.0 / 105.0).abs() < 1e-12);
    assert_eq!(report.max_drawdown_date, date(2024, 1, 6));
}

/// Test that drawdowns are non-positive and peaks non-decreasing
#[test]
fn test_drawdown_invariants() {
    let prices = daily_series(&[50.0, 48.0, 52.0, 47.0, 47.5, 60.0, 55.0, 58.0]);
    let report = compute_drawdowns(&prices).unwrap();

    let mut last_peak = f64::NEG_INFINITY;
    for point in &report.points {
        assert!(point.peak >= last_peak, "Peak decreased at {}", point.date);
        assert!(
            point.drawdown <= 0.0,
            "Positive drawdown at {}",
            point.date
        );
        last_peak = point.peak;
    }
}

/// Test that a monotone non-decreasing history reports zero
#[test]
fn test_monotone_history_has_zero_drawdown() {
    let prices = daily_series(&[100.0, 100.0, 101.0, 104.0, 104.0, 110.0]);
    let report = compute_drawdowns(&prices).unwrap();

    assert_eq!(report.max_drawdown, 0.0);
    assert_eq!(report.max_drawdown_date, date(2024, 1, 2));
    assert!(report.points.iter().all(|p| p.drawdown == 0.0));
}

/// Test that an equal drawdown later in the series keeps the earlier date
#[test]
fn test_tied_drawdowns_keep_earliest_date() {
    // Both troughs sit exactly 10% under a 100 peak
    let prices = daily_series(&[100.0, 90.0, 100.0, 90.0]);
    let report = compute_drawdowns(&prices).unwrap();

    assert!((report.max_drawdown + 0.10).abs() < 1e-12);
    assert_eq!(report.max_drawdown_date, date(2024, 1, 3));
}

/// Test that an empty series is rejected
#[test]
fn test_empty_series_is_rejected() {
    let prices = PriceSeries::new(vec![]).unwrap();
    let err = compute_drawdowns(&prices).unwrap_err();

    assert_eq!(
        err,
        AnalysisError::InsufficientData {
            context: "drawdown analysis",
            required: 1,
            actual: 0,
        }
    );
}

/// Test that a single observation reports a zero drawdown at its date
#[test]
fn test_single_observation() {
    let prices = daily_series(&[100.0]);
    let report = compute_drawdowns(&prices).unwrap();

    assert_eq!(report.points.len(), 1);
    assert_eq!(report.max_drawdown, 0.0);
    assert_eq!(report.max_drawdown_date, date(2024, 1, 2));
}
