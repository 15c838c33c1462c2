//! Tests for percentile band aggregation
//!
//! These tests verify that:
//! - Bands interpolate linearly between order statistics per time step
//! - Levels come back ascending and deduplicated
//! - Out-of-range and empty requests are rejected
//! - Band values are non-decreasing across levels and stay inside each
//!   step's cross-section range

use crate::error::ConfigError;
use crate::model::PathMatrix;
use crate::percentiles::{aggregate_percentiles, merge_with_defaults, standard};

/// A matrix whose step-1 cross-section is exactly 1..=100.
fn ladder_matrix() -> PathMatrix {
    let rows = (1..=100)
        .map(|i| vec![100.0, i as f64])
        .collect::<Vec<_>>();
    PathMatrix::from_rows(rows)
}

/// Test hand-checked percentiles of a known cross-section
#[test]
fn test_known_cross_section() {
    let paths = ladder_matrix();
    let bands = aggregate_percentiles(&paths, &[1.0, 25.0, 50.0, 99.0]).unwrap();

    assert_eq!(bands.steps(), 2);
    // Step 0 is the same initial price at every percentile
    assert!(bands.at_step(0).iter().all(|&v| v == 100.0));

    let step = bands.at_step(1);
    let expected = [1.99, 25.75, 50.5, 99.01];
    for (got, want) in step.iter().zip(expected) {
        assert!(
            (got - want).abs() < 1e-9,
            "Expected {want}, got {got}"
        );
    }
}

/// Test that levels are sorted and near-duplicates collapse
#[test]
fn test_levels_sorted_and_deduplicated() {
    let paths = ladder_matrix();
    let bands = aggregate_percentiles(&paths, &[90.0, 10.0, 50.0, 50.0005]).unwrap();

    assert_eq!(bands.levels(), &[10.0, 50.0, 90.0]);
}

/// Test that values never decrease as the level rises and never leave
/// the cross-section's range
#[test]
fn test_bands_monotone_within_step() {
    let paths = ladder_matrix();
    let bands =
        aggregate_percentiles(&paths, &standard::DEFAULT).unwrap();

    for step in 0..bands.steps() {
        let cross_section = paths.column(step);
        let lo = cross_section.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = cross_section
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);

        let values = bands.at_step(step);
        for pair in values.windows(2) {
            assert!(pair[0] <= pair[1], "Band values decreased within a step");
        }
        for &value in values {
            assert!(
                (lo..=hi).contains(&value),
                "Band value {value} outside cross-section range [{lo}, {hi}]"
            );
        }
    }
}

/// Test the per-level time series accessor
#[test]
fn test_series_accessor() {
    let paths = ladder_matrix();
    let bands = aggregate_percentiles(&paths, &[50.0]).unwrap();

    let median = bands.series(50.0).unwrap();
    assert_eq!(median, vec![100.0, 50.5]);
    assert!(bands.series(25.0).is_none());
}

/// Test that out-of-range levels are rejected
#[test]
fn test_out_of_range_levels() {
    let paths = ladder_matrix();

    for bad in [0.0, 100.0, -3.0, 104.0, f64::NAN] {
        let err = aggregate_percentiles(&paths, &[50.0, bad]).unwrap_err();
        assert!(
            matches!(err, ConfigError::PercentileOutOfRange { .. }),
            "Level {bad} should be rejected"
        );
    }
}

/// Test that an empty request is rejected rather than defaulted
#[test]
fn test_empty_request_rejected() {
    let paths = ladder_matrix();
    let err = aggregate_percentiles(&paths, &[]).unwrap_err();

    assert_eq!(err, ConfigError::EmptyPercentiles);
}

/// Test merging extra levels into the standard set
#[test]
fn test_merge_with_defaults() {
    let merged = merge_with_defaults(&[2.5, 97.5]);

    assert_eq!(merged.len(), standard::DEFAULT.len() + 2);
    assert!(merged.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(merged.contains(&2.5) && merged.contains(&97.5));
}
