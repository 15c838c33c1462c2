//! Percentile reduction of simulated path matrices

use crate::error::ConfigError;
use crate::model::{PathMatrix, PercentileBands};

/// Tolerance for floating-point percentile comparison
pub const PERCENTILE_TOLERANCE: f64 = 0.001;

/// Standard percentiles used when a caller has no preference
pub mod standard {
    /// The default band set: tails, quartiles, and the median.
    pub const DEFAULT: [f64; 9] = [1.0, 5.0, 10.0, 25.0, 50.0, 75.0, 90.0, 95.0, 99.0];
}

/// Merge extra levels into the standard set, sorted and deduplicated.
#[must_use]
pub fn merge_with_defaults(extra: &[f64]) -> Vec<f64> {
    let mut levels: Vec<f64> = standard::DEFAULT.to_vec();
    levels.extend_from_slice(extra);
    normalize_levels(&mut levels);
    levels
}

fn normalize_levels(levels: &mut Vec<f64>) {
    levels.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    levels.dedup_by(|a, b| (*a - *b).abs() < PERCENTILE_TOLERANCE);
}

/// Percentile of an ascending-sorted slice, linearly interpolated between
/// order statistics at rank = percentile / 100 * (n - 1).
#[must_use]
pub fn percentile_of_sorted(sorted: &[f64], percentile: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let rank = (percentile / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let weight = rank - lower as f64;
    sorted[lower] * (1.0 - weight) + sorted[upper] * weight
}

/// Reduce a path matrix to percentile bands over time.
///
/// Every requested level must lie strictly between 0 and 100; levels closer
/// than `PERCENTILE_TOLERANCE` are collapsed into one. The output carries
/// time steps ascending and levels ascending within each step.
pub fn aggregate_percentiles(
    paths: &PathMatrix,
    percentiles: &[f64],
) -> Result<PercentileBands, ConfigError> {
    if percentiles.is_empty() {
        return Err(ConfigError::EmptyPercentiles);
    }
    for &p in percentiles {
        if !(p.is_finite() && p > 0.0 && p < 100.0) {
            return Err(ConfigError::PercentileOutOfRange { percentile: p });
        }
    }
    let mut levels = percentiles.to_vec();
    normalize_levels(&mut levels);

    let mut bands = Vec::with_capacity(paths.columns());
    for step in 0..paths.columns() {
        let mut cross_section = paths.column(step);
        cross_section.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        bands.push(
            levels
                .iter()
                .map(|&p| percentile_of_sorted(&cross_section, p))
                .collect(),
        );
    }
    Ok(PercentileBands::new(levels, bands))
}
