//! Density-normalized histograms for goodness-of-fit scoring

use serde::{Deserialize, Serialize};

/// Equal-width histogram over a sample, normalized so the bin areas sum to 1.
///
/// Fitted densities are compared against `densities()` at `centers()`; the
/// maximum value falls in the last bin rather than spilling past it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    edges: Vec<f64>,
    centers: Vec<f64>,
    densities: Vec<f64>,
}

impl Histogram {
    /// Bin a sample into `bins` equal-width buckets spanning its range.
    ///
    /// Returns None for an empty sample. A zero-width range (all values
    /// identical) is widened slightly so the single occupied bin keeps a
    /// finite density.
    #[must_use]
    pub fn from_values(values: &[f64], bins: usize) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let bins = bins.max(1);
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let range = (max - min).max(f64::EPSILON * min.abs().max(1.0));
        let width = range / bins as f64;

        let mut counts = vec![0usize; bins];
        for &v in values {
            let idx = (((v - min) / width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }

        let n = values.len() as f64;
        let edges: Vec<f64> = (0..=bins).map(|i| min + i as f64 * width).collect();
        let centers: Vec<f64> = (0..bins).map(|i| min + (i as f64 + 0.5) * width).collect();
        let densities: Vec<f64> = counts.iter().map(|&c| c as f64 / (n * width)).collect();

        Some(Self {
            edges,
            centers,
            densities,
        })
    }

    #[must_use]
    pub fn bins(&self) -> usize {
        self.centers.len()
    }

    /// Bin boundaries, `bins() + 1` of them, ascending.
    #[must_use]
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Bin midpoints, ascending.
    #[must_use]
    pub fn centers(&self) -> &[f64] {
        &self.centers
    }

    /// Per-bin density: count / (n * width).
    #[must_use]
    pub fn densities(&self) -> &[f64] {
        &self.densities
    }

    #[must_use]
    pub fn bin_width(&self) -> f64 {
        self.edges[1] - self.edges[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_area_is_one() {
        let values: Vec<f64> = (0..1000).map(|i| (i as f64 * 0.37).sin()).collect();
        let hist = Histogram::from_values(&values, 100).unwrap();

        let area: f64 = hist.densities().iter().map(|d| d * hist.bin_width()).sum();
        assert!((area - 1.0).abs() < 1e-9, "Expected area 1.0, got {area}");
    }

    #[test]
    fn test_histogram_max_lands_in_last_bin() {
        let values = [0.0, 0.25, 0.5, 0.75, 1.0];
        let hist = Histogram::from_values(&values, 4).unwrap();

        // 5 values over 4 bins of width 0.25; the max must not spill over
        let counts: Vec<f64> = hist
            .densities()
            .iter()
            .map(|d| d * values.len() as f64 * hist.bin_width())
            .collect();
        assert!((counts[3] - 2.0).abs() < 1e-9, "Expected 2 in last bin");
    }

    #[test]
    fn test_histogram_centers_between_edges() {
        let values = [1.0, 2.0, 3.0, 4.0];
        let hist = Histogram::from_values(&values, 3).unwrap();

        for i in 0..hist.bins() {
            let mid = (hist.edges()[i] + hist.edges()[i + 1]) / 2.0;
            assert!((hist.centers()[i] - mid).abs() < 1e-12);
        }
    }

    #[test]
    fn test_histogram_empty_sample() {
        assert!(Histogram::from_values(&[], 10).is_none());
    }

    #[test]
    fn test_histogram_degenerate_range() {
        let values = [0.5; 20];
        let hist = Histogram::from_values(&values, 10).unwrap();
        assert!(hist.densities().iter().all(|d| d.is_finite()));
    }
}
