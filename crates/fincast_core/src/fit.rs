//! Distribution fitting and ranking
//!
//! Every family in the requested catalog is fitted to the sample and scored
//! against a density-normalized histogram of it. The whole procedure is
//! deterministic: estimators are closed-form or fixed-grid searches, and the
//! ranking is a stable sort, so equal scores fall back to catalog order.

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::histogram::Histogram;
use crate::model::{
    DistributionCandidate, DistributionFamily, FitResult, FittedDistribution, ReturnSeries,
    SampleMoments,
};

fn default_bins() -> usize {
    100
}

fn default_min_observations() -> usize {
    30
}

/// Fitting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitConfig {
    /// Number of equal-width histogram bins the candidates are scored on
    #[serde(default = "default_bins")]
    pub bins: usize,

    /// Observations required before any fitting is attempted
    #[serde(default = "default_min_observations")]
    pub min_observations: usize,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            bins: default_bins(),
            min_observations: default_min_observations(),
        }
    }
}

impl FitConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_bins(&self, bins: usize) -> Self {
        let mut config = self.clone();
        config.bins = bins;
        config
    }

    #[must_use]
    pub fn with_min_observations(&self, min_observations: usize) -> Self {
        let mut config = self.clone();
        config.min_observations = min_observations;
        config
    }
}

/// Fit the given catalog to a return series with the default configuration.
pub fn fit_distributions(
    returns: &ReturnSeries,
    catalog: &[DistributionFamily],
) -> Result<FitResult, AnalysisError> {
    fit_distributions_with_config(returns, catalog, &FitConfig::default())
}

/// Fit candidates and rank them ascending by histogram SSE.
///
/// Families whose estimator rejects the sample, or whose score comes out
/// non-finite, are dropped from the ranking; the call fails only when every
/// candidate drops out.
pub fn fit_distributions_with_config(
    returns: &ReturnSeries,
    catalog: &[DistributionFamily],
    config: &FitConfig,
) -> Result<FitResult, AnalysisError> {
    let required = config.min_observations.max(2);
    if returns.len() < required {
        return Err(AnalysisError::InsufficientData {
            context: "distribution fitting",
            required,
            actual: returns.len(),
        });
    }

    let values: Vec<f64> = returns.values().collect();
    let insufficient = AnalysisError::InsufficientData {
        context: "distribution fitting",
        required,
        actual: returns.len(),
    };
    let moments = SampleMoments::from_values(&values).ok_or(insufficient.clone())?;
    let histogram = Histogram::from_values(&values, config.bins).ok_or(insufficient)?;

    let mut candidates: Vec<DistributionCandidate> = catalog
        .iter()
        .filter_map(|family| family.fit(&moments).ok())
        .map(|distribution| DistributionCandidate {
            sse: score(&distribution, &histogram),
            distribution,
        })
        .filter(|candidate| candidate.sse.is_finite())
        .collect();

    if candidates.is_empty() {
        return Err(AnalysisError::NoFitConverged {
            attempted: catalog.len(),
        });
    }
    // Stable sort keeps catalog order for equal scores
    candidates.sort_by(|a, b| a.sse.partial_cmp(&b.sse).unwrap_or(std::cmp::Ordering::Equal));

    Ok(FitResult {
        candidates,
        kind: returns.kind(),
        histogram,
    })
}

/// Sum of squared errors between the empirical bin densities and the fitted
/// density evaluated at the bin centers.
fn score(distribution: &FittedDistribution, histogram: &Histogram) -> f64 {
    histogram
        .centers()
        .iter()
        .zip(histogram.densities())
        .map(|(&center, &density)| {
            let diff = density - distribution.density(center);
            diff * diff
        })
        .sum()
}
