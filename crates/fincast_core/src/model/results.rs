//! Fitter and simulator output types
//!
//! Contains the ranked fit result, the simulated path matrix, and the
//! percentile bands reduced from it. All of these are plain data, produced
//! once and never mutated.

use serde::{Deserialize, Serialize};

use crate::histogram::Histogram;
use crate::model::distribution::FittedDistribution;
use crate::model::series::ReturnKind;
use crate::percentiles::PERCENTILE_TOLERANCE;

/// One fitted candidate with its goodness-of-fit score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistributionCandidate {
    pub distribution: FittedDistribution,
    /// Sum of squared errors between the empirical histogram densities and
    /// the fitted density at the bin centers. Lower is better.
    pub sse: f64,
}

/// Ranked output of the distribution fitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    /// Candidates ascending by SSE; catalog order breaks ties.
    pub candidates: Vec<DistributionCandidate>,
    /// Return convention of the fitted sample. The simulator must compound
    /// with the same convention.
    pub kind: ReturnKind,
    /// The empirical histogram the candidates were scored against.
    pub histogram: Histogram,
}

impl FitResult {
    /// The best-scoring candidate.
    #[must_use]
    pub fn best(&self) -> Option<&DistributionCandidate> {
        self.candidates.first()
    }
}

/// Simulated price paths: one row per run, one column per time step.
///
/// Column 0 holds the initial price for every run, so a simulation of
/// `steps` steps produces `steps + 1` columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathMatrix {
    runs: usize,
    columns: usize,
    values: Vec<f64>,
}

impl PathMatrix {
    pub(crate) fn from_rows(rows: Vec<Vec<f64>>) -> Self {
        let runs = rows.len();
        let columns = rows.first().map_or(0, Vec::len);
        let mut values = Vec::with_capacity(runs * columns);
        for row in rows {
            values.extend_from_slice(&row);
        }
        Self {
            runs,
            columns,
            values,
        }
    }

    /// Number of simulation runs (rows).
    #[must_use]
    pub fn runs(&self) -> usize {
        self.runs
    }

    /// Number of time steps including the initial column.
    #[must_use]
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// One run's full price path.
    #[must_use]
    pub fn row(&self, run: usize) -> &[f64] {
        &self.values[run * self.columns..(run + 1) * self.columns]
    }

    /// Cross-section of all runs at one time step.
    #[must_use]
    pub fn column(&self, step: usize) -> Vec<f64> {
        (0..self.runs)
            .map(|run| self.values[run * self.columns + step])
            .collect()
    }

    #[must_use]
    pub fn value(&self, run: usize, step: usize) -> f64 {
        self.values[run * self.columns + step]
    }

    /// Iterate over run paths in row order.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks_exact(self.columns)
    }
}

/// Percentile summary of a path matrix over time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentileBands {
    /// Requested percentile levels, ascending, deduplicated.
    levels: Vec<f64>,
    /// `bands[step][i]` is the price at `levels[i]` for that time step.
    bands: Vec<Vec<f64>>,
}

impl PercentileBands {
    pub(crate) fn new(levels: Vec<f64>, bands: Vec<Vec<f64>>) -> Self {
        Self { levels, bands }
    }

    #[must_use]
    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    /// Number of time steps covered, including the initial column.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.bands.len()
    }

    /// Band values at one time step, ascending with the levels.
    #[must_use]
    pub fn at_step(&self, step: usize) -> &[f64] {
        &self.bands[step]
    }

    /// Band values at the final time step.
    #[must_use]
    pub fn final_step(&self) -> Option<&[f64]> {
        self.bands.last().map(Vec::as_slice)
    }

    /// The time series for one percentile level, if it was requested.
    #[must_use]
    pub fn series(&self, level: f64) -> Option<Vec<f64>> {
        let idx = self
            .levels
            .iter()
            .position(|l| (l - level).abs() < PERCENTILE_TOLERANCE)?;
        Some(self.bands.iter().map(|step| step[idx]).collect())
    }
}
