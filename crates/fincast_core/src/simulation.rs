//! Forward Monte Carlo price-path simulation
//!
//! Paths are generated in batches so the work parallelizes without giving up
//! reproducibility: each batch gets its own RNG stream derived from the
//! master seed, and each run inside a batch gets a fresh seed from that
//! stream. The resulting matrix is byte-identical for a given seed no matter
//! how rayon schedules the batches.

use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{ConfigError, SimulationError};
use crate::model::{FittedDistribution, PathMatrix, ReturnKind, ReturnSampler};
use crate::percentiles::standard;

/// Trading days per calendar year; one simulation step models one trading day.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

fn default_horizon_years() -> f64 {
    5.0
}

fn default_runs() -> usize {
    5_000
}

fn default_initial_investment() -> f64 {
    10_000.0
}

fn default_percentiles() -> Vec<f64> {
    standard::DEFAULT.to_vec()
}

/// Simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Forward horizon in calendar years
    #[serde(default = "default_horizon_years")]
    pub horizon_years: f64,

    /// Number of independent price paths
    #[serde(default = "default_runs")]
    pub runs: usize,

    /// Notional invested at step zero, used for payoff reporting
    #[serde(default = "default_initial_investment")]
    pub initial_investment: f64,

    /// Percentile levels requested from downstream aggregation
    #[serde(default = "default_percentiles")]
    pub percentiles: Vec<f64>,

    /// How sampled returns advance a price along a path
    #[serde(default)]
    pub compounding: ReturnKind,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            horizon_years: default_horizon_years(),
            runs: default_runs(),
            initial_investment: default_initial_investment(),
            percentiles: default_percentiles(),
            compounding: ReturnKind::default(),
        }
    }
}

impl SimulationConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_horizon_years(&self, horizon_years: f64) -> Self {
        let mut config = self.clone();
        config.horizon_years = horizon_years;
        config
    }

    #[must_use]
    pub fn with_runs(&self, runs: usize) -> Self {
        let mut config = self.clone();
        config.runs = runs;
        config
    }

    #[must_use]
    pub fn with_initial_investment(&self, initial_investment: f64) -> Self {
        let mut config = self.clone();
        config.initial_investment = initial_investment;
        config
    }

    #[must_use]
    pub fn with_percentiles(&self, percentiles: Vec<f64>) -> Self {
        let mut config = self.clone();
        config.percentiles = percentiles;
        config
    }

    #[must_use]
    pub fn with_compounding(&self, compounding: ReturnKind) -> Self {
        let mut config = self.clone();
        config.compounding = compounding;
        config
    }

    /// Check the configuration before any simulation work starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.horizon_years.is_finite() || self.horizon_years <= 0.0 {
            return Err(ConfigError::NonPositiveHorizon {
                years: self.horizon_years,
            });
        }
        if self.runs == 0 {
            return Err(ConfigError::ZeroRuns);
        }
        if !self.initial_investment.is_finite() || self.initial_investment < 0.0 {
            return Err(ConfigError::NegativeInvestment {
                amount: self.initial_investment,
            });
        }
        for &percentile in &self.percentiles {
            if !percentile.is_finite() || percentile <= 0.0 || percentile >= 100.0 {
                return Err(ConfigError::PercentileOutOfRange { percentile });
            }
        }
        Ok(())
    }

    /// Number of simulated steps implied by the horizon, at least one.
    #[must_use]
    pub fn steps(&self) -> usize {
        (self.horizon_years * TRADING_DAYS_PER_YEAR).round().max(1.0) as usize
    }
}

/// Simulate forward price paths for one instrument.
///
/// Column 0 of the returned matrix holds `initial_price` for every run; each
/// subsequent column advances every path by one sampled return. `Some(seed)`
/// reproduces the exact matrix on every invocation; `None` draws a master
/// seed from OS entropy and is deterministic only from that point on.
pub fn simulate(
    distribution: &FittedDistribution,
    initial_price: f64,
    config: &SimulationConfig,
    seed: Option<u64>,
) -> Result<PathMatrix, SimulationError> {
    config.validate()?;
    if !initial_price.is_finite() || initial_price <= 0.0 {
        return Err(SimulationError::Config(ConfigError::NonPositivePrice {
            price: initial_price,
        }));
    }

    let steps = config.steps();
    let sampler = distribution.sampler()?;
    let master_seed = seed.unwrap_or_else(|| rand::rng().next_u64());
    let compounding = config.compounding;

    const MAX_BATCH_SIZE: usize = 100;
    let num_batches = config.runs.div_ceil(MAX_BATCH_SIZE);

    let walk_batch = |i: usize| {
        // One RNG stream per batch keeps run seeds independent of scheduling
        let mut rng = SmallRng::seed_from_u64(master_seed.wrapping_add(i as u64));

        let batch_size = if i == num_batches - 1 {
            config.runs - i * MAX_BATCH_SIZE
        } else {
            MAX_BATCH_SIZE
        };

        (0..batch_size)
            .map(|_| {
                let run_seed = rng.next_u64();
                let mut run_rng = SmallRng::seed_from_u64(run_seed);
                walk_path(&sampler, initial_price, steps, compounding, &mut run_rng)
            })
            .collect::<Vec<_>>()
    };

    #[cfg(feature = "parallel")]
    let rows: Vec<Vec<f64>> = (0..num_batches).into_par_iter().flat_map(walk_batch).collect();

    #[cfg(not(feature = "parallel"))]
    let rows: Vec<Vec<f64>> = (0..num_batches).flat_map(walk_batch).collect();

    Ok(PathMatrix::from_rows(rows))
}

fn walk_path<R: Rng>(
    sampler: &ReturnSampler,
    initial_price: f64,
    steps: usize,
    compounding: ReturnKind,
    rng: &mut R,
) -> Vec<f64> {
    let mut path = Vec::with_capacity(steps + 1);
    path.push(initial_price);
    let mut price = initial_price;
    for _ in 0..steps {
        let sampled = sampler.sample(rng);
        price = compounding.compound(price, sampled);
        path.push(price);
    }
    path
}
