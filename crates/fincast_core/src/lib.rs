//! Price forecasting library
//!
//! This crate turns the price history of a single instrument into a forward
//! forecast. It supports:
//! - Return derivation at daily, monthly, quarterly, and yearly horizons,
//!   under the simple or log convention
//! - Drawdown analysis over the raw price history
//! - Fitting a catalog of eleven parametric distributions to daily returns,
//!   ranked by histogram goodness of fit
//! - Seeded Monte Carlo simulation of forward price paths
//! - Percentile band aggregation across the simulated paths
//!
//! # Pipeline
//!
//! The stages compose into a single flow from history to forecast:
//!
//! ```ignore
//! use fincast_core::model::{DistributionFamily, Frequency, PriceSeries, ReturnKind};
//! use fincast_core::{aggregate_percentiles, compute_returns, fit_distributions, simulate};
//! use fincast_core::simulation::SimulationConfig;
//!
//! let prices = PriceSeries::new(points)?;
//! let daily = compute_returns(&prices, Frequency::Daily, ReturnKind::Simple)?;
//! let fit = fit_distributions(&daily, &DistributionFamily::CATALOG)?;
//! let best = fit.best().ok_or("no candidate converged")?;
//!
//! let config = SimulationConfig::new().with_runs(10_000);
//! let paths = simulate(&best.distribution, last_close, &config, Some(42))?;
//! let bands = aggregate_percentiles(&paths, &config.percentiles)?;
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod drawdown;
pub mod error;
pub mod fit;
pub mod histogram;
pub mod percentiles;
pub mod returns;
pub mod simulation;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use drawdown::compute_drawdowns;
pub use fit::{FitConfig, fit_distributions, fit_distributions_with_config};
pub use percentiles::aggregate_percentiles;
pub use returns::compute_returns;
pub use simulation::{SimulationConfig, TRADING_DAYS_PER_YEAR, simulate};
