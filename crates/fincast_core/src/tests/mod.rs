//! Integration tests for the forecasting engine
//!
//! Tests are organized by topic:
//! - `returns` - Return derivation across frequencies and conventions
//! - `drawdowns` - Running-peak drawdown analysis
//! - `fitting` - Distribution fitting and ranking
//! - `simulation` - Monte Carlo path generation and reproducibility
//! - `percentiles` - Percentile band aggregation
//! - `pipeline` - Full history-to-forecast flow

mod drawdowns;
mod percentiles;
mod returns;
