//! Forecast report assembly and rendering
//!
//! Gathers everything one pipeline run produced into a single serializable
//! report. `Display` renders the text tables; `--output json` serializes the
//! same struct instead.

use std::fmt;

use fincast_core::SimulationConfig;
use fincast_core::model::{
    DrawdownReport, FitResult, FittedDistribution, PercentileBands, PriceSeries, ReturnStatistics,
};
use jiff::civil::Date;
use serde::Serialize;

/// Everything the CLI prints for one forecast.
#[derive(Debug, Serialize)]
pub struct ForecastReport {
    pub instrument: InstrumentSummary,
    pub returns: Vec<FrequencyStatistics>,
    pub drawdown: DrawdownSummary,
    pub fit: FitSummary,
    pub simulation: SimulationSummary,
    pub bands: Vec<BandSummary>,
}

#[derive(Debug, Serialize)]
pub struct InstrumentSummary {
    pub observations: usize,
    pub first_date: Date,
    pub last_date: Date,
    pub last_close: f64,
}

impl InstrumentSummary {
    pub fn from_series(prices: &PriceSeries) -> Option<Self> {
        let first = prices.first()?;
        let last = prices.last()?;
        Some(Self {
            observations: prices.len(),
            first_date: first.date,
            last_date: last.date,
            last_close: last.price,
        })
    }
}

/// Return statistics for one derivation frequency. `statistics` is absent
/// when the history spans too few periods at that frequency.
#[derive(Debug, Serialize)]
pub struct FrequencyStatistics {
    pub frequency: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<ReturnStatistics>,
}

#[derive(Debug, Serialize)]
pub struct DrawdownSummary {
    pub max_drawdown: f64,
    pub max_drawdown_date: Date,
}

impl DrawdownSummary {
    pub fn from_report(report: &DrawdownReport) -> Self {
        Self {
            max_drawdown: report.max_drawdown,
            max_drawdown_date: report.max_drawdown_date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FitSummary {
    pub convention: &'static str,
    pub bins: usize,
    pub candidates: Vec<CandidateSummary>,
}

impl FitSummary {
    pub fn from_fit(fit: &FitResult) -> Self {
        let candidates = fit
            .candidates
            .iter()
            .enumerate()
            .map(|(i, candidate)| CandidateSummary {
                rank: i + 1,
                family: candidate.distribution.family().name(),
                sse: candidate.sse,
                parameters: candidate.distribution,
            })
            .collect();
        Self {
            convention: fit.kind.label(),
            bins: fit.histogram.bins(),
            candidates,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CandidateSummary {
    pub rank: usize,
    pub family: &'static str,
    pub sse: f64,
    pub parameters: FittedDistribution,
}

#[derive(Debug, Serialize)]
pub struct SimulationSummary {
    pub distribution: &'static str,
    pub convention: &'static str,
    pub horizon_years: f64,
    pub steps: usize,
    pub runs: usize,
    pub initial_investment: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl SimulationSummary {
    pub fn new(distribution: &'static str, config: &SimulationConfig, seed: Option<u64>) -> Self {
        Self {
            distribution,
            convention: config.compounding.label(),
            horizon_years: config.horizon_years,
            steps: config.steps(),
            runs: config.runs,
            initial_investment: config.initial_investment,
            seed,
        }
    }
}

/// One percentile's outcome at the horizon.
#[derive(Debug, Serialize)]
pub struct BandSummary {
    pub percentile: f64,
    pub final_price: f64,
    pub final_value: f64,
    pub total_return: f64,
}

impl BandSummary {
    fn new(percentile: f64, final_price: f64, last_close: f64, investment: f64) -> Self {
        Self {
            percentile,
            final_price,
            final_value: investment * final_price / last_close,
            total_return: final_price / last_close - 1.0,
        }
    }
}

/// Expand the final band cross-section into per-percentile outcomes.
pub fn band_summaries(
    bands: &PercentileBands,
    last_close: f64,
    investment: f64,
) -> Vec<BandSummary> {
    let finals = bands.final_step().unwrap_or(&[]);
    bands
        .levels()
        .iter()
        .zip(finals)
        .map(|(&percentile, &final_price)| {
            BandSummary::new(percentile, final_price, last_close, investment)
        })
        .collect()
}

impl fmt::Display for ForecastReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Instrument")?;
        writeln!(f, "  {:<16}{}", "Observations:", self.instrument.observations)?;
        writeln!(
            f,
            "  {:<16}{} to {}",
            "History:", self.instrument.first_date, self.instrument.last_date
        )?;
        writeln!(
            f,
            "  {:<16}{}",
            "Last close:",
            format_currency(self.instrument.last_close)
        )?;
        writeln!(f)?;

        writeln!(f, "Returns ({} convention)", self.fit.convention)?;
        writeln!(
            f,
            "  {:<10} {:>7} {:>10} {:>10} {:>10} {:>10}",
            "Frequency", "Count", "Mean", "Std dev", "Min", "Max"
        )?;
        for row in &self.returns {
            match &row.statistics {
                Some(s) => writeln!(
                    f,
                    "  {:<10} {:>7} {:>10.5} {:>10.5} {:>10.5} {:>10.5}",
                    row.frequency, s.count, s.mean, s.std_dev, s.min, s.max
                )?,
                None => writeln!(
                    f,
                    "  {:<10} {:>7} insufficient history",
                    row.frequency, "-"
                )?,
            }
        }
        writeln!(f)?;

        writeln!(f, "Drawdown")?;
        writeln!(
            f,
            "  {:<16}{} on {}",
            "Max drawdown:",
            format_percentage(self.drawdown.max_drawdown),
            self.drawdown.max_drawdown_date
        )?;
        writeln!(f)?;

        writeln!(f, "Distribution fit ({} bins)", self.fit.bins)?;
        writeln!(
            f,
            "  {:>4}  {:<20} {:>12}  {}",
            "Rank", "Family", "SSE", "Parameters"
        )?;
        for candidate in &self.fit.candidates {
            writeln!(
                f,
                "  {:>4}  {:<20} {:>12.6}  {}",
                candidate.rank,
                candidate.family,
                candidate.sse,
                params_summary(&candidate.parameters)
            )?;
        }
        writeln!(f)?;

        writeln!(f, "Simulation")?;
        writeln!(f, "  {:<16}{}", "Distribution:", self.simulation.distribution)?;
        writeln!(f, "  {:<16}{}", "Compounding:", self.simulation.convention)?;
        writeln!(
            f,
            "  {:<16}{} years ({} steps)",
            "Horizon:", self.simulation.horizon_years, self.simulation.steps
        )?;
        writeln!(f, "  {:<16}{}", "Runs:", self.simulation.runs)?;
        writeln!(
            f,
            "  {:<16}{}",
            "Investment:",
            format_currency(self.simulation.initial_investment)
        )?;
        if let Some(seed) = self.simulation.seed {
            writeln!(f, "  {:<16}{}", "Seed:", seed)?;
        }
        writeln!(f)?;

        writeln!(f, "Forecast at horizon")?;
        writeln!(
            f,
            "  {:>10} {:>14} {:>14} {:>14}",
            "Percentile", "Final price", "Final value", "Return"
        )?;
        for band in &self.bands {
            writeln!(
                f,
                "  {:>10} {:>14} {:>14} {:>14}",
                format!("p{}", band.percentile),
                format_currency(band.final_price),
                format_currency(band.final_value),
                format_percentage(band.total_return)
            )?;
        }
        Ok(())
    }
}

/// One-line parameter summary for a fitted distribution.
fn params_summary(parameters: &FittedDistribution) -> String {
    match parameters {
        FittedDistribution::Normal { mean, std_dev } => {
            format!("mean={mean:.5} std_dev={std_dev:.5}")
        }
        FittedDistribution::StudentT { mean, scale, df } => {
            format!("mean={mean:.5} scale={scale:.5} df={df:.2}")
        }
        FittedDistribution::LogNormal {
            location,
            mean,
            std_dev,
        } => format!("location={location:.5} mean={mean:.5} std_dev={std_dev:.5}"),
        FittedDistribution::GeneralizedNormal { mean, alpha, beta } => {
            format!("mean={mean:.5} alpha={alpha:.5} beta={beta:.2}")
        }
        FittedDistribution::Laplace { location, scale } => {
            format!("location={location:.5} scale={scale:.5}")
        }
        FittedDistribution::Exponential { location, scale } => {
            format!("location={location:.5} scale={scale:.5}")
        }
        FittedDistribution::Cauchy { location, scale } => {
            format!("location={location:.5} scale={scale:.5}")
        }
        FittedDistribution::SkewCauchy {
            shape,
            location,
            scale,
        } => format!("shape={shape:.3} location={location:.5} scale={scale:.5}"),
        FittedDistribution::SkewNormal {
            shape,
            location,
            scale,
        } => format!("shape={shape:.3} location={location:.5} scale={scale:.5}"),
        FittedDistribution::Gamma {
            location,
            shape,
            scale,
        } => format!("location={location:.5} shape={shape:.3} scale={scale:.5}"),
        FittedDistribution::Beta {
            location,
            scale,
            alpha,
            beta,
        } => format!("location={location:.5} scale={scale:.5} alpha={alpha:.3} beta={beta:.3}"),
    }
}

/// Format a currency value
fn format_currency(value: f64) -> String {
    // Round to whole cents first so carries propagate into the dollar part
    let total_cents = (value.abs() * 100.0).round() as i64;
    let dollars = total_cents / 100;
    let cents = total_cents % 100;

    // Add thousands separators
    let dollars_str = dollars.to_string();
    let mut result = String::new();
    for (i, c) in dollars_str.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    let dollars_formatted: String = result.chars().rev().collect();

    if value >= 0.0 {
        format!("${}.{:02}", dollars_formatted, cents)
    } else {
        format!("-${}.{:02}", dollars_formatted, cents)
    }
}

/// Format a percentage value
fn format_percentage(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(1234.56), "$1,234.56");
        assert_eq!(format_currency(-1234.5), "-$1,234.50");
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(0.999), "$1.00");
        assert_eq!(format_currency(1_000_000.0), "$1,000,000.00");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(0.1234), "12.34%");
        assert_eq!(format_percentage(-0.05), "-5.00%");
        assert_eq!(format_percentage(0.0), "0.00%");
    }

    #[test]
    fn test_params_summary() {
        let normal = FittedDistribution::Normal {
            mean: 0.0005,
            std_dev: 0.01,
        };
        assert_eq!(params_summary(&normal), "mean=0.00050 std_dev=0.01000");
    }

    #[test]
    fn test_band_summary_math() {
        let band = BandSummary::new(50.0, 120.0, 100.0, 10_000.0);
        assert!((band.final_value - 12_000.0).abs() < 1e-9);
        assert!((band.total_return - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_report_renders_every_section() {
        let report = ForecastReport {
            instrument: InstrumentSummary {
                observations: 504,
                first_date: jiff::civil::date(2022, 1, 3),
                last_date: jiff::civil::date(2023, 12, 29),
                last_close: 187.25,
            },
            returns: vec![
                FrequencyStatistics {
                    frequency: "daily",
                    statistics: Some(ReturnStatistics {
                        count: 503,
                        mean: 0.0004,
                        std_dev: 0.011,
                        min: -0.04,
                        max: 0.05,
                    }),
                },
                FrequencyStatistics {
                    frequency: "yearly",
                    statistics: None,
                },
            ],
            drawdown: DrawdownSummary {
                max_drawdown: -0.1234,
                max_drawdown_date: jiff::civil::date(2022, 6, 16),
            },
            fit: FitSummary {
                convention: "simple",
                bins: 100,
                candidates: vec![CandidateSummary {
                    rank: 1,
                    family: "Normal",
                    sse: 0.0123,
                    parameters: FittedDistribution::Normal {
                        mean: 0.0004,
                        std_dev: 0.011,
                    },
                }],
            },
            simulation: SimulationSummary {
                distribution: "Normal",
                convention: "simple",
                horizon_years: 5.0,
                steps: 1260,
                runs: 5000,
                initial_investment: 10_000.0,
                seed: Some(42),
            },
            bands: vec![BandSummary::new(50.0, 210.0, 187.25, 10_000.0)],
        };

        let text = report.to_string();
        assert!(text.contains("Instrument"));
        assert!(text.contains("Returns (simple convention)"));
        assert!(text.contains("insufficient history"));
        assert!(text.contains("-12.34% on 2022-06-16"));
        assert!(text.contains("Distribution fit (100 bins)"));
        assert!(text.contains("Seed:           42"));
        assert!(text.contains("Forecast at horizon"));
        assert!(text.contains("p50"));
    }
}
