use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{WrapErr, eyre};
use fincast_core::model::{DistributionFamily, Frequency, ReturnKind};
use fincast_core::{
    SimulationConfig, aggregate_percentiles, compute_drawdowns, compute_returns, fit_distributions,
    percentiles, simulate,
};

mod history;
mod logging;
mod report;

use report::{
    DrawdownSummary, FitSummary, ForecastReport, FrequencyStatistics, InstrumentSummary,
    SimulationSummary, band_summaries,
};

#[derive(Parser, Debug)]
#[command(name = "fincast")]
#[command(about = "Fit return distributions to a price history and forecast forward price bands")]
struct Args {
    /// Path to the price history JSON file, an array of {date, close} records
    history: PathBuf,

    /// Forward horizon in years (default: 5)
    #[arg(long, default_value_t = 5.0)]
    horizon: f64,

    /// Number of simulated price paths (default: 5000)
    #[arg(long, default_value_t = 5_000)]
    runs: usize,

    /// Notional investment used for payoff reporting (default: 10000)
    #[arg(long, default_value_t = 10_000.0)]
    investment: f64,

    /// Extra percentile level to report on top of the standard set, may be repeated
    #[arg(long = "percentile", value_name = "LEVEL")]
    percentiles: Vec<f64>,

    /// Master seed; reruns with the same seed reproduce the forecast exactly
    #[arg(long)]
    seed: Option<u64>,

    /// Model log returns instead of simple returns
    #[arg(long)]
    log_returns: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    output: OutputFormat,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    logging::init_logging(&args.log_level)?;

    run(&args)
}

fn run(args: &Args) -> color_eyre::Result<()> {
    let prices = history::load_history(&args.history)
        .wrap_err_with(|| format!("failed to load {}", args.history.display()))?;
    let instrument = InstrumentSummary::from_series(&prices)
        .ok_or_else(|| eyre!("price history is empty"))?;
    let last_close = instrument.last_close;
    tracing::info!(
        observations = instrument.observations,
        last_close = last_close,
        "Loaded price history"
    );

    let kind = if args.log_returns {
        ReturnKind::Log
    } else {
        ReturnKind::Simple
    };

    let daily = compute_returns(&prices, Frequency::Daily, kind)?;
    let mut frequency_stats = vec![FrequencyStatistics {
        frequency: Frequency::Daily.label(),
        statistics: daily.statistics(),
    }];
    for frequency in [Frequency::Monthly, Frequency::Quarterly, Frequency::Yearly] {
        let series = compute_returns(&prices, frequency, kind)?;
        frequency_stats.push(FrequencyStatistics {
            frequency: frequency.label(),
            statistics: series.statistics(),
        });
    }

    let drawdowns = compute_drawdowns(&prices)?;

    let fit = fit_distributions(&daily, &DistributionFamily::CATALOG)?;
    let best = fit
        .best()
        .ok_or_else(|| eyre!("no distribution could be fitted to the daily returns"))?;
    tracing::info!(
        family = best.distribution.family().name(),
        sse = best.sse,
        "Fitted distribution catalog"
    );

    let config = SimulationConfig::new()
        .with_horizon_years(args.horizon)
        .with_runs(args.runs)
        .with_initial_investment(args.investment)
        .with_percentiles(percentiles::merge_with_defaults(&args.percentiles))
        .with_compounding(fit.kind);

    tracing::info!(
        runs = config.runs,
        steps = config.steps(),
        seed = ?args.seed,
        "Starting Monte Carlo simulation"
    );
    let paths = simulate(&best.distribution, last_close, &config, args.seed)?;

    let bands = aggregate_percentiles(&paths, &config.percentiles)?;

    let result = ForecastReport {
        instrument,
        returns: frequency_stats,
        drawdown: DrawdownSummary::from_report(&drawdowns),
        fit: FitSummary::from_fit(&fit),
        simulation: SimulationSummary::new(best.distribution.family().name(), &config, args.seed),
        bands: band_summaries(&bands, last_close, config.initial_investment),
    };

    match args.output {
        OutputFormat::Text => println!("{result}"),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }

    Ok(())
}
