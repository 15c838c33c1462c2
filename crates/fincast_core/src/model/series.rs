//! Price, return, and drawdown series types
//!
//! `PriceSeries` is the validated input to the whole pipeline; everything
//! downstream (returns, drawdowns, fitted distributions, simulated paths)
//! is derived from it and never mutates it.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::error::SeriesError;

/// A single dated price observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: Date,
    pub price: f64,
}

/// Ordered adjusted-price history for one instrument.
///
/// Dates are strictly increasing and every price is finite and positive;
/// both invariants are checked at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series from dated observations, validating order and sign.
    pub fn new(points: Vec<PricePoint>) -> Result<Self, SeriesError> {
        for (i, point) in points.iter().enumerate() {
            if !point.price.is_finite() || point.price <= 0.0 {
                return Err(SeriesError::NonPositivePrice {
                    index: i,
                    price: point.price,
                });
            }
            if i > 0 && point.date <= points[i - 1].date {
                return Err(SeriesError::OutOfOrder { index: i });
            }
        }
        Ok(Self { points })
    }

    /// Number of observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the series holds no observations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    #[must_use]
    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }
}

/// Calendar frequency at which returns are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    Daily,
    Monthly,
    Quarterly,
    Yearly,
}

impl Frequency {
    /// Every supported frequency, finest first.
    pub const ALL: [Frequency; 4] = [
        Frequency::Daily,
        Frequency::Monthly,
        Frequency::Quarterly,
        Frequency::Yearly,
    ];

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Yearly => "yearly",
        }
    }
}

/// Return convention used end to end through a pipeline run.
///
/// The fitter models whichever convention the return series carries, and the
/// simulator must compound with the matching rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReturnKind {
    /// Arithmetic returns: (p1 - p0) / p0, compounded as p * (1 + r).
    #[default]
    Simple,
    /// Logarithmic returns: ln(p1 / p0), compounded as p * exp(r).
    Log,
}

impl ReturnKind {
    /// Single-period return between two consecutive prices.
    #[must_use]
    pub fn between(&self, previous: f64, current: f64) -> f64 {
        match self {
            ReturnKind::Simple => (current - previous) / previous,
            ReturnKind::Log => (current / previous).ln(),
        }
    }

    /// Advance a price by one period's return.
    #[must_use]
    pub fn compound(&self, price: f64, ret: f64) -> f64 {
        match self {
            ReturnKind::Simple => price * (1.0 + ret),
            ReturnKind::Log => price * ret.exp(),
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            ReturnKind::Simple => "simple",
            ReturnKind::Log => "log",
        }
    }
}

/// One period's return, stamped with the period-end date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnObservation {
    pub date: Date,
    pub value: f64,
}

/// Derived return series at a fixed frequency and convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnSeries {
    frequency: Frequency,
    kind: ReturnKind,
    observations: Vec<ReturnObservation>,
}

impl ReturnSeries {
    pub(crate) fn new(
        frequency: Frequency,
        kind: ReturnKind,
        observations: Vec<ReturnObservation>,
    ) -> Self {
        Self {
            frequency,
            kind,
            observations,
        }
    }

    #[must_use]
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    #[must_use]
    pub fn kind(&self) -> ReturnKind {
        self.kind
    }

    #[must_use]
    pub fn observations(&self) -> &[ReturnObservation] {
        &self.observations
    }

    /// Return values without their dates, in series order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.observations.iter().map(|o| o.value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Compute basic statistics of the return series.
    pub fn statistics(&self) -> Option<ReturnStatistics> {
        if self.observations.is_empty() {
            return None;
        }
        let n = self.observations.len() as f64;
        let mean = self.values().sum::<f64>() / n;
        let variance = self.values().map(|r| (r - mean).powi(2)).sum::<f64>() / n;

        let min = self.values().fold(f64::INFINITY, f64::min);
        let max = self.values().fold(f64::NEG_INFINITY, f64::max);

        Some(ReturnStatistics {
            count: self.observations.len(),
            mean,
            std_dev: variance.sqrt(),
            min,
            max,
        })
    }
}

/// Basic statistics for a return series.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReturnStatistics {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

/// One observation of the running-peak scan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawdownPoint {
    pub date: Date,
    /// Highest price observed up to and including this date.
    pub peak: f64,
    /// (price - peak) / peak; zero at a fresh peak, negative below it.
    pub drawdown: f64,
}

/// Drawdown series with its worst point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawdownReport {
    pub points: Vec<DrawdownPoint>,
    /// Most negative drawdown fraction over the series (0 if never underwater).
    pub max_drawdown: f64,
    /// Date of the first observation reaching `max_drawdown`.
    pub max_drawdown_date: Date,
}
