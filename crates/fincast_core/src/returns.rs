//! Multi-horizon return derivation
//!
//! Daily returns come straight from consecutive observations. Coarser
//! frequencies first resample the series to period-end prices (the last
//! observed price in each calendar month, quarter, or year; partial first
//! and last periods included) and then apply the same return formula between
//! consecutive period ends. Observations are stamped with the date of the
//! later period's last observation.

use jiff::civil::Date;

use crate::error::AnalysisError;
use crate::model::{Frequency, PricePoint, PriceSeries, ReturnKind, ReturnObservation, ReturnSeries};

/// Derive a return series from prices at the given frequency and convention.
///
/// Requires at least two price observations. A coarse frequency over a short
/// window can still produce an empty series (one period end, no pairs),
/// which is a valid outcome rather than an error.
pub fn compute_returns(
    prices: &PriceSeries,
    frequency: Frequency,
    kind: ReturnKind,
) -> Result<ReturnSeries, AnalysisError> {
    if prices.len() < 2 {
        return Err(AnalysisError::InsufficientData {
            context: "return derivation",
            required: 2,
            actual: prices.len(),
        });
    }
    let period_ends = resample_period_ends(prices, frequency);
    let observations = period_ends
        .windows(2)
        .map(|pair| ReturnObservation {
            date: pair[1].date,
            value: kind.between(pair[0].price, pair[1].price),
        })
        .collect();
    Ok(ReturnSeries::new(frequency, kind, observations))
}

/// Keep the last observation of each calendar period. At daily frequency
/// every observation is its own period, so the series passes through.
fn resample_period_ends<'a>(prices: &'a PriceSeries, frequency: Frequency) -> Vec<&'a PricePoint> {
    let mut ends: Vec<&PricePoint> = Vec::new();
    for point in prices.points() {
        let same_period = ends
            .last()
            .is_some_and(|last| in_same_period(last.date, point.date, frequency));
        if same_period {
            let last_idx = ends.len() - 1;
            ends[last_idx] = point;
        } else {
            ends.push(point);
        }
    }
    ends
}

fn in_same_period(a: Date, b: Date, frequency: Frequency) -> bool {
    match frequency {
        Frequency::Daily => a == b,
        Frequency::Monthly => a.year() == b.year() && a.month() == b.month(),
        Frequency::Quarterly => {
            a.year() == b.year() && (a.month() - 1) / 3 == (b.month() - 1) / 3
        }
        Frequency::Yearly => a.year() == b.year(),
    }
}
