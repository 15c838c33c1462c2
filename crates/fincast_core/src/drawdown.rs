//! Running-peak drawdown analysis

use crate::error::AnalysisError;
use crate::model::{DrawdownPoint, DrawdownReport, PriceSeries};

/// Derive the running peak and drawdown at every observation.
///
/// The maximum drawdown is the most negative fraction over the series, with
/// ties resolved to the earliest occurrence. A monotonically non-decreasing
/// series reports exactly 0 at its first date.
pub fn compute_drawdowns(prices: &PriceSeries) -> Result<DrawdownReport, AnalysisError> {
    let Some(first) = prices.first() else {
        return Err(AnalysisError::InsufficientData {
            context: "drawdown analysis",
            required: 1,
            actual: 0,
        });
    };

    let mut points = Vec::with_capacity(prices.len());
    let mut peak = f64::NEG_INFINITY;
    let mut max_drawdown = 0.0;
    let mut max_drawdown_date = first.date;
    for point in prices.points() {
        peak = peak.max(point.price);
        let drawdown = (point.price - peak) / peak;
        if drawdown < max_drawdown {
            max_drawdown = drawdown;
            max_drawdown_date = point.date;
        }
        points.push(DrawdownPoint {
            date: point.date,
            peak,
            drawdown,
        });
    }

    Ok(DrawdownReport {
        points,
        max_drawdown,
        max_drawdown_date,
    })
}
