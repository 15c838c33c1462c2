//! Price history loading
//!
//! The history file is a JSON array of dated closes:
//! `[{"date": "2024-01-02", "close": 187.15}, ...]`. Records must already be
//! sorted ascending by date; the loader validates rather than repairs.

use std::fmt;
use std::fs;
use std::path::Path;

use jiff::civil::Date;
use serde::Deserialize;

use fincast_core::error::SeriesError;
use fincast_core::model::{PricePoint, PriceSeries};

/// Failures at the price-history boundary
#[derive(Debug)]
pub enum HistoryError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Empty,
    Unsorted { index: usize },
    NonPositivePrice { index: usize, price: f64 },
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryError::Io(e) => write!(f, "could not read the history file: {e}"),
            HistoryError::Parse(e) => write!(f, "could not parse the history file: {e}"),
            HistoryError::Empty => write!(f, "the history file holds no observations"),
            HistoryError::Unsorted { index } => {
                write!(
                    f,
                    "history dates must be strictly increasing, violated at record {index}"
                )
            }
            HistoryError::NonPositivePrice { index, price } => {
                write!(
                    f,
                    "history price at record {index} must be positive, got {price}"
                )
            }
        }
    }
}

impl std::error::Error for HistoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HistoryError::Io(e) => Some(e),
            HistoryError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for HistoryError {
    fn from(err: std::io::Error) -> Self {
        HistoryError::Io(err)
    }
}

impl From<serde_json::Error> for HistoryError {
    fn from(err: serde_json::Error) -> Self {
        HistoryError::Parse(err)
    }
}

#[derive(Debug, Deserialize)]
struct HistoryRecord {
    date: Date,
    close: f64,
}

/// Load and validate a JSON price history.
pub fn load_history(path: &Path) -> Result<PriceSeries, HistoryError> {
    let raw = fs::read_to_string(path)?;
    let records: Vec<HistoryRecord> = serde_json::from_str(&raw)?;
    if records.is_empty() {
        return Err(HistoryError::Empty);
    }

    let points = records
        .into_iter()
        .map(|record| PricePoint {
            date: record.date,
            price: record.close,
        })
        .collect();
    PriceSeries::new(points).map_err(|err| match err {
        SeriesError::OutOfOrder { index } => HistoryError::Unsorted { index },
        SeriesError::NonPositivePrice { index, price } => {
            HistoryError::NonPositivePrice { index, price }
        }
    })
}
