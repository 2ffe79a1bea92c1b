//! Per-asset price history

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

/// Cleaned price history for one ticker.
///
/// Invariants: every price is finite and strictly positive, dates are
/// strictly increasing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawPriceSeries")]
pub struct PriceSeries {
    ticker: String,
    points: Vec<(Date, f64)>,
}

#[derive(Deserialize)]
struct RawPriceSeries {
    ticker: String,
    points: Vec<(Date, f64)>,
}

impl From<RawPriceSeries> for PriceSeries {
    fn from(raw: RawPriceSeries) -> Self {
        Self::new(raw.ticker, raw.points)
    }
}

impl PriceSeries {
    /// Build a series from raw observations.
    ///
    /// Non-finite and non-positive prices are dropped, points are sorted by
    /// date (stable) and duplicate dates keep their first occurrence.
    pub fn new(ticker: impl Into<String>, raw: impl IntoIterator<Item = (Date, f64)>) -> Self {
        let mut points: Vec<(Date, f64)> = raw
            .into_iter()
            .filter(|(_, price)| price.is_finite() && *price > 0.0)
            .collect();
        points.sort_by_key(|(date, _)| *date);
        points.dedup_by_key(|(date, _)| *date);

        Self {
            ticker: ticker.into(),
            points,
        }
    }

    #[must_use]
    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    #[must_use]
    pub fn points(&self) -> &[(Date, f64)] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> Option<Date> {
        self.points.first().map(|(d, _)| *d)
    }

    pub fn last_date(&self) -> Option<Date> {
        self.points.last().map(|(d, _)| *d)
    }

    /// Periodic percentage changes `p[t] / p[t-1] - 1`, keyed by the later date.
    /// The first observation has no return and is omitted.
    #[must_use]
    pub fn returns(&self) -> Vec<(Date, f64)> {
        self.points
            .windows(2)
            .map(|w| (w[1].0, w[1].1 / w[0].1 - 1.0))
            .collect()
    }
}
