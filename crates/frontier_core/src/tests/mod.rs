//! Scenario tests for the frontier pipeline
//!
//! Tests are organized by topic:
//! - `end_to_end` - Two-asset run from prices to optimal portfolios
//! - `degenerate` - Zero-variance assets and the single-asset boundary
//! - `determinism` - Seeded reproducibility and alignment idempotence
//! - `files` - CSV files on disk through ingest, analysis and export


use jiff::civil::{Date, date};

use crate::model::PriceSeries;

/// Consecutive calendar days starting 2024-01-01
pub(crate) fn dates(n: usize) -> Vec<Date> {
    (0..n)
        .map(|i| date(2024, 1, 1).saturating_add(jiff::Span::new().days(i as i64)))
        .collect()
}

/// Price series starting at 100 that produces exactly `returns` (up to rounding)
pub(crate) fn series_from_returns(ticker: &str, returns: &[f64]) -> PriceSeries {
    let mut price = 100.0;
    let mut prices = vec![price];
    for r in returns {
        price *= 1.0 + r;
        prices.push(price);
    }
    PriceSeries::new(ticker, dates(prices.len()).into_iter().zip(prices))
}
