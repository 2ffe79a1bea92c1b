//! Return alignment
//!
//! Turns independent per-asset price histories into one [`ReturnMatrix`]:
//! each series is converted to periodic percentage changes on its own dates,
//! then only the dates present in every asset's return series are kept
//! (inner join), in ascending order, with columns in input order.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, warn};

use crate::error::DataError;
use crate::model::{PriceSeries, ReturnMatrix};

/// Minimum cleaned observations per price series (one return needs two prices)
const MIN_POINTS: usize = 2;

pub fn align(series: &[PriceSeries]) -> Result<ReturnMatrix, DataError> {
    if series.is_empty() {
        return Err(DataError::NoAssets);
    }

    let mut seen = FxHashSet::default();
    for s in series {
        if !seen.insert(s.ticker()) {
            return Err(DataError::DuplicateTicker {
                ticker: s.ticker().to_string(),
            });
        }
        if s.len() < MIN_POINTS {
            return Err(DataError::insufficient(
                format!("price series {}", s.ticker()),
                MIN_POINTS,
                s.len(),
            ));
        }
    }

    let per_asset: Vec<Vec<_>> = series.iter().map(PriceSeries::returns).collect();
    let lookups: Vec<FxHashMap<_, f64>> = per_asset
        .iter()
        .map(|returns| returns.iter().copied().collect())
        .collect();

    // The first asset's return dates are already ascending; keep those shared by all
    let dates: Vec<_> = per_asset[0]
        .iter()
        .map(|(date, _)| *date)
        .filter(|date| lookups[1..].iter().all(|lookup| lookup.contains_key(date)))
        .collect();

    for (s, returns) in series.iter().zip(&per_asset) {
        let dropped = returns.len() - dates.len();
        if dropped > 0 {
            warn!(
                ticker = s.ticker(),
                dropped, "return dates not shared by every asset were dropped"
            );
        }
    }

    let columns: Vec<Vec<f64>> = lookups
        .iter()
        .map(|lookup| dates.iter().map(|date| lookup[date]).collect())
        .collect();

    let tickers = series.iter().map(|s| s.ticker().to_string()).collect();
    let matrix = ReturnMatrix::from_columns(tickers, dates, &columns)?;

    debug!(
        assets = matrix.num_assets(),
        rows = matrix.num_rows(),
        "aligned return matrix"
    );
    Ok(matrix)
}
