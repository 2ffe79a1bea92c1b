//! Aligned multi-asset return table

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// Minimum number of aligned rows needed for a sample covariance estimate
pub const MIN_ROWS: usize = 2;

/// Periodic returns for several assets on a shared, ascending date index.
///
/// Stored row-major: `values[row * num_assets + asset]`. Every column has a
/// value on every row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawReturnMatrix")]
pub struct ReturnMatrix {
    tickers: Vec<String>,
    dates: Vec<Date>,
    values: Vec<f64>,
}

/// Serialized layout of [`ReturnMatrix`]; checked on the way in
#[derive(Deserialize)]
struct RawReturnMatrix {
    tickers: Vec<String>,
    dates: Vec<Date>,
    values: Vec<f64>,
}

impl TryFrom<RawReturnMatrix> for ReturnMatrix {
    type Error = DataError;

    fn try_from(raw: RawReturnMatrix) -> Result<Self, Self::Error> {
        let n = raw.tickers.len().max(1);
        // A buffer that is not a multiple of the asset count leaves ragged columns
        let columns: Vec<Vec<f64>> = (0..raw.tickers.len())
            .map(|asset| raw.values.iter().skip(asset).step_by(n).copied().collect())
            .collect();
        Self::from_columns(raw.tickers, raw.dates, &columns)
    }
}

impl ReturnMatrix {
    /// Build a matrix from one return column per ticker.
    ///
    /// Fails if there are no tickers, a column's length differs from the
    /// date index, a cell is NaN or infinite, the dates are not strictly
    /// ascending, or fewer than [`MIN_ROWS`] rows remain.
    pub fn from_columns(
        tickers: Vec<String>,
        dates: Vec<Date>,
        columns: &[Vec<f64>],
    ) -> Result<Self, DataError> {
        if tickers.is_empty() {
            return Err(DataError::NoAssets);
        }
        if columns.len() != tickers.len() {
            return Err(DataError::insufficient(
                "return columns",
                tickers.len(),
                columns.len(),
            ));
        }
        for (ticker, column) in tickers.iter().zip(columns) {
            if column.len() != dates.len() {
                return Err(DataError::RaggedColumn {
                    ticker: ticker.clone(),
                    expected: dates.len(),
                    actual: column.len(),
                });
            }
            if let Some(row) = column.iter().position(|v| !v.is_finite()) {
                return Err(DataError::NonFiniteReturn {
                    ticker: ticker.clone(),
                    date: dates[row],
                });
            }
        }
        if dates.windows(2).any(|w| w[0] >= w[1]) {
            return Err(DataError::UnorderedDates);
        }
        if dates.len() < MIN_ROWS {
            return Err(DataError::insufficient(
                "aligned return rows",
                MIN_ROWS,
                dates.len(),
            ));
        }

        let num_assets = tickers.len();
        let mut values = vec![0.0; dates.len() * num_assets];
        for (asset, column) in columns.iter().enumerate() {
            for (row, value) in column.iter().enumerate() {
                values[row * num_assets + asset] = *value;
            }
        }

        Ok(Self {
            tickers,
            dates,
            values,
        })
    }

    #[must_use]
    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    #[must_use]
    pub fn num_assets(&self) -> usize {
        self.tickers.len()
    }

    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.dates.len()
    }

    /// All asset returns for one date, in ticker order
    #[must_use]
    pub fn row(&self, row: usize) -> &[f64] {
        let n = self.num_assets();
        &self.values[row * n..(row + 1) * n]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks_exact(self.num_assets())
    }

    /// One asset's returns across all dates
    pub fn column(&self, asset: usize) -> impl Iterator<Item = f64> + '_ {
        self.rows().map(move |row| row[asset])
    }

    #[must_use]
    pub fn get(&self, row: usize, asset: usize) -> f64 {
        self.values[row * self.num_assets() + asset]
    }
}
