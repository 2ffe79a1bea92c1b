//! Sufficient statistics for the portfolio simulation

use serde::{Deserialize, Serialize};

use crate::error::SimulationError;

/// Per-asset periodic mean return, in ticker order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMeanVector")]
pub struct MeanVector {
    tickers: Vec<String>,
    values: Vec<f64>,
}

impl MeanVector {
    pub fn new(tickers: Vec<String>, values: Vec<f64>) -> Result<Self, SimulationError> {
        if tickers.len() != values.len() {
            return Err(SimulationError::DimensionMismatch {
                what: "mean vector",
                expected: tickers.len(),
                actual: values.len(),
            });
        }
        Ok(Self { tickers, values })
    }

    pub(crate) fn from_parts(tickers: Vec<String>, values: Vec<f64>) -> Self {
        debug_assert_eq!(tickers.len(), values.len());
        Self { tickers, values }
    }

    #[must_use]
    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Mean return for a ticker
    pub fn get(&self, ticker: &str) -> Option<f64> {
        self.tickers
            .iter()
            .position(|t| t == ticker)
            .map(|i| self.values[i])
    }

    /// True when every entry is a finite number
    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }

    /// Dot product with a weight vector. Caller guarantees equal length.
    #[inline]
    pub(crate) fn dot(&self, weights: &[f64]) -> f64 {
        self.values.iter().zip(weights).map(|(m, w)| m * w).sum()
    }
}

/// Square sample covariance matrix, stored row-major
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCovarianceMatrix")]
pub struct CovarianceMatrix {
    dim: usize,
    values: Vec<f64>,
}

#[derive(Deserialize)]
struct RawMeanVector {
    tickers: Vec<String>,
    values: Vec<f64>,
}

impl TryFrom<RawMeanVector> for MeanVector {
    type Error = SimulationError;

    fn try_from(raw: RawMeanVector) -> Result<Self, Self::Error> {
        Self::new(raw.tickers, raw.values)
    }
}

#[derive(Deserialize)]
struct RawCovarianceMatrix {
    dim: usize,
    values: Vec<f64>,
}

impl TryFrom<RawCovarianceMatrix> for CovarianceMatrix {
    type Error = SimulationError;

    fn try_from(raw: RawCovarianceMatrix) -> Result<Self, Self::Error> {
        Self::new(raw.dim, raw.values)
    }
}

impl CovarianceMatrix {
    /// Build from a row-major buffer of `dim * dim` values
    pub fn new(dim: usize, values: Vec<f64>) -> Result<Self, SimulationError> {
        if values.len() != dim * dim {
            return Err(SimulationError::DimensionMismatch {
                what: "covariance matrix",
                expected: dim * dim,
                actual: values.len(),
            });
        }
        Ok(Self { dim, values })
    }

    pub(crate) fn from_parts(dim: usize, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), dim * dim);
        Self { dim, values }
    }

    /// Build from nested rows; every row must have `rows.len()` entries
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, SimulationError> {
        let dim = rows.len();
        let mut values = Vec::with_capacity(dim * dim);
        for row in rows {
            if row.len() != dim {
                return Err(SimulationError::DimensionMismatch {
                    what: "covariance row",
                    expected: dim,
                    actual: row.len(),
                });
            }
            values.extend_from_slice(row);
        }
        Ok(Self { dim, values })
    }

    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.dim + j]
    }

    #[must_use]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.dim..(i + 1) * self.dim]
    }

    /// True when every entry is a finite number
    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }

    /// Per-asset variances
    pub fn diagonal(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.dim).map(|i| self.get(i, i))
    }

    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        (0..self.dim).all(|i| {
            ((i + 1)..self.dim).all(|j| (self.get(i, j) - self.get(j, i)).abs() <= tolerance)
        })
    }

    /// `wᵀ Σ w`. Caller guarantees `weights.len() == dim`.
    #[inline]
    pub(crate) fn quadratic_form(&self, weights: &[f64]) -> f64 {
        let mut total = 0.0;
        for (i, wi) in weights.iter().enumerate() {
            if *wi == 0.0 {
                continue;
            }
            let row_dot: f64 = self.row(i).iter().zip(weights).map(|(c, wj)| c * wj).sum();
            total += wi * row_dot;
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quadratic_form_matches_manual_expansion() {
        let cov = CovarianceMatrix::from_rows(&[vec![0.04, 0.01], vec![0.01, 0.09]]).unwrap();
        let w = [0.25, 0.75];
        let expected = 0.25 * 0.25 * 0.04 + 2.0 * 0.25 * 0.75 * 0.01 + 0.75 * 0.75 * 0.09;
        assert!((cov.quadratic_form(&w) - expected).abs() < 1e-15);
    }

    #[test]
    fn test_from_rows_rejects_non_square() {
        let err = CovarianceMatrix::from_rows(&[vec![1.0, 0.0], vec![0.0]]).unwrap_err();
        assert!(matches!(err, SimulationError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_mean_vector_lookup() {
        let mean = MeanVector::new(vec!["A".into(), "B".into()], vec![0.01, 0.02]).unwrap();
        assert_eq!(mean.get("B"), Some(0.02));
        assert_eq!(mean.get("C"), None);
        assert!((mean.dot(&[0.5, 0.5]) - 0.015).abs() < 1e-15);
    }

    #[test]
    fn test_deserialize_checks_dimensions() {
        let cov: CovarianceMatrix =
            serde_json::from_str(r#"{"dim":2,"values":[0.04,0.01,0.01,0.09]}"#).unwrap();
        assert_eq!(cov.get(1, 0), 0.01);
        assert!(serde_json::from_str::<CovarianceMatrix>(r#"{"dim":2,"values":[0.04]}"#).is_err());

        let mean: MeanVector =
            serde_json::from_str(r#"{"tickers":["A"],"values":[0.01]}"#).unwrap();
        assert_eq!(mean.get("A"), Some(0.01));
        assert!(
            serde_json::from_str::<MeanVector>(r#"{"tickers":["A","B"],"values":[0.01]}"#).is_err()
        );
    }
}
