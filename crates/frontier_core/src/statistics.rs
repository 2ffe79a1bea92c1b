//! Mean vector and sample covariance of an aligned return matrix

use crate::model::{CovarianceMatrix, MeanVector, ReturnMatrix};

/// Periodic (not annualised) column means and sample covariance
/// (denominator `rows - 1`).
///
/// Only the upper triangle is accumulated and then mirrored, so the result
/// is exactly symmetric. A constant column has exactly zero variance and
/// zero covariance with every other column.
#[must_use]
pub fn compute_statistics(matrix: &ReturnMatrix) -> (MeanVector, CovarianceMatrix) {
    let n = matrix.num_assets();
    let rows = matrix.num_rows();

    let mut means = vec![0.0; n];
    for row in matrix.rows() {
        for (mean, value) in means.iter_mut().zip(row) {
            *mean += value;
        }
    }
    for mean in &mut means {
        *mean /= rows as f64;
    }

    let mut cov = vec![0.0; n * n];
    let mut deviations = vec![0.0; n];
    for row in matrix.rows() {
        for ((dev, value), mean) in deviations.iter_mut().zip(row).zip(&means) {
            *dev = value - mean;
        }
        for i in 0..n {
            for j in i..n {
                cov[i * n + j] += deviations[i] * deviations[j];
            }
        }
    }

    // ReturnMatrix guarantees rows >= 2
    let denom = (rows - 1) as f64;
    for i in 0..n {
        for j in i..n {
            let value = cov[i * n + j] / denom;
            cov[i * n + j] = value;
            cov[j * n + i] = value;
        }
    }

    (
        MeanVector::from_parts(matrix.tickers().to_vec(), means),
        CovarianceMatrix::from_parts(n, cov),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    fn matrix(columns: &[Vec<f64>]) -> ReturnMatrix {
        let rows = columns[0].len() as i8;
        let tickers = (0..columns.len()).map(|i| format!("T{i}")).collect();
        let dates = (1..=rows).map(|d| date(2024, 3, d)).collect();
        ReturnMatrix::from_columns(tickers, dates, columns).unwrap()
    }

    #[test]
    fn test_two_asset_statistics() {
        let m = matrix(&[vec![0.01, -0.02, 0.03], vec![0.00, 0.01, -0.01]]);
        let (mean, cov) = compute_statistics(&m);

        assert_eq!(mean.len(), 2);
        assert!((mean.values()[0] - 0.02 / 3.0).abs() < 1e-12);
        assert!(mean.values()[1].abs() < 1e-12);

        // var(A): deviations 0.00333.., -0.02666.., 0.02333..
        let ma = 0.02 / 3.0;
        let var_a = [0.01 - ma, -0.02 - ma, 0.03 - ma]
            .iter()
            .map(|d| d * d)
            .sum::<f64>()
            / 2.0;
        assert!((cov.get(0, 0) - var_a).abs() < 1e-15);
        assert!((cov.get(1, 1) - 0.0001).abs() < 1e-15);

        let cov_ab = ((0.01 - ma) * 0.0 + (-0.02 - ma) * 0.01 + (0.03 - ma) * -0.01) / 2.0;
        assert!((cov.get(0, 1) - cov_ab).abs() < 1e-15);
        assert_eq!(cov.get(0, 1), cov.get(1, 0));
    }

    #[test]
    fn test_covariance_symmetric_and_shaped() {
        let m = matrix(&[
            vec![0.01, 0.02, -0.01, 0.04, 0.00],
            vec![-0.03, 0.01, 0.02, 0.00, 0.01],
            vec![0.05, -0.02, 0.01, 0.03, -0.04],
        ]);
        let (mean, cov) = compute_statistics(&m);

        assert_eq!(mean.len(), 3);
        assert_eq!(cov.dim(), 3);
        assert!(cov.is_symmetric(0.0));
        assert!(cov.diagonal().all(|v| v >= 0.0));
    }

    #[test]
    fn test_constant_column_has_zero_covariance() {
        let m = matrix(&[vec![0.0, 0.0, 0.0, 0.0], vec![0.02, -0.01, 0.03, 0.01]]);
        let (mean, cov) = compute_statistics(&m);

        assert_eq!(mean.values()[0], 0.0);
        assert_eq!(cov.get(0, 0), 0.0);
        assert_eq!(cov.get(0, 1), 0.0);
        assert_eq!(cov.get(1, 0), 0.0);
        assert!(cov.get(1, 1) > 0.0);
    }
}
