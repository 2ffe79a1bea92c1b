//! Monte Carlo portfolio sampler
//!
//! Draws `num_trials` random weight vectors, evaluates annualised return,
//! volatility and Sharpe ratio for each, and picks the maximum-Sharpe and
//! minimum-volatility portfolios. Cost is O(num_trials × N²), dominated by
//! the covariance quadratic form.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::{debug, info, warn};

use crate::error::SimulationError;
use crate::model::{CovarianceMatrix, MeanVector, SimulationParams, SimulationResult, Trial};
use crate::weights::draw_weights;

/// Volatility at or below this is treated as zero; the trial's Sharpe ratio is NaN
pub const VOLATILITY_EPSILON: f64 = 1e-12;

/// Run the random-portfolio search.
///
/// Weights are generated sequentially from a `SmallRng` seeded with
/// `params.seed` (or a freshly drawn seed, recorded on the result), so a
/// given seed always yields the same weight sequence. Evaluation of the
/// drawn portfolios is order-preserving and may run on the rayon pool.
pub fn simulate(
    mean: &MeanVector,
    covariance: &CovarianceMatrix,
    params: &SimulationParams,
) -> Result<SimulationResult, SimulationError> {
    validate(mean, covariance, params)?;

    let num_assets = mean.len();
    let seed = params.seed.unwrap_or_else(|| rand::rng().random());
    let mut rng = SmallRng::seed_from_u64(seed);

    debug!(
        assets = num_assets,
        trials = params.num_trials,
        seed,
        weighting = params.weighting.label(),
        "drawing portfolio weights"
    );

    let weights: Vec<Vec<f64>> = (0..params.num_trials)
        .map(|_| draw_weights(&mut rng, num_assets, params.weighting))
        .collect();

    let evaluate_one = |w: Vec<f64>| {
        evaluate(
            w,
            mean,
            covariance,
            params.risk_free_rate,
            params.periods_per_year,
        )
    };

    #[cfg(feature = "parallel")]
    let trials: Vec<Trial> = weights.into_par_iter().map(evaluate_one).collect();
    #[cfg(not(feature = "parallel"))]
    let trials: Vec<Trial> = weights.into_iter().map(evaluate_one).collect();

    let degenerate = trials.iter().filter(|t| !t.has_finite_sharpe()).count();
    if degenerate > 0 {
        warn!(
            degenerate,
            "trials with zero volatility excluded from max-Sharpe selection"
        );
    }

    let (max_sharpe_index, min_volatility_index) = select_optima(&trials)?;

    info!(
        trials = trials.len(),
        max_sharpe = trials[max_sharpe_index].sharpe_ratio,
        min_volatility = trials[min_volatility_index].volatility,
        seed,
        "simulation complete"
    );

    Ok(SimulationResult::new(
        mean.tickers().to_vec(),
        trials,
        max_sharpe_index,
        min_volatility_index,
        seed,
        params,
    ))
}

/// Evaluate a caller-supplied weight vector with the same formulas as
/// [`simulate`].
pub fn evaluate_portfolio(
    weights: Vec<f64>,
    mean: &MeanVector,
    covariance: &CovarianceMatrix,
    risk_free_rate: f64,
    periods_per_year: u32,
) -> Result<Trial, SimulationError> {
    if covariance.dim() != mean.len() {
        return Err(SimulationError::DimensionMismatch {
            what: "covariance matrix",
            expected: mean.len(),
            actual: covariance.dim(),
        });
    }
    if weights.len() != mean.len() {
        return Err(SimulationError::DimensionMismatch {
            what: "weight vector",
            expected: mean.len(),
            actual: weights.len(),
        });
    }
    Ok(evaluate(
        weights,
        mean,
        covariance,
        risk_free_rate,
        periods_per_year,
    ))
}

fn validate(
    mean: &MeanVector,
    covariance: &CovarianceMatrix,
    params: &SimulationParams,
) -> Result<(), SimulationError> {
    if mean.is_empty() {
        return Err(SimulationError::InvalidParameter {
            name: "mean",
            reason: "at least one asset is required".to_string(),
        });
    }
    if covariance.dim() != mean.len() {
        return Err(SimulationError::DimensionMismatch {
            what: "covariance matrix",
            expected: mean.len(),
            actual: covariance.dim(),
        });
    }
    if !mean.is_finite() {
        return Err(SimulationError::InvalidParameter {
            name: "mean",
            reason: "every mean return must be finite".to_string(),
        });
    }
    if !covariance.is_finite() {
        return Err(SimulationError::InvalidParameter {
            name: "covariance",
            reason: "every covariance entry must be finite".to_string(),
        });
    }
    if params.num_trials == 0 {
        return Err(SimulationError::InvalidParameter {
            name: "num_trials",
            reason: "must be at least 1".to_string(),
        });
    }
    if params.periods_per_year == 0 {
        return Err(SimulationError::InvalidParameter {
            name: "periods_per_year",
            reason: "must be positive".to_string(),
        });
    }
    if !params.risk_free_rate.is_finite() {
        return Err(SimulationError::InvalidParameter {
            name: "risk_free_rate",
            reason: format!("must be finite, got {}", params.risk_free_rate),
        });
    }
    Ok(())
}

#[inline]
fn evaluate(
    weights: Vec<f64>,
    mean: &MeanVector,
    covariance: &CovarianceMatrix,
    risk_free_rate: f64,
    periods_per_year: u32,
) -> Trial {
    let periods = f64::from(periods_per_year);
    let expected_return = mean.dot(&weights) * periods;
    // Rounding can push a PSD quadratic form a hair below zero. NaN passes through.
    let variance = covariance.quadratic_form(&weights);
    let variance = if variance < 0.0 { 0.0 } else { variance };
    let volatility = (variance * periods).sqrt();
    let sharpe_ratio = if volatility > VOLATILITY_EPSILON {
        (expected_return - risk_free_rate) / volatility
    } else {
        f64::NAN
    };

    Trial {
        weights,
        expected_return,
        volatility,
        sharpe_ratio,
    }
}

/// Indices of the max finite Sharpe and min volatility trials.
/// Ties go to the earliest trial.
fn select_optima(trials: &[Trial]) -> Result<(usize, usize), SimulationError> {
    let mut max_sharpe: Option<usize> = None;
    let mut min_volatility = 0;

    for (i, trial) in trials.iter().enumerate() {
        if trial.volatility < trials[min_volatility].volatility {
            min_volatility = i;
        }
        if trial.has_finite_sharpe()
            && max_sharpe.is_none_or(|best| trial.sharpe_ratio > trials[best].sharpe_ratio)
        {
            max_sharpe = Some(i);
        }
    }

    let max_sharpe = max_sharpe.ok_or(SimulationError::NoValidTrial)?;
    Ok((max_sharpe, min_volatility))
}
