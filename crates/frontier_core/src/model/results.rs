//! Simulation parameters and results
//!
//! A `SimulationResult` is built once by [`crate::simulation::simulate`] and
//! handed to reporting/export read-only.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How random weight vectors are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightSampling {
    /// Exp(1) draws normalised by their sum. Uniform over the simplex
    /// (Dirichlet with all concentrations equal to one).
    #[default]
    Dirichlet,
    /// Uniform(0, 1) draws normalised by their sum. Biased toward balanced
    /// portfolios; explores the frontier edges less.
    NormalizedUniform,
}

impl WeightSampling {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            WeightSampling::Dirichlet => "dirichlet",
            WeightSampling::NormalizedUniform => "normalized-uniform",
        }
    }
}

impl FromStr for WeightSampling {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dirichlet" => Ok(Self::Dirichlet),
            "normalized-uniform" | "normalized_uniform" | "uniform" => Ok(Self::NormalizedUniform),
            _ => Err(format!(
                "unknown weighting {s:?} (expected dirichlet or normalized-uniform)"
            )),
        }
    }
}

/// Inputs to a single simulation run besides the return statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationParams {
    /// Annual risk-free rate as a decimal (0.0421 for 4.21%)
    pub risk_free_rate: f64,
    pub num_trials: usize,
    /// 252 for daily data, 52 weekly, 12 monthly
    pub periods_per_year: u32,
    /// `None` draws a fresh seed; the seed used is recorded on the result
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub weighting: WeightSampling,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.0,
            num_trials: 500,
            periods_per_year: 252,
            seed: None,
            weighting: WeightSampling::Dirichlet,
        }
    }
}

/// One random portfolio and its annualised statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trial {
    /// Non-negative, sums to one, ticker order
    pub weights: Vec<f64>,
    pub expected_return: f64,
    pub volatility: f64,
    /// NaN when the portfolio volatility is (numerically) zero
    pub sharpe_ratio: f64,
}

impl Trial {
    #[must_use]
    pub fn has_finite_sharpe(&self) -> bool {
        self.sharpe_ratio.is_finite()
    }
}

/// One asset's share of a portfolio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetWeight {
    pub ticker: String,
    pub weight: f64,
}

/// Complete output of one Monte Carlo run
#[derive(Debug, Clone, Serialize)]
pub struct SimulationResult {
    tickers: Vec<String>,
    trials: Vec<Trial>,
    max_sharpe_index: usize,
    min_volatility_index: usize,
    seed: u64,
    weighting: WeightSampling,
    periods_per_year: u32,
    risk_free_rate: f64,
}

impl SimulationResult {
    pub(crate) fn new(
        tickers: Vec<String>,
        trials: Vec<Trial>,
        max_sharpe_index: usize,
        min_volatility_index: usize,
        seed: u64,
        params: &SimulationParams,
    ) -> Self {
        Self {
            tickers,
            trials,
            max_sharpe_index,
            min_volatility_index,
            seed,
            weighting: params.weighting,
            periods_per_year: params.periods_per_year,
            risk_free_rate: params.risk_free_rate,
        }
    }

    #[must_use]
    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    /// All trials in generation order
    #[must_use]
    pub fn trials(&self) -> &[Trial] {
        &self.trials
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.trials.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }

    #[must_use]
    pub fn max_sharpe_index(&self) -> usize {
        self.max_sharpe_index
    }

    #[must_use]
    pub fn min_volatility_index(&self) -> usize {
        self.min_volatility_index
    }

    /// Trial with the greatest finite Sharpe ratio
    #[must_use]
    pub fn max_sharpe_trial(&self) -> &Trial {
        &self.trials[self.max_sharpe_index]
    }

    /// Trial with the smallest annualised volatility
    #[must_use]
    pub fn min_volatility_trial(&self) -> &Trial {
        &self.trials[self.min_volatility_index]
    }

    /// Seed that reproduces this run
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub fn weighting(&self) -> WeightSampling {
        self.weighting
    }

    #[must_use]
    pub fn periods_per_year(&self) -> u32 {
        self.periods_per_year
    }

    #[must_use]
    pub fn risk_free_rate(&self) -> f64 {
        self.risk_free_rate
    }

    /// Pair each weight of a trial with its ticker
    pub fn weights_by_ticker<'a>(&'a self, trial: &'a Trial) -> impl Iterator<Item = (&'a str, f64)> {
        self.tickers
            .iter()
            .map(String::as_str)
            .zip(trial.weights.iter().copied())
    }

    /// Owned ticker/weight pairs for a trial, ticker order
    #[must_use]
    pub fn portfolio_weights(&self, trial: &Trial) -> Vec<AssetWeight> {
        self.weights_by_ticker(trial)
            .map(|(ticker, weight)| AssetWeight {
                ticker: ticker.to_string(),
                weight,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weighting_from_str() {
        assert_eq!("Dirichlet".parse::<WeightSampling>(), Ok(WeightSampling::Dirichlet));
        assert_eq!(
            "normalized-uniform".parse::<WeightSampling>(),
            Ok(WeightSampling::NormalizedUniform)
        );
        assert!("gaussian".parse::<WeightSampling>().is_err());
    }

    #[test]
    fn test_portfolio_weights_follow_ticker_order() {
        let trial = Trial {
            weights: vec![0.25, 0.75],
            expected_return: 0.1,
            volatility: 0.2,
            sharpe_ratio: 0.5,
        };
        let result = SimulationResult::new(
            vec!["A".into(), "B".into()],
            vec![trial.clone()],
            0,
            0,
            7,
            &SimulationParams::default(),
        );

        let weights = result.portfolio_weights(&trial);
        assert_eq!(weights[0].ticker, "A");
        assert_eq!(weights[1].weight, 0.75);
        assert_eq!(result.seed(), 7);
    }
}
