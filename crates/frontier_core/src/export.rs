//! Simulation output: per-trial CSV and a serializable run summary

use std::io::Write;

use jiff::civil::Date;
use serde::Serialize;

use crate::error::ExportError;
use crate::model::{AssetWeight, MeanVector, ReturnMatrix, SimulationResult, Trial, WeightSampling};
use crate::recommend::Recommendation;

/// Write every trial in generation order.
///
/// Header: `Return,Volatility,Sharpe,<tickers...>`. A NaN Sharpe ratio is
/// written as `NaN`.
pub fn write_trials_csv<W: Write>(writer: W, result: &SimulationResult) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["Return".to_string(), "Volatility".to_string(), "Sharpe".to_string()];
    header.extend(result.tickers().iter().cloned());
    wtr.write_record(&header)?;

    let mut row = Vec::with_capacity(header.len());
    for trial in result.trials() {
        row.clear();
        row.push(trial.expected_return.to_string());
        row.push(trial.volatility.to_string());
        row.push(trial.sharpe_ratio.to_string());
        row.extend(trial.weights.iter().map(f64::to_string));
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Annualised mean return of one asset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetReturn {
    pub ticker: String,
    pub annual_mean: f64,
}

/// One reported portfolio (annualised figures)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub trial_index: usize,
    pub expected_return: f64,
    pub volatility: f64,
    pub sharpe_ratio: f64,
    pub weights: Vec<AssetWeight>,
}

impl PortfolioSummary {
    fn of(result: &SimulationResult, index: usize, trial: &Trial) -> Self {
        Self {
            trial_index: index,
            expected_return: trial.expected_return,
            volatility: trial.volatility,
            sharpe_ratio: trial.sharpe_ratio,
            weights: result.portfolio_weights(trial),
        }
    }
}

/// Everything needed to reproduce and interpret a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationSummary {
    pub tickers: Vec<String>,
    pub observations: usize,
    pub first_date: Option<Date>,
    pub last_date: Option<Date>,
    pub num_trials: usize,
    pub seed: u64,
    pub weighting: WeightSampling,
    pub periods_per_year: u32,
    pub risk_free_rate: f64,
    pub mean_returns: Vec<AssetReturn>,
    pub max_sharpe: PortfolioSummary,
    pub min_volatility: PortfolioSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<Recommendation>,
}

impl SimulationSummary {
    pub fn new(
        returns: &ReturnMatrix,
        mean: &MeanVector,
        result: &SimulationResult,
        recommendation: Option<Recommendation>,
    ) -> Self {
        let periods = f64::from(result.periods_per_year());
        let mean_returns = mean
            .tickers()
            .iter()
            .zip(mean.values())
            .map(|(ticker, m)| AssetReturn {
                ticker: ticker.clone(),
                annual_mean: m * periods,
            })
            .collect();

        Self {
            tickers: result.tickers().to_vec(),
            observations: returns.num_rows(),
            first_date: returns.dates().first().copied(),
            last_date: returns.dates().last().copied(),
            num_trials: result.len(),
            seed: result.seed(),
            weighting: result.weighting(),
            periods_per_year: result.periods_per_year(),
            risk_free_rate: result.risk_free_rate(),
            mean_returns,
            max_sharpe: PortfolioSummary::of(
                result,
                result.max_sharpe_index(),
                result.max_sharpe_trial(),
            ),
            min_volatility: PortfolioSummary::of(
                result,
                result.min_volatility_index(),
                result.min_volatility_trial(),
            ),
            recommendation,
        }
    }
}
