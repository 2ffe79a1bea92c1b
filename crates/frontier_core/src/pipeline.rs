//! Aligner → statistics → simulator in one call

use tracing::info;

use crate::align::align;
use crate::error::Result;
use crate::export::SimulationSummary;
use crate::model::{
    CovarianceMatrix, MeanVector, PriceSeries, ReturnMatrix, SimulationParams, SimulationResult,
};
use crate::recommend::Recommendation;
use crate::simulation::simulate;
use crate::statistics::compute_statistics;

/// Intermediate and final products of one run
#[derive(Debug, Clone)]
pub struct Analysis {
    pub returns: ReturnMatrix,
    pub mean: MeanVector,
    pub covariance: CovarianceMatrix,
    pub result: SimulationResult,
}

impl Analysis {
    #[must_use]
    pub fn summary(&self, recommendation: Option<Recommendation>) -> SimulationSummary {
        SimulationSummary::new(&self.returns, &self.mean, &self.result, recommendation)
    }
}

/// Align `series`, estimate statistics and run the simulation
pub fn analyze(series: &[PriceSeries], params: &SimulationParams) -> Result<Analysis> {
    analyze_returns(align(series)?, params)
}

/// Estimate statistics for an aligned matrix and run the simulation
pub fn analyze_returns(returns: ReturnMatrix, params: &SimulationParams) -> Result<Analysis> {
    let (mean, covariance) = compute_statistics(&returns);
    let result = simulate(&mean, &covariance, params)?;

    info!(
        assets = returns.num_assets(),
        observations = returns.num_rows(),
        trials = result.len(),
        "analysis complete"
    );

    Ok(Analysis {
        returns,
        mean,
        covariance,
        result,
    })
}
