//! Monte Carlo efficient-frontier estimation
//!
//! This crate turns per-asset price histories into a cloud of random
//! long-only portfolios and reports the best of them:
//! - Price file ingestion with column and date-format detection
//! - Return alignment across assets (inner join on dates)
//! - Sample mean vector and covariance matrix estimation
//! - Seeded Monte Carlo sampling of portfolio weights with annualised
//!   return, volatility and Sharpe ratio per trial
//! - Max-Sharpe and min-volatility selection, plus investor-profile
//!   recommendations over a multi-year horizon
//! - Country risk-free rate table and CSV / summary export
//!
//! # Example
//!
//! ```ignore
//! use frontier_core::{SimulationParams, analyze, load_price_files};
//!
//! let series = load_price_files(&["AAPL_prices.csv", "MSFT_prices.csv"])?;
//! let params = SimulationParams {
//!     risk_free_rate: 0.0421,
//!     num_trials: 5_000,
//!     seed: Some(42),
//!     ..Default::default()
//! };
//! let analysis = analyze(&series, &params)?;
//! println!("{:?}", analysis.result.max_sharpe_trial());
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod align;
pub mod error;
pub mod frequency;
pub mod pipeline;
pub mod simulation;
pub mod statistics;
pub mod weights;

// ============================================================================
// Input / output and decision support
// ============================================================================

pub mod export;
pub mod ingest;
pub mod rates;
pub mod recommend;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use align::align;
pub use error::{DataError, Error, ExportError, IngestError, RateError, Result, SimulationError};
pub use export::{SimulationSummary, write_trials_csv};
pub use frequency::{Frequency, infer_frequency};
pub use ingest::{load_price_file, load_price_files, load_price_reader};
pub use model::{
    AssetWeight, CovarianceMatrix, MeanVector, PriceSeries, ReturnMatrix, SimulationParams,
    SimulationResult, Trial, WeightSampling,
};
pub use pipeline::{Analysis, analyze, analyze_returns};
pub use rates::{CountryRiskData, RateTable};
pub use recommend::{InvestmentGoal, InvestorProfile, Recommendation, RiskTolerance, recommend};
pub use simulation::{evaluate_portfolio, simulate};
pub use statistics::compute_statistics;
