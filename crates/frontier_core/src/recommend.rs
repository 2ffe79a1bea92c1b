//! Investor-profile recommendation
//!
//! Picks one simulated portfolio for an investor after scaling every trial
//! to the investment horizon:
//!
//! - `R_h = (1 + R)^h - 1`
//! - `V_h = V * sqrt(h)`
//! - `S_h = (R_h - rf * h) / V_h`, NaN when `V_h` is numerically zero
//!
//! A low risk tolerance first restricts the candidates to trials whose
//! `V_h` is at or below the 25th percentile; the goal then chooses among
//! the candidates. Ties always go to the earliest trial.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SimulationError;
use crate::model::{AssetWeight, SimulationResult, Trial};
use crate::simulation::VOLATILITY_EPSILON;

/// Percentile of `V_h` that bounds the low-risk candidate set
pub const LOW_RISK_PERCENTILE: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTolerance {
    Low,
    #[default]
    Moderate,
    High,
}

impl RiskTolerance {
    pub fn label(&self) -> &'static str {
        match self {
            RiskTolerance::Low => "Low Risk",
            RiskTolerance::Moderate => "Moderate Risk",
            RiskTolerance::High => "High Risk",
        }
    }
}

impl FromStr for RiskTolerance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "moderate" => Ok(Self::Moderate),
            "high" => Ok(Self::High),
            _ => Err(format!(
                "unknown risk tolerance {s:?} (expected low, moderate or high)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentGoal {
    /// Highest horizon Sharpe ratio
    #[default]
    LongTermGrowth,
    /// Lowest horizon volatility
    CapitalPreservation,
    /// Volatility closest to the candidates' median
    Balanced,
    /// Highest horizon return
    HighReturn,
}

impl InvestmentGoal {
    pub fn label(&self) -> &'static str {
        match self {
            InvestmentGoal::LongTermGrowth => "Max Sharpe",
            InvestmentGoal::CapitalPreservation => "Min Volatility",
            InvestmentGoal::Balanced => "Balanced",
            InvestmentGoal::HighReturn => "High Return",
        }
    }
}

impl FromStr for InvestmentGoal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "longtermgrowth" | "growth" => Ok(Self::LongTermGrowth),
            "capitalpreservation" | "preservation" => Ok(Self::CapitalPreservation),
            "balanced" => Ok(Self::Balanced),
            "highreturn" | "highriskhighreturn" => Ok(Self::HighReturn),
            _ => Err(format!(
                "unknown goal {s:?} (expected long-term-growth, capital-preservation, \
                 balanced or high-return)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestorProfile {
    pub risk_tolerance: RiskTolerance,
    pub goal: InvestmentGoal,
    /// Whole years, at least one
    pub horizon_years: u32,
}

impl Default for InvestorProfile {
    fn default() -> Self {
        Self {
            risk_tolerance: RiskTolerance::Moderate,
            goal: InvestmentGoal::LongTermGrowth,
            horizon_years: 1,
        }
    }
}

/// Trial statistics scaled to the investment horizon
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizonStats {
    pub expected_return: f64,
    pub volatility: f64,
    pub sharpe_ratio: f64,
}

impl HorizonStats {
    #[must_use]
    pub fn scale(trial: &Trial, risk_free_rate: f64, horizon_years: u32) -> Self {
        let h = f64::from(horizon_years);
        let expected_return = (1.0 + trial.expected_return).powf(h) - 1.0;
        let volatility = trial.volatility * h.sqrt();
        let sharpe_ratio = if volatility > VOLATILITY_EPSILON {
            (expected_return - risk_free_rate * h) / volatility
        } else {
            f64::NAN
        };
        Self {
            expected_return,
            volatility,
            sharpe_ratio,
        }
    }
}

/// The portfolio chosen for an investor profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Index into `SimulationResult::trials`
    pub trial_index: usize,
    pub weights: Vec<AssetWeight>,
    /// Horizon-scaled figures
    pub expected_return: f64,
    pub volatility: f64,
    pub sharpe_ratio: f64,
    pub risk_tolerance: RiskTolerance,
    pub goal: InvestmentGoal,
    pub horizon_years: u32,
}

impl Recommendation {
    /// e.g. "Low Risk + Max Sharpe"
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} + {}", self.risk_tolerance.label(), self.goal.label())
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}y): return {:.2}%, volatility {:.2}%, sharpe {:.2}",
            self.label(),
            self.horizon_years,
            self.expected_return * 100.0,
            self.volatility * 100.0,
            self.sharpe_ratio
        )
    }
}

/// Choose the trial that best fits `profile`.
///
/// `risk_free_rate` is the annual decimal rate used for the horizon Sharpe
/// ratio; it is normally the rate the simulation ran with.
pub fn recommend(
    result: &SimulationResult,
    risk_free_rate: f64,
    profile: &InvestorProfile,
) -> Result<Recommendation, SimulationError> {
    if profile.horizon_years == 0 {
        return Err(SimulationError::InvalidParameter {
            name: "horizon_years",
            reason: "must be at least 1".to_string(),
        });
    }

    let scaled: Vec<HorizonStats> = result
        .trials()
        .iter()
        .map(|t| HorizonStats::scale(t, risk_free_rate, profile.horizon_years))
        .collect();

    let candidates: Vec<usize> = match profile.risk_tolerance {
        RiskTolerance::Low => {
            let vols: Vec<f64> = scaled.iter().map(|s| s.volatility).collect();
            let threshold = percentile(&vols, LOW_RISK_PERCENTILE);
            (0..scaled.len())
                .filter(|&i| scaled[i].volatility <= threshold)
                .collect()
        }
        RiskTolerance::Moderate | RiskTolerance::High => (0..scaled.len()).collect(),
    };

    debug!(
        candidates = candidates.len(),
        trials = scaled.len(),
        risk = profile.risk_tolerance.label(),
        goal = profile.goal.label(),
        "selecting recommendation"
    );

    let chosen = match profile.goal {
        InvestmentGoal::CapitalPreservation => {
            first_best(&candidates, |i| scaled[i].volatility, |a, b| a < b)
        }
        InvestmentGoal::HighReturn => {
            first_best(&candidates, |i| scaled[i].expected_return, |a, b| a > b)
        }
        InvestmentGoal::LongTermGrowth => {
            let finite: Vec<usize> = candidates
                .iter()
                .copied()
                .filter(|&i| scaled[i].sharpe_ratio.is_finite())
                .collect();
            first_best(&finite, |i| scaled[i].sharpe_ratio, |a, b| a > b)
        }
        InvestmentGoal::Balanced => {
            let vols: Vec<f64> = candidates.iter().map(|&i| scaled[i].volatility).collect();
            let median = percentile(&vols, 0.5);
            first_best(
                &candidates,
                |i| (scaled[i].volatility - median).abs(),
                |a, b| a < b,
            )
        }
    }
    .ok_or(SimulationError::NoValidTrial)?;

    let stats = scaled[chosen];
    Ok(Recommendation {
        trial_index: chosen,
        weights: result.portfolio_weights(&result.trials()[chosen]),
        expected_return: stats.expected_return,
        volatility: stats.volatility,
        sharpe_ratio: stats.sharpe_ratio,
        risk_tolerance: profile.risk_tolerance,
        goal: profile.goal,
        horizon_years: profile.horizon_years,
    })
}

/// First index whose key beats every earlier key under `better`
fn first_best(
    indices: &[usize],
    key: impl Fn(usize) -> f64,
    better: impl Fn(f64, f64) -> bool,
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for &i in indices {
        let k = key(i);
        if best.is_none_or(|(_, current)| better(k, current)) {
            best = Some((i, k));
        }
    }
    best.map(|(i, _)| i)
}

/// Percentile `q` in `[0, 1]` with linear interpolation between order
/// statistics. NaN for an empty slice.
#[must_use]
pub fn percentile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}
