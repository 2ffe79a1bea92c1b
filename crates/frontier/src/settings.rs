//! Run settings
//!
//! Resolution order: built-in defaults, then `~/.frontier/config.yaml` (or
//! the file given with `--config`), then command-line flags.
//!
//! ```yaml
//! country: India
//! trials: 5000
//! max_trials: 50000
//! weighting: dirichlet
//! risk_tolerance: low
//! goal: balanced
//! horizon_years: 5
//! countries:
//!   - country: Atlantis
//!     erp: 9.0
//!     crp: 4.67
//!     rf: 8.0
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use frontier_core::{
    CountryRiskData, InvestmentGoal, InvestorProfile, RateTable, RiskTolerance, SimulationParams,
    WeightSampling,
};
use serde::{Deserialize, Serialize};

/// Settings file name inside the data directory
pub const CONFIG_FILE: &str = "config.yaml";

/// Error types for settings operations
#[derive(Debug)]
pub enum SettingsError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        message: String,
    },
    Invalid(String),
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            SettingsError::Parse { path, message } => {
                write!(f, "invalid settings file {}: {message}", path.display())
            }
            SettingsError::Invalid(msg) => write!(f, "invalid settings: {msg}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Key into the country rate table
    pub country: String,
    /// Risk-free rate in percent; replaces the country default when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_free_rate: Option<f64>,
    pub trials: usize,
    pub max_trials: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Inferred from the aligned dates when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub periods_per_year: Option<u32>,
    pub weighting: WeightSampling,
    pub risk_tolerance: RiskTolerance,
    pub goal: InvestmentGoal,
    pub horizon_years: u32,
    pub min_assets: usize,
    pub max_assets: usize,
    /// Extra or replacement rate-table entries
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub countries: Vec<CountryRiskData>,
    /// Per-trial CSV export
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    /// JSON run summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<PathBuf>,
    pub log_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            country: "India".to_string(),
            risk_free_rate: None,
            trials: 500,
            max_trials: 50_000,
            seed: None,
            periods_per_year: None,
            weighting: WeightSampling::Dirichlet,
            risk_tolerance: RiskTolerance::Moderate,
            goal: InvestmentGoal::LongTermGrowth,
            horizon_years: 1,
            min_assets: 1,
            max_assets: 50,
            countries: Vec::new(),
            output: None,
            summary: None,
            log_level: "info".to_string(),
            log_dir: None,
        }
    }
}

/// Values given on the command line; `None` keeps the file/default value
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub country: Option<String>,
    pub risk_free_rate: Option<f64>,
    pub trials: Option<usize>,
    pub seed: Option<u64>,
    pub periods_per_year: Option<u32>,
    pub weighting: Option<WeightSampling>,
    pub risk_tolerance: Option<RiskTolerance>,
    pub goal: Option<InvestmentGoal>,
    pub horizon_years: Option<u32>,
    pub output: Option<PathBuf>,
    pub summary: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_dir: Option<PathBuf>,
}

impl Settings {
    /// Get the default data directory path (~/.frontier/)
    pub fn default_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".frontier")
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, serde_saphyr::Error> {
        serde_saphyr::from_str(yaml)
    }

    pub fn to_yaml(&self) -> Result<String, serde_saphyr::ser::Error> {
        serde_saphyr::to_string(self)
    }

    /// Load settings from `path`, or from the default location when `path`
    /// is `None`. A missing default file yields the built-in defaults; a
    /// missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::default_dir().join(CONFIG_FILE), false),
        };
        if !required && !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|source| SettingsError::Io {
            path: path.clone(),
            source,
        })?;
        let settings = Self::from_yaml(&content).map_err(|e| SettingsError::Parse {
            path: path.clone(),
            message: e.to_string(),
        })?;
        tracing::debug!(path = %path.display(), "loaded settings file");
        Ok(settings)
    }

    /// Apply command-line values on top of these settings
    pub fn apply(&mut self, overrides: Overrides) {
        let Overrides {
            country,
            risk_free_rate,
            trials,
            seed,
            periods_per_year,
            weighting,
            risk_tolerance,
            goal,
            horizon_years,
            output,
            summary,
            log_level,
            log_dir,
        } = overrides;

        if let Some(v) = country {
            self.country = v;
        }
        if risk_free_rate.is_some() {
            self.risk_free_rate = risk_free_rate;
        }
        if let Some(v) = trials {
            self.trials = v;
        }
        if seed.is_some() {
            self.seed = seed;
        }
        if periods_per_year.is_some() {
            self.periods_per_year = periods_per_year;
        }
        if let Some(v) = weighting {
            self.weighting = v;
        }
        if let Some(v) = risk_tolerance {
            self.risk_tolerance = v;
        }
        if let Some(v) = goal {
            self.goal = v;
        }
        if let Some(v) = horizon_years {
            self.horizon_years = v;
        }
        if output.is_some() {
            self.output = output;
        }
        if summary.is_some() {
            self.summary = summary;
        }
        if let Some(v) = log_level {
            self.log_level = v;
        }
        if log_dir.is_some() {
            self.log_dir = log_dir;
        }
    }

    /// Check the knobs that the core library does not check itself
    pub fn validate(&self, num_files: usize) -> Result<(), SettingsError> {
        if self.min_assets == 0 || self.min_assets > self.max_assets {
            return Err(SettingsError::Invalid(format!(
                "asset limits must satisfy 1 <= min_assets <= max_assets, got {}..={}",
                self.min_assets, self.max_assets
            )));
        }
        if !(self.min_assets..=self.max_assets).contains(&num_files) {
            return Err(SettingsError::Invalid(format!(
                "expected between {} and {} price files, got {num_files}",
                self.min_assets, self.max_assets
            )));
        }
        if self.trials == 0 || self.trials > self.max_trials {
            return Err(SettingsError::Invalid(format!(
                "trials must be between 1 and {}, got {}",
                self.max_trials, self.trials
            )));
        }
        if self.horizon_years == 0 {
            return Err(SettingsError::Invalid(
                "horizon_years must be at least 1".to_string(),
            ));
        }
        if self.periods_per_year == Some(0) {
            return Err(SettingsError::Invalid(
                "periods_per_year must be positive".to_string(),
            ));
        }
        if let Some(rf) = self.risk_free_rate.filter(|rf| !rf.is_finite()) {
            return Err(SettingsError::Invalid(format!(
                "risk_free_rate must be finite, got {rf}"
            )));
        }
        Ok(())
    }

    /// Built-in country table with any configured entries applied
    pub fn rate_table(&self) -> RateTable {
        RateTable::builtin().with_overrides(self.countries.iter().cloned())
    }

    pub fn profile(&self) -> InvestorProfile {
        InvestorProfile {
            risk_tolerance: self.risk_tolerance,
            goal: self.goal,
            horizon_years: self.horizon_years,
        }
    }

    /// Simulation inputs for a resolved decimal rate and period count
    pub fn simulation_params(&self, risk_free_rate: f64, periods_per_year: u32) -> SimulationParams {
        SimulationParams {
            risk_free_rate,
            num_trials: self.trials,
            periods_per_year,
            seed: self.seed,
            weighting: self.weighting,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let settings = Settings::from_yaml("country: United States\ntrials: 2000\n").unwrap();
        assert_eq!(settings.country, "United States");
        assert_eq!(settings.trials, 2000);
        assert_eq!(settings.max_trials, 50_000);
        assert_eq!(settings.goal, InvestmentGoal::LongTermGrowth);
        assert_eq!(settings.weighting, WeightSampling::Dirichlet);
    }

    #[test]
    fn test_full_yaml() {
        let yaml = r#"
country: Atlantis
risk_free_rate: 5.5
seed: 7
periods_per_year: 12
weighting: normalized_uniform
risk_tolerance: low
goal: capital_preservation
horizon_years: 3
countries:
  - country: Atlantis
    erp: 9.0
    crp: 4.67
    rf: 8.0
"#;
        let settings = Settings::from_yaml(yaml).unwrap();
        assert_eq!(settings.weighting, WeightSampling::NormalizedUniform);
        assert_eq!(settings.risk_tolerance, RiskTolerance::Low);
        assert_eq!(settings.goal, InvestmentGoal::CapitalPreservation);
        assert_eq!(settings.periods_per_year, Some(12));

        let table = settings.rate_table();
        assert_eq!(table.get("Atlantis").unwrap().crp, 4.67);
        assert!(table.get("India").is_ok());
    }

    #[test]
    fn test_yaml_round_trip() {
        let settings = Settings {
            seed: Some(99),
            output: Some(PathBuf::from("trials.csv")),
            ..Default::default()
        };
        let yaml = settings.to_yaml().unwrap();
        assert_eq!(Settings::from_yaml(&yaml).unwrap(), settings);
    }

    #[test]
    fn test_overrides_win() {
        let mut settings = Settings::from_yaml("country: Japan\ntrials: 100\nseed: 1\n").unwrap();
        settings.apply(Overrides {
            trials: Some(900),
            goal: Some(InvestmentGoal::Balanced),
            ..Default::default()
        });
        assert_eq!(settings.country, "Japan");
        assert_eq!(settings.trials, 900);
        assert_eq!(settings.seed, Some(1));
        assert_eq!(settings.goal, InvestmentGoal::Balanced);
    }

    #[test]
    fn test_validate_limits() {
        let settings = Settings::default();
        assert!(settings.validate(3).is_ok());
        assert!(matches!(settings.validate(0), Err(SettingsError::Invalid(_))));
        assert!(settings.validate(51).is_err());

        let too_many_trials = Settings {
            trials: 50_001,
            ..Default::default()
        };
        assert!(too_many_trials.validate(2).is_err());

        let windowed = Settings {
            min_assets: 3,
            max_assets: 10,
            ..Default::default()
        };
        assert!(windowed.validate(2).is_err());
        assert!(windowed.validate(10).is_ok());
    }

    #[test]
    fn test_load_explicit_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "trials: 42\n").unwrap();
        assert_eq!(Settings::load(Some(&path)).unwrap().trials, 42);

        let missing = dir.path().join("nope.yaml");
        assert!(matches!(
            Settings::load(Some(&missing)),
            Err(SettingsError::Io { .. })
        ));

        fs::write(&path, "trials: [not, a, number]\n").unwrap();
        assert!(matches!(
            Settings::load(Some(&path)),
            Err(SettingsError::Parse { .. })
        ));
    }
}
