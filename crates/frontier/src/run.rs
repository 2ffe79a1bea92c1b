//! One command-line run: settings → rate lookup → ingest → analysis →
//! recommendation, plus the optional file outputs.

use std::path::{Path, PathBuf};

use color_eyre::eyre::WrapErr;
use frontier_core::{
    Analysis, CountryRiskData, Frequency, Recommendation, SimulationSummary, align,
    analyze_returns, infer_frequency, load_price_files, recommend, write_trials_csv,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::settings::Settings;
use crate::util::io::atomic_write_bytes;

/// Everything the terminal report and exports need
#[derive(Debug, Clone)]
pub struct RunReport {
    pub country: CountryRiskData,
    /// Mature-market ERP (percent); `None` when the table has no reference entry
    pub mature_market_erp: Option<f64>,
    /// Decimal rate used for Sharpe ratios
    pub risk_free_rate: f64,
    /// True when the rate came from settings rather than the country table
    pub rate_overridden: bool,
    /// Frequency inferred from the aligned dates
    pub frequency: Frequency,
    pub periods_per_year: u32,
    pub analysis: Analysis,
    pub recommendation: Recommendation,
}

/// JSON summary written with `--summary`
#[derive(Debug, Serialize)]
pub struct RunSummary<'a> {
    pub country: &'a CountryRiskData,
    #[serde(flatten)]
    pub simulation: SimulationSummary,
}

impl RunReport {
    pub fn summary(&self) -> RunSummary<'_> {
        RunSummary {
            country: &self.country,
            simulation: self.analysis.summary(Some(self.recommendation.clone())),
        }
    }
}

pub fn run(settings: &Settings, files: &[PathBuf]) -> color_eyre::Result<RunReport> {
    let table = settings.rate_table();
    let country = table.get(&settings.country)?.clone();
    let mature_market_erp = table.mature_market_erp().ok();
    let risk_free_rate = settings
        .risk_free_rate
        .map_or_else(|| country.risk_free_rate(), |pct| pct / 100.0);
    info!(
        country = %country.country,
        risk_free_rate,
        "market assumptions"
    );

    let series = load_price_files(files).wrap_err("failed to load price files")?;
    for s in &series {
        debug!(
            ticker = s.ticker(),
            observations = s.len(),
            first = ?s.first_date(),
            last = ?s.last_date(),
            "price series"
        );
    }

    let returns = align(&series).wrap_err("failed to align price series")?;
    let frequency = infer_frequency(returns.dates());
    let periods_per_year = settings
        .periods_per_year
        .unwrap_or_else(|| frequency.periods_per_year());
    info!(
        frequency = frequency.label(),
        periods_per_year,
        observations = returns.num_rows(),
        "aligned returns"
    );

    let params = settings.simulation_params(risk_free_rate, periods_per_year);
    let analysis = analyze_returns(returns, &params).wrap_err("simulation failed")?;
    let recommendation = recommend(&analysis.result, risk_free_rate, &settings.profile())
        .wrap_err("no portfolio matches the investor profile")?;

    Ok(RunReport {
        country,
        mature_market_erp,
        risk_free_rate,
        rate_overridden: settings.risk_free_rate.is_some(),
        frequency,
        periods_per_year,
        analysis,
        recommendation,
    })
}

/// Write the per-trial CSV and JSON summary when configured
pub fn write_outputs(report: &RunReport, settings: &Settings) -> color_eyre::Result<()> {
    if let Some(path) = &settings.output {
        let mut buf = Vec::new();
        write_trials_csv(&mut buf, &report.analysis.result)?;
        write_file(path, &buf)?;
        info!(path = %path.display(), trials = report.analysis.result.len(), "wrote trials CSV");
    }

    if let Some(path) = &settings.summary {
        let json = serde_json::to_vec_pretty(&report.summary())?;
        write_file(path, &json)?;
        info!(path = %path.display(), "wrote run summary");
    }

    Ok(())
}

fn write_file(path: &Path, content: &[u8]) -> color_eyre::Result<()> {
    atomic_write_bytes(path, content).wrap_err_with(|| format!("failed to write {}", path.display()))
}
