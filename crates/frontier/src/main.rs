use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::WrapErr;
use frontier::{Overrides, Settings, init_logging, render_report, run, write_outputs};
use frontier_core::{InvestmentGoal, RiskTolerance, WeightSampling};

#[derive(Parser, Debug)]
#[command(name = "frontier")]
#[command(about = "Monte Carlo efficient-frontier estimator for a set of price files")]
struct Args {
    /// Price files, one per asset (TICKER_prices.csv)
    #[arg(required_unless_present = "list_countries")]
    files: Vec<PathBuf>,

    /// Settings file (default: ~/.frontier/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Country for market assumptions
    #[arg(long)]
    country: Option<String>,

    /// Risk-free rate in percent, replacing the country default
    #[arg(long)]
    risk_free_rate: Option<f64>,

    /// Number of random portfolios
    #[arg(short = 'n', long)]
    trials: Option<usize>,

    /// Seed for reproducible runs
    #[arg(short, long)]
    seed: Option<u64>,

    /// Periods per year (default: inferred from the dates)
    #[arg(long)]
    periods_per_year: Option<u32>,

    /// Weight sampling: dirichlet or normalized-uniform
    #[arg(long)]
    weighting: Option<WeightSampling>,

    /// Risk tolerance: low, moderate or high
    #[arg(long)]
    risk_tolerance: Option<RiskTolerance>,

    /// Goal: long-term-growth, capital-preservation, balanced or high-return
    #[arg(long)]
    goal: Option<InvestmentGoal>,

    /// Investment horizon in years
    #[arg(long)]
    horizon: Option<u32>,

    /// Write every trial to this CSV file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write a JSON run summary to this file
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Also log to {log_dir}/frontier.log
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Print the available countries and exit
    #[arg(long)]
    list_countries: bool,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            country: self.country.clone(),
            risk_free_rate: self.risk_free_rate,
            trials: self.trials,
            seed: self.seed,
            periods_per_year: self.periods_per_year,
            weighting: self.weighting,
            risk_tolerance: self.risk_tolerance,
            goal: self.goal,
            horizon_years: self.horizon,
            output: self.output.clone(),
            summary: self.summary.clone(),
            log_level: self.log_level.clone(),
            log_dir: self.log_dir.clone(),
        }
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let mut settings =
        Settings::load(args.config.as_deref()).wrap_err("failed to load settings")?;
    settings.apply(args.overrides());

    let _guard = init_logging(settings.log_dir.as_deref(), &settings.log_level)?;

    if args.list_countries {
        let table = settings.rate_table();
        for country in table.countries() {
            let data = table.get(country)?;
            println!(
                "{country:<22} rf {:>6.2}%  erp {:>6.2}%  crp {:>6.2}%",
                data.rf, data.erp, data.crp
            );
        }
        return Ok(());
    }

    settings.validate(args.files.len())?;

    let report = run(&settings, &args.files)?;
    print!("{}", render_report(&report));
    write_outputs(&report, &settings)?;

    tracing::debug!("run finished");
    Ok(())
}
