//! Plain-text run report for the terminal

use std::fmt::Write;

use frontier_core::{AssetWeight, SimulationResult, Trial};

use crate::run::RunReport;
use crate::util::format::{format_count, format_percentage, format_ratio};

pub fn render_report(report: &RunReport) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = write_report(&mut out, report);
    out
}

fn write_report(out: &mut String, report: &RunReport) -> std::fmt::Result {
    let country = &report.country;
    let returns = &report.analysis.returns;
    let result = &report.analysis.result;

    writeln!(out, "Market assumptions ({})", country.country)?;
    writeln!(
        out,
        "  Risk-free rate:        {}{}",
        format_percentage(report.risk_free_rate),
        if report.rate_overridden { " (override)" } else { "" }
    )?;
    if let Some(mature) = report.mature_market_erp {
        writeln!(out, "  Mature market ERP:     {mature:.2}%")?;
    }
    writeln!(out, "  Equity risk premium:   {:.2}%", country.erp)?;
    writeln!(out, "  Country risk premium:  {:.2}%", country.crp)?;
    writeln!(out)?;

    writeln!(out, "Data")?;
    writeln!(out, "  Assets:                {}", returns.tickers().join(", "))?;
    match (returns.dates().first(), returns.dates().last()) {
        (Some(first), Some(last)) => writeln!(
            out,
            "  Aligned observations:  {} ({first} to {last})",
            format_count(returns.num_rows())
        )?,
        _ => writeln!(out, "  Aligned observations:  {}", returns.num_rows())?,
    }
    writeln!(
        out,
        "  Frequency:             {} ({} periods/year)",
        report.frequency.label(),
        report.periods_per_year
    )?;
    writeln!(out)?;

    writeln!(out, "Simulation")?;
    writeln!(
        out,
        "  Trials:                {} ({} weighting, seed {})",
        format_count(result.len()),
        result.weighting().label(),
        result.seed()
    )?;
    writeln!(out)?;

    write_trial(
        out,
        &format!("Max Sharpe portfolio (trial {})", result.max_sharpe_index()),
        result,
        result.max_sharpe_trial(),
    )?;
    write_trial(
        out,
        &format!("Min volatility portfolio (trial {})", result.min_volatility_index()),
        result,
        result.min_volatility_trial(),
    )?;

    let rec = &report.recommendation;
    writeln!(
        out,
        "Recommended portfolio ({}, {}-year horizon, trial {})",
        rec.label(),
        rec.horizon_years,
        rec.trial_index
    )?;
    write_figures(out, rec.expected_return, rec.volatility, rec.sharpe_ratio)?;
    write_weights(out, &rec.weights)?;
    Ok(())
}

fn write_trial(
    out: &mut String,
    title: &str,
    result: &SimulationResult,
    trial: &Trial,
) -> std::fmt::Result {
    writeln!(out, "{title}")?;
    write_figures(out, trial.expected_return, trial.volatility, trial.sharpe_ratio)?;
    write_weights(out, &result.portfolio_weights(trial))?;
    writeln!(out)
}

fn write_figures(out: &mut String, ret: f64, vol: f64, sharpe: f64) -> std::fmt::Result {
    writeln!(
        out,
        "  Return {}   Volatility {}   Sharpe {}",
        format_percentage(ret),
        format_percentage(vol),
        format_ratio(sharpe)
    )
}

fn write_weights(out: &mut String, weights: &[AssetWeight]) -> std::fmt::Result {
    let width = weights.iter().map(|w| w.ticker.len()).max().unwrap_or(0);
    for w in weights {
        writeln!(
            out,
            "    {:<width$}  {:>7}",
            w.ticker,
            format_percentage(w.weight)
        )?;
    }
    Ok(())
}
