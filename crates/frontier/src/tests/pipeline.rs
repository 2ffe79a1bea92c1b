//! Settings through run, report and exports on real files

use std::fs;
use std::path::PathBuf;

use frontier_core::{InvestmentGoal, RiskTolerance};

use crate::report::render_report;
use crate::run::{run, write_outputs};
use crate::settings::Settings;

/// Two assets over ten business days, one Yahoo-style and one minimal
fn write_prices(dir: &tempfile::TempDir) -> Vec<PathBuf> {
    let days = [2, 3, 4, 5, 8, 9, 10, 11, 12, 15];
    let a_prices = [100.0, 101.2, 100.7, 102.3, 101.9, 103.4, 104.0, 103.1, 104.8, 105.5];
    let b_prices = [50.0, 49.8, 50.3, 50.1, 50.6, 50.4, 50.9, 51.2, 50.8, 51.0];

    let mut a = String::from("Date,Open,High,Low,Close,Adj Close,Volume\n");
    let mut b = String::from("Date,Close\n");
    for ((day, pa), pb) in days.iter().zip(a_prices).zip(b_prices) {
        a.push_str(&format!("2024-01-{day:02},0,0,0,{pa},{pa},1000\n"));
        b.push_str(&format!("2024-01-{day:02},{pb}\n"));
    }

    let a_path = dir.path().join("AAA_prices.csv");
    let b_path = dir.path().join("BBB_prices.csv");
    fs::write(&a_path, a).unwrap();
    fs::write(&b_path, b).unwrap();
    vec![a_path, b_path]
}

fn settings() -> Settings {
    Settings {
        country: "United States".to_string(),
        trials: 300,
        seed: Some(17),
        ..Default::default()
    }
}

#[test]
fn test_run_uses_country_rate_and_inferred_frequency() {
    let dir = tempfile::tempdir().unwrap();
    let files = write_prices(&dir);

    let report = run(&settings(), &files).unwrap();
    assert!((report.risk_free_rate - 0.0421).abs() < 1e-12);
    assert!(!report.rate_overridden);
    assert!(report.mature_market_erp.is_some_and(|erp| (erp - 4.33).abs() < 1e-9));
    assert_eq!(report.periods_per_year, 252);
    assert_eq!(report.analysis.returns.num_rows(), 9);
    assert_eq!(report.analysis.result.len(), 300);
    assert_eq!(report.analysis.result.seed(), 17);
    assert_eq!(
        report.recommendation.trial_index,
        report.analysis.result.max_sharpe_index()
    );
}

#[test]
fn test_rate_override_and_profile() {
    let dir = tempfile::tempdir().unwrap();
    let files = write_prices(&dir);
    let settings = Settings {
        risk_free_rate: Some(2.5),
        periods_per_year: Some(52),
        risk_tolerance: RiskTolerance::Low,
        goal: InvestmentGoal::CapitalPreservation,
        horizon_years: 3,
        ..settings()
    };

    let report = run(&settings, &files).unwrap();
    assert!((report.risk_free_rate - 0.025).abs() < 1e-12);
    assert!(report.rate_overridden);
    assert_eq!(report.periods_per_year, 52);
    assert_eq!(report.analysis.result.periods_per_year(), 52);
    assert_eq!(
        report.recommendation.trial_index,
        report.analysis.result.min_volatility_index()
    );
}

#[test]
fn test_unknown_country_fails() {
    let dir = tempfile::tempdir().unwrap();
    let files = write_prices(&dir);
    let settings = Settings {
        country: "Atlantis".to_string(),
        ..settings()
    };

    let err = run(&settings, &files).unwrap_err();
    assert!(err.to_string().contains("unknown country: Atlantis"));
}

#[test]
fn test_missing_file_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let mut files = write_prices(&dir);
    files.push(dir.path().join("CCC_prices.csv"));

    let err = run(&settings(), &files).unwrap_err();
    let chain = format!("{err:?}");
    assert!(chain.contains("CCC_prices.csv"), "{chain}");
}

#[test]
fn test_report_and_exports() {
    let dir = tempfile::tempdir().unwrap();
    let files = write_prices(&dir);
    let out_dir = dir.path().join("out");
    let settings = Settings {
        output: Some(out_dir.join("trials.csv")),
        summary: Some(out_dir.join("summary.json")),
        ..settings()
    };

    let report = run(&settings, &files).unwrap();

    let text = render_report(&report);
    assert!(text.contains("Market assumptions (United States)"));
    assert!(text.contains("Risk-free rate:        4.21%"));
    assert!(text.contains("Mature market ERP:     4.33%"));
    assert!(text.contains("Assets:                AAA, BBB"));
    assert!(text.contains("daily (252 periods/year)"));
    assert!(text.contains("Recommended portfolio (Moderate Risk + Max Sharpe, 1-year horizon"));

    write_outputs(&report, &settings).unwrap();

    let csv = fs::read_to_string(out_dir.join("trials.csv")).unwrap();
    assert!(csv.starts_with("Return,Volatility,Sharpe,AAA,BBB\n"));
    assert_eq!(csv.lines().count(), 301);

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out_dir.join("summary.json")).unwrap()).unwrap();
    assert_eq!(json["country"]["country"], "United States");
    assert_eq!(json["seed"], 17);
    assert_eq!(json["num_trials"], 300);
    assert_eq!(json["tickers"][1], "BBB");
    assert_eq!(json["first_date"], "2024-01-03");
    assert_eq!(
        json["recommendation"]["trial_index"],
        report.recommendation.trial_index
    );
}
