//! Country market assumptions
//!
//! Equity risk premium (ERP), country risk premium (CRP) and a default
//! risk-free rate per country, all in percent. The built-in figures follow
//! Damodaran's January 2025 country risk premium update; risk-free rates are
//! approximate 2025 ten-year government bond yields.
//!
//! The table is an ordinary value: build it once at start-up and pass it to
//! whoever needs a rate.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::RateError;

/// Market assumptions for one country (percent)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRiskData {
    pub country: String,
    /// Total equity risk premium (mature ERP + CRP)
    pub erp: f64,
    pub crp: f64,
    /// Default risk-free rate; callers may override it
    pub rf: f64,
}

impl CountryRiskData {
    pub fn new(country: impl Into<String>, erp: f64, crp: f64, rf: f64) -> Self {
        Self {
            country: country.into(),
            erp,
            crp,
            rf,
        }
    }

    /// Mature-market ERP: total ERP minus the country premium
    #[must_use]
    pub fn mature_erp(&self) -> f64 {
        self.erp - self.crp
    }

    /// Risk-free rate as a decimal, ready for the simulator
    #[must_use]
    pub fn risk_free_rate(&self) -> f64 {
        self.rf / 100.0
    }
}

/// (country, ERP, CRP, Rf)
const BUILTIN: &[(&str, f64, f64, f64)] = &[
    // North America / mature markets
    ("United States", 4.33, 0.00, 4.21),
    ("Canada", 4.33, 0.00, 3.10),
    ("Mexico", 7.67, 3.34, 9.00),
    // Europe
    ("United Kingdom", 5.13, 0.80, 4.50),
    ("Germany", 4.33, 0.00, 2.50),
    ("France", 4.86, 0.53, 2.60),
    ("Italy", 7.26, 2.93, 4.00),
    ("Spain", 5.46, 1.13, 3.20),
    ("Netherlands", 4.86, 0.53, 2.50),
    ("Switzerland", 5.13, 0.80, 1.00),
    ("Russia", 16.35, 12.02, 9.00),
    // Asia
    ("India", 7.26, 2.93, 6.92),
    ("China", 5.27, 0.94, 2.70),
    ("Japan", 5.27, 0.94, 0.35),
    ("Australia", 4.33, 0.00, 3.80),
    ("Singapore", 4.99, 0.66, 3.10),
    ("South Korea", 6.87, 2.54, 3.30),
    ("Indonesia", 6.87, 2.54, 7.00),
    // South America
    ("Brazil", 7.67, 3.34, 10.00),
    ("Argentina", 20.35, 16.02, 35.00),
    ("Chile", 5.46, 1.13, 4.00),
    // Africa
    ("South Africa", 13.01, 8.68, 11.00),
    ("Egypt", 14.34, 10.01, 15.00),
    // Middle East
    ("United Arab Emirates", 4.99, 0.66, 3.40),
    ("Saudi Arabia", 5.27, 0.94, 4.50),
    ("Turkey", 16.35, 12.02, 25.00),
];

/// Reference country for the mature-market ERP
const MATURE_MARKET: &str = "United States";

/// Immutable country → assumptions lookup
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    entries: BTreeMap<String, CountryRiskData>,
}

impl RateTable {
    /// The built-in January 2025 table
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_entries(
            BUILTIN
                .iter()
                .map(|(country, erp, crp, rf)| CountryRiskData::new(*country, *erp, *crp, *rf)),
        )
    }

    /// Build a table from explicit entries. Later entries replace earlier
    /// ones with the same country name.
    pub fn from_entries(entries: impl IntoIterator<Item = CountryRiskData>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|e| (e.country.clone(), e))
                .collect(),
        }
    }

    /// Copy of this table with `overrides` added or replacing existing countries
    #[must_use]
    pub fn with_overrides(&self, overrides: impl IntoIterator<Item = CountryRiskData>) -> Self {
        let mut entries = self.entries.clone();
        for e in overrides {
            entries.insert(e.country.clone(), e);
        }
        Self { entries }
    }

    /// Look up a country (case sensitive)
    pub fn get(&self, country: &str) -> Result<&CountryRiskData, RateError> {
        self.entries
            .get(country)
            .ok_or_else(|| RateError::UnknownCountry {
                country: country.to_string(),
                available: self.countries().map(str::to_string).collect(),
            })
    }

    /// Country names in sorted order
    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Mature-market ERP, taken from the United States entry
    pub fn mature_market_erp(&self) -> Result<f64, RateError> {
        self.get(MATURE_MARKET).map(CountryRiskData::mature_erp)
    }
}
