//! Command-line front end for the frontier estimator
//!
//! Loads settings, resolves the country risk-free rate, runs the core
//! pipeline over price files and prints a report, optionally exporting the
//! trial cloud (CSV) and a run summary (JSON).

// ============================================================================
// Modules
// ============================================================================

pub mod logging;
pub mod report;
pub mod run;
pub mod settings;
pub mod util;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use logging::init_logging;
pub use report::render_report;
pub use run::{RunReport, RunSummary, run, write_outputs};
pub use settings::{Overrides, Settings, SettingsError};
