//! Tests for the command-line pipeline
//!
//! Tests are organized by topic:
//! - `pipeline` - Settings through run, report and exports on real files

mod pipeline;
