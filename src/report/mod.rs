//! Report generation modules.
//!
//! This module writes batch results to CSV or JSON and formats the
//! console progress output.

pub mod console;
pub mod generator;

pub use generator::{write_csv_report, write_json_report};
