//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation. Settings left unset here fall back to
//! `.icpquery.toml` and then to built-in defaults.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// icpquery - batch ICP filing lookup
///
/// Reads a list of domains, queries the ICP licence API for each one in
/// turn, and writes the filing records to a CSV file.
///
/// Examples:
///   icpquery --appcode <APPCODE> --input domains.txt
///   icpquery --input domains.txt --output result.json --format json
///   icpquery --debug-domain baidu.com
///   icpquery --input domains.txt --dry-run
///   icpquery --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Domain list file (one per line, '#' starts a comment)
    ///
    /// Default: from config or 1.txt
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output file path
    ///
    /// Default: from config or icp_results.csv
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// APPCODE for the licence API
    #[arg(long, value_name = "CODE", env = "ICPQUERY_APPCODE", hide_env_values = true)]
    pub appcode: Option<String>,

    /// Licence API endpoint URL
    #[arg(long, value_name = "URL", env = "ICPQUERY_API_URL")]
    pub api_url: Option<String>,

    /// Pause between requests in milliseconds
    ///
    /// Raise this if the API starts rejecting requests. Default: from config or 300.
    #[arg(long, value_name = "MS")]
    pub delay_ms: Option<u64>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Output format (csv, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .icpquery.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Query a single domain and print the raw response and parsed record
    ///
    /// Nothing is written to disk.
    #[arg(long, value_name = "DOMAIN", conflicts_with = "dry_run")]
    pub debug_domain: Option<String>,

    /// Dry run: read the domain list without calling the API
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .icpquery.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the results.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// CSV with Chinese headers (default)
    #[default]
    Csv,
    /// JSON report with metadata and summary
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref url) = self.api_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("API URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if let Some(ref domain) = self.debug_domain {
            if domain.trim().is_empty() {
                return Err("--debug-domain needs a domain".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `config_verbose` is `[general] verbose` from the config file; `--quiet` wins over both.
    pub fn log_level(&self, config_verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || config_verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
