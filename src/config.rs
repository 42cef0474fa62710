//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.icpquery.toml` files.

use crate::client::api::DEFAULT_API_URL;
use crate::cli::OutputFormat;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".icpquery.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Licence API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Batch loop settings.
    #[serde(default)]
    pub batch: BatchSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Domain list file.
    #[serde(default = "default_input")]
    pub input: String,

    /// Output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Output format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            input: default_input(),
            output: default_output(),
            format: OutputFormat::default(),
            verbose: false,
        }
    }
}

fn default_input() -> String {
    "1.txt".to_string()
}

fn default_output() -> String {
    "icp_results.csv".to_string()
}

/// Licence API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Query endpoint.
    #[serde(default = "default_api_url")]
    pub url: String,

    /// Marketplace APPCODE. Prefer the ICPQUERY_APPCODE env var.
    #[serde(default)]
    pub appcode: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Result page to request.
    #[serde(default = "default_page")]
    pub page: u32,

    /// Honour HTTP(S)_PROXY from the environment.
    #[serde(default = "default_true")]
    pub use_system_proxy: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            appcode: String::new(),
            timeout_seconds: default_timeout(),
            page: default_page(),
            use_system_proxy: true,
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_page() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

/// Batch loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSettings {
    /// Pause between requests in milliseconds.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
        }
    }
}

fn default_delay_ms() -> u64 {
    300
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// Only values given explicitly on the command line (or via env) override.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref input) = args.input {
            self.general.input = input.display().to_string();
        }
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }
        if let Some(format) = args.format {
            self.general.format = format;
        }

        if let Some(ref appcode) = args.appcode {
            self.api.appcode = appcode.clone();
        }
        if let Some(ref url) = args.api_url {
            self.api.url = url.clone();
        }
        if let Some(timeout) = args.timeout {
            self.api.timeout_seconds = timeout;
        }

        if let Some(delay) = args.delay_ms {
            self.batch.delay_ms = delay;
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Check the API settings before any request is sent.
    pub fn ensure_api_ready(&self) -> Result<()> {
        if self.api.appcode.trim().is_empty() {
            bail!(
                "No APPCODE configured. Pass --appcode, set ICPQUERY_APPCODE, or add it to {}",
                CONFIG_FILE_NAME
            );
        }
        if !self.api.url.starts_with("http://") && !self.api.url.starts_with("https://") {
            bail!("API URL must start with 'http://' or 'https://': {}", self.api.url);
        }
        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::tests::make_args;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.input, "1.txt");
        assert_eq!(config.general.output, "icp_results.csv");
        assert_eq!(config.api.url, DEFAULT_API_URL);
        assert_eq!(config.api.page, 1);
        assert_eq!(config.batch.delay_ms, 300);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
input = "domains.txt"
format = "json"

[api]
appcode = "abc123"
timeout_seconds = 10

[batch]
delay_ms = 1000
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.input, "domains.txt");
        assert_eq!(config.general.output, "icp_results.csv");
        assert_eq!(config.general.format, OutputFormat::Json);
        assert_eq!(config.api.appcode, "abc123");
        assert_eq!(config.api.timeout_seconds, 10);
        assert_eq!(config.api.url, DEFAULT_API_URL);
        assert_eq!(config.batch.delay_ms, 1000);
    }

    #[test]
    fn test_merge_cli_overrides_file() {
        let mut config: Config = toml::from_str(
            r#"
[api]
appcode = "from-file"
timeout_seconds = 10

[batch]
delay_ms = 1000
"#,
        )
        .unwrap();

        let mut args = make_args();
        args.appcode = Some("from-cli".to_string());
        args.delay_ms = Some(50);
        config.merge_with_args(&args);

        assert_eq!(config.api.appcode, "from-cli");
        assert_eq!(config.batch.delay_ms, 50);
        // Not given on the command line, so the file value stays.
        assert_eq!(config.api.timeout_seconds, 10);
    }

    #[test]
    fn test_verbose_from_file_sets_log_level() {
        let mut config: Config = toml::from_str("[general]\nverbose = true\n").unwrap();
        let mut args = make_args();
        config.merge_with_args(&args);

        assert!(config.general.verbose);
        assert_eq!(args.log_level(config.general.verbose), tracing::Level::DEBUG);

        args.quiet = true;
        assert_eq!(args.log_level(config.general.verbose), tracing::Level::ERROR);
    }

    #[test]
    fn test_ensure_api_ready() {
        let mut config = Config::default();
        assert!(config.ensure_api_ready().is_err());

        config.api.appcode = "abc123".to_string();
        assert!(config.ensure_api_ready().is_ok());

        config.api.url = "lhappbass.market.alicloudapi.com".to_string();
        assert!(config.ensure_api_ready().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[batch]\ndelay_ms = 0\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.batch.delay_ms, 0);

        std::fs::write(&path, "[batch\n").unwrap();
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[api]"));
        assert!(toml_str.contains("[batch]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.batch.delay_ms, 300);
    }
}
