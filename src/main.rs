//! icpquery - batch ICP filing lookup
//!
//! A CLI tool that queries the ICP licence API for every domain in a list
//! and writes the normalized filing records to CSV (or JSON).
//!
//! Exit codes:
//!   0 - Success (individual domains may still have failed; see the status column)
//!   1 - Runtime error (bad arguments, unreadable input, no domains, write failure)

mod batch;
mod cli;
mod client;
mod config;
mod error;
mod models;
mod normalizer;
mod report;
mod source;

use anyhow::{bail, Context, Result};
use batch::{BatchConfig, BatchRunner};
use chrono::Utc;
use cli::{Args, OutputFormat};
use client::{ClientConfig, IcpClient, LicenceLookup};
use config::{Config, CONFIG_FILE_NAME};
use models::{BatchMetadata, BatchReport, QuerySummary};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Config is loaded before logging so `[general] verbose` can raise the level
    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(&args, &config);

    info!("icpquery v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    let result = if let Some(ref domain) = args.debug_domain {
        run_debug_domain(&config, domain).await
    } else {
        run_batch(&args, &config).await
    };

    if let Err(e) = result {
        error!("Run failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .icpquery.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Add your APPCODE under [api], or set ICPQUERY_APPCODE.");
    Ok(())
}

/// Initialize logging based on verbosity settings. RUST_LOG, when set, takes over.
fn init_logging(args: &Args, config: &Config) {
    let level = args.log_level(config.general.verbose);
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: failed to set tracing subscriber: {}", e);
    }
}

/// Load configuration from file or use defaults, then apply CLI overrides.
///
/// Runs before logging is set up, so problems go straight to stderr.
fn load_config(args: &Args) -> Result<Config> {
    let mut config = if let Some(ref config_path) = args.config {
        Config::load(config_path)?
    } else {
        match Config::load_default() {
            Ok(Some(config)) => config,
            Ok(None) => Config::default(),
            Err(e) => {
                eprintln!("⚠️  Failed to load {}: {:#}", CONFIG_FILE_NAME, e);
                Config::default()
            }
        }
    };

    config.merge_with_args(args);
    Ok(config)
}

/// Run the full batch: read, query, write, summarize.
async fn run_batch(args: &Args, config: &Config) -> Result<()> {
    let start_time = Instant::now();
    let input = PathBuf::from(&config.general.input);
    let output = PathBuf::from(&config.general.output);

    // Step 1: Read the domain list
    println!("📥 正在读取域名列表: {}", input.display());
    let domains = source::read_domains(&input)?;

    if domains.is_empty() {
        bail!("在文件 {} 中未找到有效的域名", input.display());
    }
    println!("   找到 {} 个待查询域名", domains.len());

    if args.dry_run {
        return handle_dry_run(&domains);
    }

    config.ensure_api_ready()?;

    // Step 2: Query every domain
    let client = IcpClient::new(ClientConfig::from(&config.api))?;
    let batch_config = BatchConfig {
        delay: Duration::from_millis(config.batch.delay_ms),
        show_progress: !args.quiet,
    };

    println!("\n🔎 开始批量查询备案信息...");
    println!("{}", "-".repeat(80));

    let records = BatchRunner::new(&client, batch_config).run(&domains).await;

    println!("{}", "-".repeat(80));
    println!("批量查询完成！");

    // Step 3: Write the results
    let summary = QuerySummary::from_records(&records);

    match config.general.format {
        OutputFormat::Csv => report::write_csv_report(&records, &output)?,
        OutputFormat::Json => {
            let report = BatchReport {
                metadata: BatchMetadata {
                    api_url: client.api_url().to_string(),
                    query_date: Utc::now(),
                    domains_queried: records.len(),
                    duration_seconds: start_time.elapsed().as_secs_f64(),
                },
                records,
                summary: summary.clone(),
            };
            report::write_json_report(&report, &output)?;
        }
    }

    println!("\n✅ 结果已保存到: {}", output.display());
    report::console::print_summary(&summary);
    info!(
        "Finished {} domains in {:.1}s",
        summary.total,
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

/// Handle --dry-run: print the domains that would be queried.
fn handle_dry_run(domains: &[String]) -> Result<()> {
    println!("\n🔍 Dry run: no API calls will be made.\n");

    for (i, domain) in domains.iter().enumerate() {
        println!("   [{:03}] {}", i + 1, domain);
    }

    println!("\n✅ Dry run complete. {} domains would be queried.", domains.len());
    Ok(())
}

/// Handle --debug-domain: query one domain and show raw and parsed results.
async fn run_debug_domain(config: &Config, domain: &str) -> Result<()> {
    config.ensure_api_ready()?;

    let domain = source::single_domain(domain)?;
    let client = IcpClient::new(ClientConfig::from(&config.api))?;

    println!("调试查询: {}", domain);
    println!("{}", "=".repeat(60));

    let raw = client.query(domain).await;
    println!("API原始响应:");
    println!(
        "{}",
        serde_json::to_string_pretty(&raw).context("Failed to format API response")?
    );
    println!("{}", "=".repeat(60));

    let record = normalizer::normalize(&raw, domain);
    println!("解析后的结果:");
    report::console::print_record(&record);

    Ok(())
}
