//! Sequential batch query loop.
//!
//! Domains are queried one at a time, in input order, with a fixed pause
//! between requests to stay under the API's rate limit. Every domain yields
//! exactly one record, whatever happened to its request.

use crate::client::LicenceLookup;
use crate::models::QueryRecord;
use crate::normalizer::normalize;
use crate::report::console::{query_line, status_line};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::{debug, info};

/// Configuration for a batch run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Pause between consecutive requests.
    pub delay: Duration,
    /// Print per-domain progress lines.
    pub show_progress: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(300),
            show_progress: true,
        }
    }
}

/// Runs the query loop over a domain list.
pub struct BatchRunner<'a, C: LicenceLookup> {
    client: &'a C,
    config: BatchConfig,
}

impl<'a, C: LicenceLookup> BatchRunner<'a, C> {
    pub fn new(client: &'a C, config: BatchConfig) -> Self {
        Self { client, config }
    }

    /// Query every domain and return one record per domain, in order.
    pub async fn run(&self, domains: &[String]) -> Vec<QueryRecord> {
        let total = domains.len();
        let progress = self.progress_bar(total);
        let mut records = Vec::with_capacity(total);

        info!("Querying {} domains", total);

        for (i, domain) in domains.iter().enumerate() {
            self.emit(&progress, query_line(i + 1, total, domain));

            let raw = self.client.query(domain).await;
            debug!("Raw response for {}: {}", domain, raw);

            let record = normalize(&raw, domain);
            self.emit(&progress, status_line(&record));
            records.push(record);
            progress.inc(1);

            if i + 1 < total && !self.config.delay.is_zero() {
                tokio::time::sleep(self.config.delay).await;
            }
        }

        progress.finish_and_clear();
        records
    }

    fn progress_bar(&self, total: usize) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb
    }

    fn emit(&self, progress: &ProgressBar, line: String) {
        if !self.config.show_progress {
            return;
        }

        // A hidden bar (no terminal) drops println output.
        if progress.is_hidden() {
            println!("{}", line);
        } else {
            progress.println(line);
        }
    }
}
