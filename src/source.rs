//! Domain list reading.
//!
//! The input is a UTF-8 text file with one domain per line. Blank lines
//! and lines starting with `#` are ignored; URLs are reduced to their host.

use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::debug;

/// Read and clean the domain list at `path`.
pub fn read_domains(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read domain list: {}", path.display()))?;

    let domains = parse_domains(&content);
    debug!("Read {} domains from {}", domains.len(), path.display());

    Ok(domains)
}

/// Parse domain list content. Order and duplicates are preserved.
pub fn parse_domains(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(clean_domain)
        .filter(|domain| !domain.is_empty())
        .map(String::from)
        .collect()
}

/// Clean a single domain given on the command line.
pub fn single_domain(raw: &str) -> Result<&str> {
    let domain = clean_domain(raw.trim());
    if domain.is_empty() {
        bail!("No domain left in {:?} after removing scheme and path", raw);
    }
    Ok(domain)
}

/// Strip a URL scheme and any path from a line.
pub fn clean_domain(line: &str) -> &str {
    let host = match line.split_once("://") {
        Some((_, rest)) => rest,
        None => line,
    };

    match host.split_once('/') {
        Some((host, _)) => host,
        None => host,
    }
}
