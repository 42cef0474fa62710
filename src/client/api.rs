//! HTTP client for the licence query API.
//!
//! One form-encoded POST per domain. Every failure is folded into the
//! API's own error shape (`success: false`, `code: 999`) so callers always
//! get a JSON value to normalize.

use crate::error::QueryError;
use crate::normalizer::CODE_UNKNOWN;
use anyhow::{Context, Result};
use reqwest::header::AUTHORIZATION;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

/// Default licence query endpoint.
pub const DEFAULT_API_URL: &str = "https://lhappbass.market.alicloudapi.com/app/licence/query";

/// Header the API gateway uses to explain rejected requests.
const GATEWAY_ERROR_HEADER: &str = "x-ca-error-message";

/// Configuration for the client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub appcode: String,
    pub timeout_seconds: u64,
    /// Result page requested from the API.
    pub page: u32,
    /// Honour HTTP(S)_PROXY from the environment.
    pub use_system_proxy: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            appcode: String::new(),
            timeout_seconds: 30,
            page: 1,
            use_system_proxy: true,
        }
    }
}

impl From<&crate::config::ApiConfig> for ClientConfig {
    fn from(config: &crate::config::ApiConfig) -> Self {
        Self {
            api_url: config.url.clone(),
            appcode: config.appcode.clone(),
            timeout_seconds: config.timeout_seconds,
            page: config.page,
            use_system_proxy: config.use_system_proxy,
        }
    }
}

/// Something that can look up the filing record of a domain.
///
/// Implementations must not fail: errors are reported in the returned
/// value using the API's error shape.
#[allow(async_fn_in_trait)]
pub trait LicenceLookup {
    async fn query(&self, domain: &str) -> Value;
}

/// The licence API client.
pub struct IcpClient {
    config: ClientConfig,
    http_client: reqwest::Client,
}

impl IcpClient {
    /// Create a new client.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder =
            reqwest::Client::builder().timeout(Duration::from_secs(config.timeout_seconds));
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }

        let http_client = builder
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// The endpoint this client posts to.
    pub fn api_url(&self) -> &str {
        &self.config.api_url
    }

    async fn try_query(&self, domain: &str) -> Result<Value, QueryError> {
        let page = self.config.page.to_string();

        debug!("POST {} keyword={}", self.config.api_url, domain);

        let response = self
            .http_client
            .post(&self.config.api_url)
            .header(AUTHORIZATION, format!("APPCODE {}", self.config.appcode))
            .form(&[("keyword", domain), ("page", page.as_str())])
            .send()
            .await?;

        let status = response.status();
        let gateway_message = response
            .headers()
            .get(GATEWAY_ERROR_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let body = response.text().await?;
        debug!("Response {} ({} bytes) for {}", status, body.len(), domain);

        if body.trim().is_empty() {
            if status.is_success() {
                return Err(QueryError::EmptyResponse);
            }
            return Err(QueryError::Gateway {
                status: status.as_u16(),
                gateway_message,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

impl LicenceLookup for IcpClient {
    async fn query(&self, domain: &str) -> Value {
        match self.try_query(domain).await {
            Ok(value) => value,
            Err(e) => {
                warn!("Query for {} failed: {}", domain, e);
                error_response(&e)
            }
        }
    }
}

/// Build the API-shaped error object for a client-side failure.
pub fn error_response(error: &QueryError) -> Value {
    json!({
        "success": false,
        "code": CODE_UNKNOWN,
        "msg": error.to_string(),
    })
}
