//! Data models for the licence lookup.
//!
//! This module contains the record shape written to the output table,
//! the per-domain query status, and the batch summary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Column headers of the output table, in column order.
pub const FIELD_NAMES: [&str; 10] = [
    "域名",
    "主体备案号",
    "服务备案号",
    "主办单位",
    "单位性质",
    "服务名称",
    "审核时间",
    "备案地址",
    "负责人",
    "查询状态",
];

/// Placeholder for fields the API did not provide.
pub const NOT_AVAILABLE: &str = "N/A";

/// Outcome of querying a single domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryStatus {
    /// The API returned at least one filing.
    Success,
    /// The API reported that the domain has no filing (code 201).
    NotRegistered,
    /// The API, the transport, or the response body failed.
    Failed { code: i64, message: String },
    /// The API succeeded but returned an empty filing list.
    NoData,
}

impl fmt::Display for QueryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryStatus::Success => write!(f, "成功"),
            QueryStatus::NotRegistered => write!(f, "未备案"),
            QueryStatus::Failed { message, .. } => write!(f, "失败: {}", message),
            QueryStatus::NoData => write!(f, "无数据"),
        }
    }
}

impl QueryStatus {
    /// Returns an emoji representation of the status.
    pub fn emoji(&self) -> &'static str {
        match self {
            QueryStatus::Success => "✅",
            QueryStatus::NotRegistered => "❌",
            QueryStatus::Failed { .. } | QueryStatus::NoData => "⚠️",
        }
    }
}

/// The normalized filing record for one domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRecord {
    /// The queried domain, as read from the input list.
    pub domain: String,
    /// Main (entity) licence number.
    pub main_licence: String,
    /// Service (site) licence number.
    pub service_licence: String,
    /// Name of the sponsoring organisation.
    pub unit_name: String,
    /// Nature of the organisation (company, individual, ...).
    pub nature_name: String,
    /// Name of the filed service.
    pub service_name: String,
    /// Date the filing was approved.
    pub verify_time: String,
    /// Registered address of the organisation.
    pub unit_address: String,
    /// Person responsible for the filing.
    pub leader_name: String,
    /// Query outcome.
    pub status: QueryStatus,
}

impl QueryRecord {
    /// Builds a record whose five licence/unit/service fields share one
    /// placeholder and whose remaining fields are `N/A`.
    pub fn placeholder(domain: &str, fill: &str, status: QueryStatus) -> Self {
        Self {
            domain: domain.to_string(),
            main_licence: fill.to_string(),
            service_licence: fill.to_string(),
            unit_name: fill.to_string(),
            nature_name: fill.to_string(),
            service_name: fill.to_string(),
            verify_time: NOT_AVAILABLE.to_string(),
            unit_address: NOT_AVAILABLE.to_string(),
            leader_name: NOT_AVAILABLE.to_string(),
            status,
        }
    }

    /// Returns the record as a table row, ordered like [`FIELD_NAMES`].
    pub fn to_row(&self) -> [String; 10] {
        [
            self.domain.clone(),
            self.main_licence.clone(),
            self.service_licence.clone(),
            self.unit_name.clone(),
            self.nature_name.clone(),
            self.service_name.clone(),
            self.verify_time.clone(),
            self.unit_address.clone(),
            self.leader_name.clone(),
            self.status.to_string(),
        ]
    }
}

/// Counts of records per outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuerySummary {
    /// Domains with at least one filing.
    pub success: usize,
    /// Domains with no filing.
    pub not_registered: usize,
    /// Domains whose query failed or returned no data.
    pub failed: usize,
    /// Total number of domains.
    pub total: usize,
}

impl QuerySummary {
    /// Creates a summary from a list of records.
    pub fn from_records(records: &[QueryRecord]) -> Self {
        let mut summary = Self {
            total: records.len(),
            ..Self::default()
        };

        for record in records {
            match record.status {
                QueryStatus::Success => summary.success += 1,
                QueryStatus::NotRegistered => summary.not_registered += 1,
                QueryStatus::Failed { .. } | QueryStatus::NoData => summary.failed += 1,
            }
        }

        summary
    }
}

/// Metadata about a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchMetadata {
    /// Endpoint the domains were queried against.
    pub api_url: String,
    /// Date and time the batch finished.
    pub query_date: DateTime<Utc>,
    /// Number of domains queried.
    pub domains_queried: usize,
    /// Duration of the batch in seconds.
    pub duration_seconds: f64,
}

/// The complete result of a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub metadata: BatchMetadata,
    pub records: Vec<QueryRecord>,
    pub summary: QuerySummary,
}
