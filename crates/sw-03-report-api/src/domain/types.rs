//! Request and response bodies of the report API.
//!
//! Incoming bodies keep every field optional so that missing or empty values
//! produce the API's own 400 messages instead of a deserializer error.

use crate::domain::config::LimitsConfig;
use crate::domain::error::ApiError;
use crate::ports::outbound::{NewReport, PageRequest, ReportFilter, ReportPatch};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{Address, Report, ReportId, ReportStatus, ReportType};

// =============================================================================
// Envelope
// =============================================================================

/// `{ "success": true, "data": ... }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

// =============================================================================
// Create
// =============================================================================

/// `POST /api/reports` body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportRequest {
    pub report_type: Option<String>,
    pub target_value: Option<String>,
    pub description: Option<String>,
    pub reporter_address: Option<String>,
    pub anchor_on_chain: Option<bool>,
    pub on_chain_tx_hash: Option<String>,
    pub contract_id: Option<String>,
    pub report_hash: Option<String>,
    pub user_id: Option<String>,
    /// `personal_sign` signature over the authorship message
    pub signature: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl CreateReportRequest {
    /// Check required fields and split off the signature.
    pub fn validate(self) -> Result<(NewReport, Option<String>), ApiError> {
        let (Some(report_type), Some(target_value), Some(description), Some(reporter)) = (
            present(self.report_type),
            present(self.target_value),
            present(self.description),
            present(self.reporter_address),
        ) else {
            return Err(ApiError::bad_request(
                "reportType, targetValue, description, and reporterAddress are required",
            ));
        };

        let report_type: ReportType = report_type
            .parse()
            .map_err(|e: shared_types::ReportFieldError| ApiError::bad_request(e.to_string()))?;

        let reporter_address: Address = reporter
            .trim()
            .parse()
            .map_err(|_| ApiError::bad_request("reporterAddress must be a valid wallet address"))?;

        let report = NewReport {
            report_type,
            target_value,
            description,
            reporter_address,
            user_id: present(self.user_id),
            anchor_on_chain: self.anchor_on_chain.unwrap_or(false),
            on_chain_tx_hash: present(self.on_chain_tx_hash),
            contract_id: present(self.contract_id),
            report_hash: present(self.report_hash),
        };

        Ok((report, present(self.signature)))
    }
}

// =============================================================================
// Update / Vote
// =============================================================================

/// `PATCH /api/reports/{id}` body. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReportRequest {
    pub description: Option<String>,
    pub status: Option<String>,
    pub anchor_on_chain: Option<bool>,
    pub on_chain_tx_hash: Option<String>,
    pub report_hash: Option<String>,
    pub contract_id: Option<String>,
    pub vote_score: Option<i64>,
    pub upvotes: Option<u64>,
    pub downvotes: Option<u64>,
}

impl UpdateReportRequest {
    pub fn into_patch(self) -> Result<ReportPatch, ApiError> {
        let status = self
            .status
            .map(|s| s.parse::<ReportStatus>())
            .transpose()
            .map_err(|e| ApiError::bad_request(e.to_string()))?;

        for (field, count) in [("upvotes", self.upvotes), ("downvotes", self.downvotes)] {
            if count.is_some_and(|c| c > i64::MAX as u64) {
                return Err(ApiError::bad_request(format!(
                    "{} must be at most {}",
                    field,
                    i64::MAX
                )));
            }
        }

        Ok(ReportPatch {
            description: self.description,
            status,
            anchor_on_chain: self.anchor_on_chain,
            on_chain_tx_hash: self.on_chain_tx_hash,
            report_hash: self.report_hash,
            contract_id: self.contract_id,
            vote_score: self.vote_score,
            upvotes: self.upvotes,
            downvotes: self.downvotes,
        })
    }
}

/// Vote direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Up,
    Down,
}

/// `POST /api/reports/{id}/vote` body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub voter_address: Option<String>,
    pub direction: Option<String>,
}

impl VoteRequest {
    pub fn validate(self) -> Result<(Address, VoteDirection), ApiError> {
        let voter: Address = present(self.voter_address)
            .ok_or_else(|| ApiError::bad_request("voterAddress and direction are required"))?
            .trim()
            .parse()
            .map_err(|_| ApiError::bad_request("voterAddress must be a valid wallet address"))?;

        let direction = match self.direction.as_deref() {
            Some("up") => VoteDirection::Up,
            Some("down") => VoteDirection::Down,
            Some(_) => return Err(ApiError::bad_request("direction must be either 'up' or 'down'")),
            None => return Err(ApiError::bad_request("voterAddress and direction are required")),
        };

        Ok((voter, direction))
    }
}

// =============================================================================
// List
// =============================================================================

/// `GET /api/reports` query string.
///
/// Values stay raw so that junk `page`/`limit` falls back to defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub status: Option<String>,
    pub report_type: Option<String>,
    pub search: Option<String>,
}

impl ListQuery {
    /// Resolve paging: page defaults to 1, limit to the configured default,
    /// limit is capped at the configured maximum, both are floored at 1.
    pub fn page_request(&self, limits: &LimitsConfig) -> PageRequest {
        let parse = |v: &Option<String>| v.as_deref().and_then(|s| s.trim().parse::<i64>().ok());

        let page = parse(&self.page).unwrap_or(1).clamp(1, u32::MAX as i64) as u32;
        let limit = parse(&self.limit)
            .unwrap_or(limits.default_page_size as i64)
            .clamp(1, limits.max_page_size as i64) as u32;

        PageRequest { page, limit }
    }

    pub fn filter(&self) -> Result<ReportFilter, ApiError> {
        fn non_empty(v: &Option<String>) -> Option<&str> {
            v.as_deref().filter(|s| !s.is_empty())
        }

        let status = non_empty(&self.status)
            .map(str::parse::<ReportStatus>)
            .transpose()
            .map_err(|e| ApiError::bad_request(e.to_string()))?;
        let report_type = non_empty(&self.report_type)
            .map(str::parse::<ReportType>)
            .transpose()
            .map_err(|e| ApiError::bad_request(e.to_string()))?;

        Ok(ReportFilter {
            status,
            report_type,
            search: non_empty(&self.search).map(str::to_string),
        })
    }
}

/// Reporter block of a list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReporterSummary {
    pub wallet_address: Address,
}

/// Compact list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub id: ReportId,
    pub report_type: ReportType,
    pub target_value: String,
    pub description: String,
    pub report_hash: Option<String>,
    pub is_anchored_on_chain: bool,
    pub on_chain_tx_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub reporter: ReporterSummary,
}

impl From<Report> for ReportSummary {
    fn from(report: Report) -> Self {
        Self {
            id: report.id,
            report_type: report.report_type,
            target_value: report.target_value,
            description: report.description,
            report_hash: report.report_hash,
            is_anchored_on_chain: report.anchor_on_chain,
            on_chain_tx_hash: report.on_chain_tx_hash,
            created_at: report.created_at,
            reporter: ReporterSummary {
                wallet_address: report.reporter_address,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: usize,
    pub total_pages: usize,
}

impl Pagination {
    pub fn new(page: PageRequest, total: usize) -> Self {
        Self {
            page: page.page,
            limit: page.limit,
            total,
            total_pages: total.div_ceil(page.limit.max(1) as usize),
        }
    }
}

/// `GET /api/reports` data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportList {
    pub reports: Vec<ReportSummary>,
    pub pagination: Pagination,
}

// =============================================================================
// Stats
// =============================================================================

/// `GET /api/reports/stats` data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportStats {
    pub total_reports: usize,
    pub anchored_reports: usize,
    pub phishing_reports: usize,
    pub scam_wallet_reports: usize,
    /// Distinct reporter addresses
    pub total_users: usize,
    /// One decimal place, `"0"` when there are no reports
    pub anchored_percentage: String,
}

impl ReportStats {
    pub fn from_reports(reports: &[Report]) -> Self {
        let total_reports = reports.len();
        let anchored_reports = reports.iter().filter(|r| r.anchor_on_chain).count();
        let count_type = |t: ReportType| reports.iter().filter(|r| r.report_type == t).count();
        let total_users = reports
            .iter()
            .map(|r| r.reporter_address)
            .collect::<std::collections::HashSet<_>>()
            .len();

        let anchored_percentage = if total_reports > 0 {
            format!("{:.1}", anchored_reports as f64 / total_reports as f64 * 100.0)
        } else {
            "0".to_string()
        };

        Self {
            total_reports,
            anchored_reports,
            phishing_reports: count_type(ReportType::PhishingUrl),
            scam_wallet_reports: count_type(ReportType::ScamWallet),
            total_users,
            anchored_percentage,
        }
    }
}
