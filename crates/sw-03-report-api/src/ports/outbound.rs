//! # Outbound Ports (Driven Ports)
//!
//! Report persistence. The API only ever talks to [`ReportStore`]; schema and
//! migrations belong to whichever adapter implements it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use shared_types::{Address, Report, ReportId, ReportStatus, ReportType};
use thiserror::Error;

/// Storage failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The backing store cannot be reached
    #[error("report store unavailable: {0}")]
    Unavailable(String),
    /// Any other storage failure
    #[error("report store error: {0}")]
    Internal(String),
}

/// A validated submission, before the store assigns identity and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReport {
    pub report_type: ReportType,
    pub target_value: String,
    pub description: String,
    pub reporter_address: Address,
    pub user_id: Option<String>,
    pub anchor_on_chain: bool,
    pub on_chain_tx_hash: Option<String>,
    pub contract_id: Option<String>,
    pub report_hash: Option<String>,
}

impl NewReport {
    /// Materialize with store-assigned `id` at time `now`.
    ///
    /// New reports start `pending` with zero votes.
    pub fn into_report(self, id: ReportId, now: DateTime<Utc>) -> Report {
        Report {
            id,
            report_type: self.report_type,
            target_value: self.target_value,
            description: self.description,
            reporter_address: self.reporter_address,
            user_id: self.user_id,
            anchor_on_chain: self.anchor_on_chain,
            on_chain_tx_hash: self.on_chain_tx_hash,
            contract_id: self.contract_id,
            report_hash: self.report_hash,
            vote_score: 0,
            upvotes: 0,
            downvotes: 0,
            status: ReportStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportPatch {
    pub description: Option<String>,
    pub status: Option<ReportStatus>,
    pub anchor_on_chain: Option<bool>,
    pub on_chain_tx_hash: Option<String>,
    pub report_hash: Option<String>,
    pub contract_id: Option<String>,
    pub vote_score: Option<i64>,
    pub upvotes: Option<u64>,
    pub downvotes: Option<u64>,
}

impl ReportPatch {
    /// Apply the patch and refresh `updated_at`.
    ///
    /// Patching a counter without an explicit `vote_score` recomputes the score.
    pub fn apply(self, report: &mut Report, now: DateTime<Utc>) {
        let counters_only =
            self.vote_score.is_none() && (self.upvotes.is_some() || self.downvotes.is_some());

        if let Some(v) = self.description {
            report.description = v;
        }
        if let Some(v) = self.status {
            report.status = v;
        }
        if let Some(v) = self.anchor_on_chain {
            report.anchor_on_chain = v;
        }
        if let Some(v) = self.on_chain_tx_hash {
            report.on_chain_tx_hash = Some(v);
        }
        if let Some(v) = self.report_hash {
            report.report_hash = Some(v);
        }
        if let Some(v) = self.contract_id {
            report.contract_id = Some(v);
        }
        if let Some(v) = self.vote_score {
            report.vote_score = v;
        }
        if let Some(v) = self.upvotes {
            report.upvotes = v;
        }
        if let Some(v) = self.downvotes {
            report.downvotes = v;
        }
        if counters_only {
            report.recompute_vote_score();
        }
        report.updated_at = now;
    }
}

/// List filters, combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilter {
    pub status: Option<ReportStatus>,
    pub report_type: Option<ReportType>,
    /// Case-insensitive substring of target value or description
    pub search: Option<String>,
}

impl ReportFilter {
    pub fn matches(&self, report: &Report) -> bool {
        if self.status.is_some_and(|s| s != report.status) {
            return false;
        }
        if self.report_type.is_some_and(|t| t != report.report_type) {
            return false;
        }
        match &self.search {
            Some(needle) if !needle.is_empty() => {
                let needle = needle.to_lowercase();
                report.target_value.to_lowercase().contains(&needle)
                    || report.description.to_lowercase().contains(&needle)
            }
            _ => true,
        }
    }
}

/// One-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn offset(&self) -> usize {
        (self.page.max(1) as usize - 1) * self.limit as usize
    }
}

/// A page of reports plus the total matching the filter.
#[derive(Debug, Clone, Serialize)]
pub struct ReportPage {
    pub reports: Vec<Report>,
    pub total: usize,
}

/// Report persistence.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Persist a new report and return it with id and timestamps.
    async fn insert(&self, report: NewReport) -> Result<Report, StoreError>;

    async fn get(&self, id: ReportId) -> Result<Option<Report>, StoreError>;

    /// Matching reports, newest first.
    async fn list(&self, filter: &ReportFilter, page: PageRequest) -> Result<ReportPage, StoreError>;

    /// Apply `patch`; `None` if the report does not exist.
    async fn update(&self, id: ReportId, patch: ReportPatch) -> Result<Option<Report>, StoreError>;

    /// Remove a report; `false` if it did not exist.
    async fn delete(&self, id: ReportId) -> Result<bool, StoreError>;

    /// Record one vote and recompute the score; `None` if the report does not exist.
    async fn vote(&self, id: ReportId, upvote: bool) -> Result<Option<Report>, StoreError>;

    /// Every report, for aggregate statistics.
    async fn all(&self) -> Result<Vec<Report>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> Report {
        NewReport {
            report_type: ReportType::PhishingUrl,
            target_value: "https://MetaMask-Airdrop.example".into(),
            description: "Drains wallets".into(),
            reporter_address: Address::new([1; 20]),
            user_id: None,
            anchor_on_chain: false,
            on_chain_tx_hash: None,
            contract_id: None,
            report_hash: None,
        }
        .into_report(1, Utc::now())
    }

    #[test]
    fn test_new_report_defaults() {
        let r = report();
        assert_eq!(r.status, ReportStatus::Pending);
        assert_eq!((r.vote_score, r.upvotes, r.downvotes), (0, 0, 0));
        assert_eq!(r.created_at, r.updated_at);
    }

    #[test]
    fn test_filter_search_is_case_insensitive() {
        let filter = ReportFilter {
            search: Some("metamask".into()),
            ..Default::default()
        };
        assert!(filter.matches(&report()));

        let filter = ReportFilter {
            search: Some("DRAINS".into()),
            ..Default::default()
        };
        assert!(filter.matches(&report()));
    }

    #[test]
    fn test_filters_are_anded() {
        let filter = ReportFilter {
            status: Some(ReportStatus::Pending),
            report_type: Some(ReportType::ScamWallet),
            search: None,
        };
        assert!(!filter.matches(&report()));
    }

    #[test]
    fn test_patch_touches_only_given_fields() {
        let mut r = report();
        let before = r.clone();
        let later = before.updated_at + chrono::Duration::seconds(5);

        ReportPatch {
            status: Some(ReportStatus::Verified),
            on_chain_tx_hash: Some("0xabc".into()),
            ..Default::default()
        }
        .apply(&mut r, later);

        assert_eq!(r.status, ReportStatus::Verified);
        assert_eq!(r.on_chain_tx_hash.as_deref(), Some("0xabc"));
        assert_eq!(r.description, before.description);
        assert_eq!(r.updated_at, later);
        assert_eq!(r.created_at, before.created_at);
    }

    #[test]
    fn test_patching_counters_recomputes_score() {
        let mut r = report();
        let now = r.updated_at;

        ReportPatch {
            upvotes: Some(7),
            downvotes: Some(2),
            ..Default::default()
        }
        .apply(&mut r, now);
        assert_eq!(r.vote_score, 5);

        ReportPatch {
            downvotes: Some(10),
            ..Default::default()
        }
        .apply(&mut r, now);
        assert_eq!(r.vote_score, -3);

        ReportPatch {
            upvotes: Some(1),
            vote_score: Some(42),
            ..Default::default()
        }
        .apply(&mut r, now);
        assert_eq!(r.vote_score, 42);
    }

    #[test]
    fn test_page_offset() {
        assert_eq!(PageRequest { page: 1, limit: 20 }.offset(), 0);
        assert_eq!(PageRequest { page: 3, limit: 10 }.offset(), 20);
    }
}
