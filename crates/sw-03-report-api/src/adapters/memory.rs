//! In-memory [`ReportStore`].
//!
//! Reports live in a `BTreeMap` behind a `parking_lot::RwLock`. Ids are
//! assigned sequentially from 1 and never reused.

use crate::ports::outbound::{
    NewReport, PageRequest, ReportFilter, ReportPage, ReportPatch, ReportStore, StoreError,
};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use shared_types::{Report, ReportId};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Default)]
struct StoreInner {
    last_id: ReportId,
    reports: BTreeMap<ReportId, Report>,
}

/// Process-local report store.
#[derive(Default)]
pub struct InMemoryReportStore {
    inner: RwLock<StoreInner>,
}

impl InMemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ReportStore for InMemoryReportStore {
    async fn insert(&self, report: NewReport) -> Result<Report, StoreError> {
        let mut inner = self.inner.write();
        inner.last_id += 1;
        let report = report.into_report(inner.last_id, Utc::now());
        inner.reports.insert(report.id, report.clone());
        debug!(id = report.id, "report stored");
        Ok(report)
    }

    async fn get(&self, id: ReportId) -> Result<Option<Report>, StoreError> {
        Ok(self.inner.read().reports.get(&id).cloned())
    }

    async fn list(&self, filter: &ReportFilter, page: PageRequest) -> Result<ReportPage, StoreError> {
        let inner = self.inner.read();
        let mut matching: Vec<&Report> = inner
            .reports
            .values()
            .filter(|r| filter.matches(r))
            .collect();

        // Newest first; ids break timestamp ties
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = matching.len();
        let reports = matching
            .into_iter()
            .skip(page.offset())
            .take(page.limit as usize)
            .cloned()
            .collect();

        Ok(ReportPage { reports, total })
    }

    async fn update(&self, id: ReportId, patch: ReportPatch) -> Result<Option<Report>, StoreError> {
        let mut inner = self.inner.write();
        let Some(report) = inner.reports.get_mut(&id) else {
            return Ok(None);
        };
        patch.apply(report, Utc::now());
        Ok(Some(report.clone()))
    }

    async fn delete(&self, id: ReportId) -> Result<bool, StoreError> {
        Ok(self.inner.write().reports.remove(&id).is_some())
    }

    async fn vote(&self, id: ReportId, upvote: bool) -> Result<Option<Report>, StoreError> {
        let mut inner = self.inner.write();
        let Some(report) = inner.reports.get_mut(&id) else {
            return Ok(None);
        };
        if upvote {
            report.upvotes = report.upvotes.saturating_add(1);
        } else {
            report.downvotes = report.downvotes.saturating_add(1);
        }
        report.recompute_vote_score();
        report.updated_at = Utc::now();
        Ok(Some(report.clone()))
    }

    async fn all(&self) -> Result<Vec<Report>, StoreError> {
        Ok(self.inner.read().reports.values().cloned().collect())
    }
}
