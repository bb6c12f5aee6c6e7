//! # Report API Subsystem (SW-03)
//!
//! REST interface for the scam report lifecycle: submit, browse, update,
//! vote, delete and aggregate statistics.
//!
//! # Architecture
//!
//! ```text
//!   HTTP ──▶ CORS → Tracing/Metrics → Timeout → BodyLimit ──▶ handlers
//!                                                     │
//!                       ┌─────────────────────────────┼───────────────────┐
//!                       ▼                             ▼                   ▼
//!             SignatureVerificationApi          ReportStore          ApiMetrics
//!                  (sw-01)                (in-memory adapter)
//! ```
//!
//! # Authorship
//!
//! A submission may carry a wallet signature over
//! [`shared_types::authorship_message`]. A signature that does not recover to
//! `reporterAddress` is rejected with 401. Unsigned submissions are accepted
//! unless `security.require_signed_reports` is set.
//!
//! # Usage
//!
//! ```ignore
//! use sw_03_report_api::{ApiConfig, InMemoryReportStore, ReportApiService};
//!
//! let service = ReportApiService::with_defaults(ApiConfig::default())?;
//! let listener = service.bind().await?;
//! service.serve(listener, shutdown_signal()).await?;
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod domain;
pub mod handlers;
pub mod middleware;
pub mod ports;
pub mod router;
pub mod service;

// Re-export main types
pub use adapters::memory::InMemoryReportStore;
pub use domain::config::{ApiConfig, ConfigError, CorsConfig, HttpConfig, LimitsConfig, SecurityConfig};
pub use domain::error::{ApiError, ServiceError};
pub use domain::types::{
    CreateReportRequest, ListQuery, Pagination, ReportList, ReportStats, ReportSummary,
    UpdateReportRequest, VoteDirection, VoteRequest,
};
pub use middleware::ApiMetrics;
pub use ports::outbound::{NewReport, PageRequest, ReportFilter, ReportPage, ReportPatch, ReportStore, StoreError};
pub use router::{build_router, AppState};
pub use service::ReportApiService;
