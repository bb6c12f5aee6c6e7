//! Request and report counters, exposed as JSON at `GET /metrics`.

use axum::http::StatusCode;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Report API metrics
#[derive(Debug, Default)]
pub struct ApiMetrics {
    // Request counters
    pub requests_total: AtomicU64,
    pub requests_success: AtomicU64,
    pub requests_client_error: AtomicU64,
    pub requests_server_error: AtomicU64,

    // Report lifecycle counters
    pub reports_created: AtomicU64,
    pub reports_signed: AtomicU64,
    pub reports_unsigned: AtomicU64,
    pub signature_rejections: AtomicU64,
    pub votes_cast: AtomicU64,

    // Latency tracking (simplified)
    pub total_latency_ms: AtomicU64,
    pub request_count_for_latency: AtomicU64,
}

impl ApiMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished request
    pub fn record_request(&self, status: StatusCode, latency_ms: u64) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);

        if status.is_server_error() {
            self.requests_server_error.fetch_add(1, Ordering::Relaxed);
        } else if status.is_client_error() {
            self.requests_client_error.fetch_add(1, Ordering::Relaxed);
        } else {
            self.requests_success.fetch_add(1, Ordering::Relaxed);
        }

        self.total_latency_ms.fetch_add(latency_ms, Ordering::Relaxed);
        self.request_count_for_latency
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Record a stored report and whether it carried a verified signature
    pub fn record_report_created(&self, signed: bool) {
        self.reports_created.fetch_add(1, Ordering::Relaxed);
        if signed {
            self.reports_signed.fetch_add(1, Ordering::Relaxed);
        } else {
            self.reports_unsigned.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a submission refused for its signature
    pub fn record_signature_rejection(&self) {
        self.signature_rejections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_vote(&self) {
        self.votes_cast.fetch_add(1, Ordering::Relaxed);
    }

    /// Get average latency in ms
    pub fn average_latency_ms(&self) -> f64 {
        let total = self.total_latency_ms.load(Ordering::Relaxed);
        let count = self.request_count_for_latency.load(Ordering::Relaxed);
        if count == 0 {
            0.0
        } else {
            total as f64 / count as f64
        }
    }

    /// Export metrics as JSON
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "requests": {
                "total": self.requests_total.load(Ordering::Relaxed),
                "success": self.requests_success.load(Ordering::Relaxed),
                "client_error": self.requests_client_error.load(Ordering::Relaxed),
                "server_error": self.requests_server_error.load(Ordering::Relaxed),
            },
            "reports": {
                "created": self.reports_created.load(Ordering::Relaxed),
                "signed": self.reports_signed.load(Ordering::Relaxed),
                "unsigned": self.reports_unsigned.load(Ordering::Relaxed),
                "signature_rejections": self.signature_rejections.load(Ordering::Relaxed),
                "votes": self.votes_cast.load(Ordering::Relaxed),
            },
            "latency": {
                "average_ms": self.average_latency_ms(),
            }
        })
    }
}

/// Request timing helper
pub struct RequestTimer {
    start: Instant,
    metrics: Arc<ApiMetrics>,
}

impl RequestTimer {
    pub fn new(metrics: Arc<ApiMetrics>) -> Self {
        Self {
            start: Instant::now(),
            metrics,
        }
    }

    pub fn finish(self, status: StatusCode) {
        let latency_ms = self.start.elapsed().as_millis() as u64;
        self.metrics.record_request(status, latency_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_recording() {
        let metrics = ApiMetrics::new();

        metrics.record_request(StatusCode::OK, 100);
        metrics.record_request(StatusCode::CREATED, 200);
        metrics.record_request(StatusCode::BAD_REQUEST, 50);
        metrics.record_request(StatusCode::INTERNAL_SERVER_ERROR, 50);

        assert_eq!(metrics.requests_total.load(Ordering::Relaxed), 4);
        assert_eq!(metrics.requests_success.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.requests_client_error.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.requests_server_error.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_average_latency() {
        let metrics = ApiMetrics::new();
        assert_eq!(metrics.average_latency_ms(), 0.0);

        metrics.record_request(StatusCode::OK, 100);
        metrics.record_request(StatusCode::OK, 200);
        metrics.record_request(StatusCode::OK, 300);

        assert!((metrics.average_latency_ms() - 200.0).abs() < 0.01);
    }

    #[test]
    fn test_report_counters_in_json() {
        let metrics = ApiMetrics::new();
        metrics.record_report_created(true);
        metrics.record_report_created(false);
        metrics.record_signature_rejection();

        let json = metrics.to_json();
        assert_eq!(json["reports"]["created"], 2);
        assert_eq!(json["reports"]["signed"], 1);
        assert_eq!(json["reports"]["signature_rejections"], 1);
    }
}
