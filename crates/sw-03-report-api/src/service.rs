//! Report API service: wiring and server lifecycle.

use crate::adapters::memory::InMemoryReportStore;
use crate::domain::config::ApiConfig;
use crate::domain::error::ServiceError;
use crate::middleware::ApiMetrics;
use crate::ports::outbound::ReportStore;
use crate::router::{build_router, AppState};
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use sw_01_signature_verification::{PersonalMessageVerifier, SignatureVerificationApi};
use tokio::net::TcpListener;
use tracing::info;

/// Report API service state
pub struct ReportApiService {
    config: Arc<ApiConfig>,
    store: Arc<dyn ReportStore>,
    verifier: Arc<dyn SignatureVerificationApi>,
    metrics: Arc<ApiMetrics>,
}

impl ReportApiService {
    /// Create a new service over the given store and verifier
    pub fn new(
        config: ApiConfig,
        store: Arc<dyn ReportStore>,
        verifier: Arc<dyn SignatureVerificationApi>,
    ) -> Result<Self, ServiceError> {
        config.validate()?;

        Ok(Self {
            config: Arc::new(config),
            store,
            verifier,
            metrics: Arc::new(ApiMetrics::new()),
        })
    }

    /// In-memory store and personal_sign verification.
    pub fn with_defaults(config: ApiConfig) -> Result<Self, ServiceError> {
        Self::new(
            config,
            Arc::new(InMemoryReportStore::new()),
            Arc::new(PersonalMessageVerifier::new()),
        )
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Get metrics
    pub fn metrics(&self) -> Arc<ApiMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Router with middleware and state attached
    pub fn router(&self) -> Router {
        build_router(AppState {
            store: Arc::clone(&self.store),
            verifier: Arc::clone(&self.verifier),
            config: Arc::clone(&self.config),
            metrics: Arc::clone(&self.metrics),
        })
    }

    /// Bind the configured HTTP address.
    pub async fn bind(&self) -> Result<TcpListener, ServiceError> {
        let addr = self.config.http_addr();
        let listener = TcpListener::bind(addr).await?;
        Ok(listener)
    }

    /// Serve on `listener` until `shutdown` resolves, then drain in-flight requests.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServiceError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        let router = self.router();

        info!(
            addr = %addr,
            require_signed_reports = self.config.security.require_signed_reports,
            "Starting report API"
        );

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Report API stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::ConfigError;

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = ApiConfig::default();
        config.limits.max_request_size = 0;

        let result = ReportApiService::with_defaults(config);
        assert!(matches!(
            result,
            Err(ServiceError::Config(ConfigError::InvalidLimit(_)))
        ));
    }

    #[tokio::test]
    async fn test_serve_until_shutdown() {
        let mut config = ApiConfig::default();
        config.http.host = "127.0.0.1".parse().unwrap();
        config.http.port = 0;

        let service = ReportApiService::with_defaults(config).unwrap();
        let listener = service.bind().await.unwrap();
        let addr = listener.local_addr().unwrap();
        assert_ne!(addr.port(), 0);

        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let server = tokio::spawn(service.serve(listener, async move {
            let _ = rx.await;
        }));

        let _ = tx.send(());
        server.await.unwrap().unwrap();
    }
}
