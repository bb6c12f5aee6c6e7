//! # ScamWatch Server
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging (`RUST_LOG`, `SW_LOG_FORMAT=json`)
//! 2. Load configuration (defaults, `SW_CONFIG` file, `SW_*` overrides)
//! 3. Bind the report API
//! 4. Serve until Ctrl+C, then drain in-flight requests

use anyhow::{Context, Result};
use node_runtime::config::LOG_FORMAT_VAR;
use node_runtime::logging::{self, LogFormat};
use node_runtime::{load_config, ConfigSource};
use sw_03_report_api::ReportApiService;
use tracing::{error, info};

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        return;
    }
    info!("Initiating graceful shutdown...");
}

#[tokio::main]
async fn main() -> Result<()> {
    let format = LogFormat::from_env_value(std::env::var(LOG_FORMAT_VAR).ok().as_deref());
    logging::init(format).map_err(|e| anyhow::anyhow!(e))?;

    let config = load_config(&ConfigSource::from_env()).context("Failed to load configuration")?;

    info!("===========================================");
    info!("  ScamWatch v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");

    let service =
        ReportApiService::with_defaults(config).context("Failed to create report API")?;
    let listener = service
        .bind()
        .await
        .context("Failed to bind HTTP listener")?;

    service
        .serve(listener, shutdown_signal())
        .await
        .context("Report API terminated with an error")?;

    info!("Shutdown complete");
    Ok(())
}
