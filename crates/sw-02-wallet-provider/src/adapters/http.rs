//! # HTTP JSON-RPC Provider
//!
//! Forwards EIP-1193 requests to a JSON-RPC endpoint, e.g. a development node
//! with unlocked accounts. HTTP has no push channel, so event registration
//! yields detached handles.

use crate::domain::errors::ProviderRpcError;
use crate::events::{Listener, Subscription};
use crate::ports::outbound::{Eip1193Provider, ProviderEvent};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

#[derive(Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<ProviderRpcError>,
}

/// JSON-RPC over HTTP POST.
pub struct HttpJsonRpcProvider {
    client: reqwest::Client,
    endpoint: String,
    next_id: AtomicU64,
}

impl HttpJsonRpcProvider {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Eip1193Provider for HttpJsonRpcProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderRpcError> {
        let body = JsonRpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderRpcError::new(ProviderRpcError::DISCONNECTED, e.to_string()))?;

        let status = response.status();
        let parsed: JsonRpcResponse = response.json().await.map_err(|e| {
            ProviderRpcError::internal(format!("unreadable response (HTTP {}): {}", status, e))
        })?;

        match (parsed.error, parsed.result) {
            (Some(error), _) => Err(error),
            (None, Some(result)) => Ok(result),
            (None, None) => Ok(Value::Null),
        }
    }

    fn on(&self, event: ProviderEvent, _listener: Listener) -> Subscription {
        debug!(%event, endpoint = %self.endpoint, "HTTP provider cannot push events");
        Subscription::detached()
    }
}
