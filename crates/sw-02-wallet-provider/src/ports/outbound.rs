//! # Outbound Ports (Driven Ports)
//!
//! The host wallet, modelled after EIP-1193: one `request` entry point plus
//! named event subscriptions.

use crate::domain::errors::ProviderRpcError;
use crate::events::{Listener, Subscription};
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

/// Provider events the adapter listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderEvent {
    /// Payload: array of `0x`-hex account strings (empty when locked or revoked).
    AccountsChanged,
    /// Payload: `0x`-hex chain id string.
    ChainChanged,
}

impl ProviderEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderEvent::AccountsChanged => "accountsChanged",
            ProviderEvent::ChainChanged => "chainChanged",
        }
    }
}

impl fmt::Display for ProviderEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An EIP-1193 wallet provider.
///
/// `request` may suspend indefinitely while the user is prompted. Listeners are
/// invoked on whatever task the provider emits from.
#[async_trait]
pub trait Eip1193Provider: Send + Sync {
    /// Issue a JSON-RPC request. `params` is normally a JSON array.
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderRpcError>;

    /// Register a listener. Dropping or unsubscribing the handle removes it.
    fn on(&self, event: ProviderEvent, listener: Listener) -> Subscription;
}
