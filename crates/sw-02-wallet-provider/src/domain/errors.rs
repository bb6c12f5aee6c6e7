//! # Wallet Errors
//!
//! Provider-level JSON-RPC errors and the adapter's own error type.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_types::ChainId;
use thiserror::Error;

/// Error object returned by an EIP-1193 provider.
#[derive(Debug, Clone, Error, PartialEq, Serialize, Deserialize)]
#[error("provider error {code}: {message}")]
pub struct ProviderRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ProviderRpcError {
    /// The user rejected the request.
    pub const USER_REJECTED: i64 = 4001;
    /// The requested account or method has not been authorized.
    pub const UNAUTHORIZED: i64 = 4100;
    /// The provider does not support the method.
    pub const UNSUPPORTED_METHOD: i64 = 4200;
    /// The provider is disconnected from all chains.
    pub const DISCONNECTED: i64 = 4900;
    /// The chain has not been added to the wallet.
    pub const UNRECOGNIZED_CHAIN: i64 = 4902;
    /// Invalid method parameters.
    pub const INVALID_PARAMS: i64 = -32602;
    /// Internal JSON-RPC error.
    pub const INTERNAL: i64 = -32603;

    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn user_rejected() -> Self {
        Self::new(Self::USER_REJECTED, "User rejected the request.")
    }

    pub fn unauthorized() -> Self {
        Self::new(Self::UNAUTHORIZED, "The requested account has not been authorized.")
    }

    pub fn unsupported_method(method: &str) -> Self {
        Self::new(
            Self::UNSUPPORTED_METHOD,
            format!("The provider does not support {}", method),
        )
    }

    pub fn unrecognized_chain(chain_id: ChainId) -> Self {
        Self::new(
            Self::UNRECOGNIZED_CHAIN,
            format!("Unrecognized chain ID \"0x{:x}\".", chain_id),
        )
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(Self::INVALID_PARAMS, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(Self::INTERNAL, message)
    }
}

/// Errors surfaced by [`crate::WalletProvider`] and [`crate::WalletSession`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum WalletError {
    /// No wallet provider is installed.
    #[error("No wallet provider installed")]
    NoProvider,

    /// The user declined the wallet prompt (provider code 4001).
    #[error("User rejected the request")]
    UserRejected,

    /// The target network is not known to the wallet (provider code 4902).
    #[error("Network {chain_id} has not been added to the wallet")]
    NetworkNotAdded { chain_id: ChainId },

    /// The wallet returned no authorized accounts.
    #[error("No accounts available")]
    NoAccounts,

    /// The provider answered with something that is not the expected shape.
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    /// Any other provider error.
    #[error("Provider error {code}: {message}")]
    Provider { code: i64, message: String },
}

impl From<ProviderRpcError> for WalletError {
    fn from(err: ProviderRpcError) -> Self {
        match err.code {
            ProviderRpcError::USER_REJECTED => WalletError::UserRejected,
            code => WalletError::Provider {
                code,
                message: err.message,
            },
        }
    }
}
