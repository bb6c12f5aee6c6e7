//! # Wallet Provider Service
//!
//! Application service that drives the injected [`Eip1193Provider`].
//!
//! ## Prompting
//!
//! Only [`WalletProvider::connect`], [`WalletProvider::sign_message`] and
//! [`WalletProvider::switch_network`] may open a wallet prompt. Lookups use
//! non-prompting methods (`eth_accounts`, `eth_chainId`).
//!
//! The service holds no mutable state; every call re-queries the provider.

use crate::domain::entities::Connection;
use crate::domain::errors::{ProviderRpcError, WalletError};
use crate::domain::parse::{chain_id_hex, parse_accounts, parse_chain_id};
use crate::events::{Listener, Subscription};
use crate::ports::outbound::{Eip1193Provider, ProviderEvent};
use serde_json::{json, Value};
use shared_types::{Address, ChainId, SignedMessage};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Adapter over an optional host wallet.
#[derive(Clone, Default)]
pub struct WalletProvider {
    provider: Option<Arc<dyn Eip1193Provider>>,
}

impl WalletProvider {
    pub fn new(provider: Option<Arc<dyn Eip1193Provider>>) -> Self {
        Self { provider }
    }

    /// Adapter for an environment without a wallet.
    pub fn absent() -> Self {
        Self { provider: None }
    }

    pub fn with_provider(provider: Arc<dyn Eip1193Provider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// Whether a wallet provider was injected. Never fails.
    pub fn is_installed(&self) -> bool {
        self.provider.is_some()
    }

    fn provider(&self) -> Result<&Arc<dyn Eip1193Provider>, WalletError> {
        self.provider.as_ref().ok_or_else(|| {
            debug!("no wallet provider installed");
            WalletError::NoProvider
        })
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value, WalletError> {
        let provider = self.provider()?;
        debug!(method, "provider request");
        provider.request(method, params).await.map_err(|e| {
            debug!(method, code = e.code, message = %e.message, "provider request failed");
            WalletError::from(e)
        })
    }

    /// Ask the wallet for access and return the first account with the active chain.
    ///
    /// May prompt the user.
    pub async fn connect(&self) -> Result<Connection, WalletError> {
        let accounts = parse_accounts(&self.call("eth_requestAccounts", json!([])).await?)?;
        let address = accounts.first().copied().ok_or(WalletError::NoAccounts)?;
        let chain_id = self.chain_id().await?;

        info!(%address, chain_id, "wallet connected");
        Ok(Connection { address, chain_id })
    }

    /// First authorized account, or `Err` with the reason none could be read.
    ///
    /// Never prompts. `Ok(None)` means the wallet is present but not connected.
    pub async fn try_current_address(&self) -> Result<Option<Address>, WalletError> {
        let accounts = parse_accounts(&self.call("eth_accounts", json!([])).await?)?;
        Ok(accounts.first().copied())
    }

    /// Probe for the first authorized account.
    ///
    /// Never prompts and never fails: a missing provider, a provider error or a
    /// malformed answer all read as "no account". Use
    /// [`Self::try_current_address`] when the reason matters.
    pub async fn current_address(&self) -> Option<Address> {
        match self.try_current_address().await {
            Ok(address) => address,
            Err(WalletError::NoProvider) => None,
            Err(e) => {
                debug!(error = %e, "current address probe failed");
                None
            }
        }
    }

    /// Active chain id. Never prompts.
    pub async fn chain_id(&self) -> Result<ChainId, WalletError> {
        parse_chain_id(&self.call("eth_chainId", json!([])).await?)
    }

    /// Ask the wallet to switch networks.
    ///
    /// A chain the wallet does not know surfaces as
    /// [`WalletError::NetworkNotAdded`]; adding it is the caller's decision.
    pub async fn switch_network(&self, chain_id: ChainId) -> Result<(), WalletError> {
        let provider = self.provider()?;
        let params = json!([{ "chainId": chain_id_hex(chain_id) }]);

        match provider.request("wallet_switchEthereumChain", params).await {
            Ok(_) => {
                info!(chain_id, "network switched");
                Ok(())
            }
            Err(e) if e.code == ProviderRpcError::UNRECOGNIZED_CHAIN => {
                warn!(chain_id, "network not added to wallet");
                Err(WalletError::NetworkNotAdded { chain_id })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Sign `message` with `personal_sign` using the authorized account.
    ///
    /// The message goes to the wallet as `0x`-hex of its UTF-8 bytes; the wallet
    /// applies the EIP-191 prefix. May prompt the user and is not timed out.
    pub async fn sign_message(&self, message: &str) -> Result<SignedMessage, WalletError> {
        self.provider()?;
        let address = self
            .try_current_address()
            .await?
            .ok_or(WalletError::NoAccounts)?;

        let data = format!("0x{}", hex::encode(message.as_bytes()));
        let response = self
            .call("personal_sign", json!([data, address.to_string()]))
            .await?;

        let signature = response.as_str().ok_or_else(|| {
            WalletError::InvalidResponse(format!("signature is not a string: {}", response))
        })?;

        debug!(%address, "message signed");
        Ok(SignedMessage::new(message, signature))
    }

    /// Register `callback` for account changes.
    ///
    /// The callback receives the new account list (empty when the wallet locked
    /// or revoked access). Without a provider the returned handle is detached.
    pub fn on_accounts_changed<F>(&self, callback: F) -> Subscription
    where
        F: Fn(Vec<Address>) + Send + Sync + 'static,
    {
        let Some(provider) = &self.provider else {
            return Subscription::detached();
        };

        let listener: Listener = Arc::new(move |payload: &Value| match parse_accounts(payload) {
            Ok(accounts) => callback(accounts),
            Err(e) => warn!(error = %e, "ignoring malformed accountsChanged payload"),
        });
        provider.on(ProviderEvent::AccountsChanged, listener)
    }

    /// Register `callback` for network changes.
    ///
    /// Without a provider the returned handle is detached.
    pub fn on_chain_changed<F>(&self, callback: F) -> Subscription
    where
        F: Fn(ChainId) + Send + Sync + 'static,
    {
        let Some(provider) = &self.provider else {
            return Subscription::detached();
        };

        let listener: Listener = Arc::new(move |payload: &Value| match parse_chain_id(payload) {
            Ok(chain_id) => callback(chain_id),
            Err(e) => warn!(error = %e, "ignoring malformed chainChanged payload"),
        });
        provider.on(ProviderEvent::ChainChanged, listener)
    }
}

impl fmt::Debug for WalletProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletProvider")
            .field("installed", &self.is_installed())
            .finish()
    }
}
