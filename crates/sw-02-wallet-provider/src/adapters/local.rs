//! # Local Wallet
//!
//! An in-process EIP-1193 provider backed by k256 signing keys. Used as a
//! development wallet and as the provider double in tests.
//!
//! Supported methods: `eth_requestAccounts`, `eth_accounts`, `eth_chainId`,
//! `wallet_switchEthereumChain`, `personal_sign`. Anything else answers 4200.

use crate::domain::errors::ProviderRpcError;
use crate::domain::parse::{chain_id_hex, parse_chain_id};
use crate::events::{Listener, ListenerRegistry, Subscription};
use crate::ports::outbound::{Eip1193Provider, ProviderEvent};
use async_trait::async_trait;
use k256::ecdsa::SigningKey;
use parking_lot::Mutex;
use serde_json::{json, Value};
use shared_types::{Address, ChainId};
use std::collections::BTreeSet;
use sw_01_signature_verification::{address_from_pubkey, personal_message_hash};
use tracing::debug;

struct Account {
    key: SigningKey,
    address: Address,
}

struct LocalState {
    accounts: Vec<Account>,
    authorized: bool,
    chain_id: ChainId,
    known_chains: BTreeSet<ChainId>,
    rejecting: bool,
}

/// In-process wallet holding its own keys.
pub struct LocalWallet {
    state: Mutex<LocalState>,
    listeners: ListenerRegistry,
}

impl LocalWallet {
    /// Wallet on `chain_id` holding `keys`, not yet authorized.
    pub fn new(keys: Vec<SigningKey>, chain_id: ChainId) -> Self {
        let accounts = keys
            .into_iter()
            .map(|key| Account {
                address: address_from_pubkey(key.verifying_key()),
                key,
            })
            .collect();

        Self {
            state: Mutex::new(LocalState {
                accounts,
                authorized: false,
                chain_id,
                known_chains: BTreeSet::from([chain_id]),
                rejecting: false,
            }),
            listeners: ListenerRegistry::new(),
        }
    }

    /// Wallet with one freshly generated key.
    pub fn random(chain_id: ChainId) -> Self {
        Self::new(vec![SigningKey::random(&mut rand::thread_rng())], chain_id)
    }

    /// All held addresses, in order.
    pub fn addresses(&self) -> Vec<Address> {
        self.state.lock().accounts.iter().map(|a| a.address).collect()
    }

    pub fn current_chain(&self) -> ChainId {
        self.state.lock().chain_id
    }

    pub fn is_authorized(&self) -> bool {
        self.state.lock().authorized
    }

    /// Make `chain_id` switchable.
    pub fn add_chain(&self, chain_id: ChainId) {
        self.state.lock().known_chains.insert(chain_id);
    }

    /// Answer every prompting request with 4001 while set.
    pub fn set_rejecting(&self, rejecting: bool) {
        self.state.lock().rejecting = rejecting;
    }

    /// Revoke access, as a user locking the wallet would. Emits `accountsChanged([])`.
    pub fn lock(&self) {
        self.state.lock().authorized = false;
        self.listeners
            .emit(ProviderEvent::AccountsChanged, &json!([]));
    }

    /// Move `index` to the front of the account list and emit `accountsChanged`.
    pub fn select_account(&self, index: usize) -> Option<Address> {
        let (selected, payload) = {
            let mut state = self.state.lock();
            if index >= state.accounts.len() {
                return None;
            }
            let account = state.accounts.remove(index);
            state.accounts.insert(0, account);
            (state.accounts[0].address, Self::account_list(&state))
        };

        self.listeners.emit(ProviderEvent::AccountsChanged, &payload);
        Some(selected)
    }

    fn account_list(state: &LocalState) -> Value {
        if !state.authorized {
            return json!([]);
        }
        Value::Array(
            state
                .accounts
                .iter()
                .map(|a| Value::String(a.address.to_string()))
                .collect(),
        )
    }

    fn request_accounts(&self) -> Result<Value, ProviderRpcError> {
        let mut state = self.state.lock();
        if state.rejecting {
            return Err(ProviderRpcError::user_rejected());
        }
        state.authorized = true;
        Ok(Self::account_list(&state))
    }

    fn switch_chain(&self, params: &Value) -> Result<Value, ProviderRpcError> {
        let requested = params
            .get(0)
            .and_then(|p| p.get("chainId"))
            .ok_or_else(|| ProviderRpcError::invalid_params("expected [{ chainId }]"))?;
        let chain_id =
            parse_chain_id(requested).map_err(|e| ProviderRpcError::invalid_params(e.to_string()))?;

        let changed = {
            let mut state = self.state.lock();
            if state.rejecting {
                return Err(ProviderRpcError::user_rejected());
            }
            if !state.known_chains.contains(&chain_id) {
                return Err(ProviderRpcError::unrecognized_chain(chain_id));
            }
            let changed = state.chain_id != chain_id;
            state.chain_id = chain_id;
            changed
        };

        if changed {
            self.listeners
                .emit(ProviderEvent::ChainChanged, &json!(chain_id_hex(chain_id)));
        }
        Ok(Value::Null)
    }

    fn personal_sign(&self, params: &Value) -> Result<Value, ProviderRpcError> {
        let data = params
            .get(0)
            .and_then(Value::as_str)
            .ok_or_else(|| ProviderRpcError::invalid_params("expected [data, address]"))?;
        let address: Address = params
            .get(1)
            .and_then(Value::as_str)
            .ok_or_else(|| ProviderRpcError::invalid_params("expected [data, address]"))?
            .parse()
            .map_err(|e: shared_types::AddressError| ProviderRpcError::invalid_params(e.to_string()))?;

        // Hex payloads are decoded, anything else is signed as UTF-8 text
        let message = match data.strip_prefix("0x").map(hex::decode) {
            Some(Ok(bytes)) => bytes,
            _ => data.as_bytes().to_vec(),
        };

        let state = self.state.lock();
        if state.rejecting {
            return Err(ProviderRpcError::user_rejected());
        }
        if !state.authorized {
            return Err(ProviderRpcError::unauthorized());
        }
        let account = state
            .accounts
            .iter()
            .find(|a| a.address == address)
            .ok_or_else(ProviderRpcError::unauthorized)?;

        let hash = personal_message_hash(&message);
        let (signature, recovery_id) = account
            .key
            .sign_prehash_recoverable(&hash)
            .map_err(|e| ProviderRpcError::internal(e.to_string()))?;

        let mut bytes = signature.to_bytes().to_vec();
        bytes.push(recovery_id.to_byte() + 27);
        debug!(%address, "local wallet signed personal message");
        Ok(json!(format!("0x{}", hex::encode(bytes))))
    }
}

#[async_trait]
impl Eip1193Provider for LocalWallet {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderRpcError> {
        match method {
            "eth_requestAccounts" => self.request_accounts(),
            "eth_accounts" => Ok(Self::account_list(&self.state.lock())),
            "eth_chainId" => Ok(json!(chain_id_hex(self.state.lock().chain_id))),
            "wallet_switchEthereumChain" => self.switch_chain(&params),
            "personal_sign" => self.personal_sign(&params),
            other => Err(ProviderRpcError::unsupported_method(other)),
        }
    }

    fn on(&self, event: ProviderEvent, listener: Listener) -> Subscription {
        self.listeners.register(event, listener)
    }
}
