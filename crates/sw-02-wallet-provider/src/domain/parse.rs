//! # Provider Response Parsing
//!
//! Providers answer with loosely typed JSON. These helpers turn it into
//! domain values or [`WalletError::InvalidResponse`].

use super::errors::WalletError;
use serde_json::Value;
use shared_types::{Address, ChainId};

/// Parse an account list (`["0x..", ...]`). Addresses are normalized.
pub fn parse_accounts(value: &Value) -> Result<Vec<Address>, WalletError> {
    let items = value
        .as_array()
        .ok_or_else(|| WalletError::InvalidResponse(format!("expected account list, got {}", value)))?;

    items
        .iter()
        .map(|item| {
            item.as_str()
                .ok_or_else(|| WalletError::InvalidResponse(format!("account is not a string: {}", item)))?
                .parse::<Address>()
                .map_err(|e| WalletError::InvalidResponse(e.to_string()))
        })
        .collect()
}

/// Parse a chain id given as `"0x1"`, `"1"` or `1`.
pub fn parse_chain_id(value: &Value) -> Result<ChainId, WalletError> {
    let invalid = || WalletError::InvalidResponse(format!("invalid chain id: {}", value));

    match value {
        Value::Number(n) => n.as_u64().ok_or_else(invalid),
        Value::String(s) => match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(digits) => ChainId::from_str_radix(digits, 16).map_err(|_| invalid()),
            None => s.parse().map_err(|_| invalid()),
        },
        _ => Err(invalid()),
    }
}

/// Render a chain id the way `wallet_switchEthereumChain` expects it.
pub fn chain_id_hex(chain_id: ChainId) -> String {
    format!("0x{:x}", chain_id)
}
