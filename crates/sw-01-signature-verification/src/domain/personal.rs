//! # Personal Message Verification (EIP-191)
//!
//! Wallets sign `keccak256("\x19Ethereum Signed Message:\n" ‖ len ‖ message)`.
//! This module rebuilds that digest, recovers the signer and compares it with
//! an expected address. Address comparison is on bytes, so letter case in the
//! expected address never matters.

use super::ecdsa::verify_ecdsa;
use super::entities::{EcdsaSignature, VerificationResult};
use super::errors::SignatureError;
use shared_types::{keccak256, Address, Hash};
use tracing::debug;

/// Prefix mandated by EIP-191 version 0x45 (`personal_sign`).
const PERSONAL_MESSAGE_PREFIX: &str = "\x19Ethereum Signed Message:\n";

/// Digest a wallet signs for `personal_sign(message)`.
pub fn personal_message_hash(message: &[u8]) -> Hash {
    let mut data = Vec::with_capacity(PERSONAL_MESSAGE_PREFIX.len() + 20 + message.len());
    data.extend_from_slice(PERSONAL_MESSAGE_PREFIX.as_bytes());
    data.extend_from_slice(message.len().to_string().as_bytes());
    data.extend_from_slice(message);
    keccak256(&data)
}

/// Recover the address that produced `signature` over `message`.
pub fn recover_personal_signer(message: &str, signature: &str) -> Result<Address, SignatureError> {
    let signature = EcdsaSignature::from_hex(signature)?;
    let result = verify_ecdsa(&personal_message_hash(message.as_bytes()), &signature);

    match (result.valid, result.recovered_address, result.error) {
        (true, Some(address), _) => Ok(address),
        (_, _, Some(e)) => Err(e),
        _ => Err(SignatureError::RecoveryFailed),
    }
}

/// Full verification outcome for `message`, `signature` and `expected_address`.
pub fn verify_personal_signer(
    message: &str,
    signature: &str,
    expected_address: &str,
) -> VerificationResult {
    let expected: Address = match expected_address.parse() {
        Ok(address) => address,
        Err(e) => {
            return VerificationResult::invalid(SignatureError::InvalidAddress(e.to_string()))
        }
    };

    match recover_personal_signer(message, signature) {
        Ok(actual) if actual == expected => VerificationResult::valid(actual),
        Ok(actual) => {
            VerificationResult::invalid(SignatureError::SignerMismatch { expected, actual })
        }
        Err(e) => VerificationResult::invalid(e),
    }
}

/// Trust decision: did `expected_address` sign `message`?
///
/// Never fails. Malformed signatures, bad encodings and malformed addresses all
/// yield `false`.
pub fn verify_signature(message: &str, signature: &str, expected_address: &str) -> bool {
    let result = verify_personal_signer(message, signature, expected_address);
    if let Some(error) = &result.error {
        debug!(%error, "personal message verification failed");
    }
    result.valid
}
