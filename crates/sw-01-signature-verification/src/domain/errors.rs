//! # Signature Errors
//!
//! Error types for signature recovery. None of them escape
//! [`crate::verify_signature`], which reports failure as `false`.

use shared_types::Address;
use thiserror::Error;

/// Errors that can occur while decoding a signature or recovering its signer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignatureError {
    /// The signature is not valid hex
    #[error("Invalid signature encoding")]
    InvalidEncoding,

    /// The signature has the wrong number of bytes (expected 64 or 65)
    #[error("Invalid signature length: {0} bytes")]
    InvalidLength(usize),

    /// The signature format is invalid (scalar out of range)
    #[error("Invalid signature format")]
    InvalidFormat,

    /// Signature has high S value (EIP-2 malleability protection)
    #[error("Malleable signature (high S value)")]
    MalleableSignature,

    /// Invalid recovery ID (v must be 0, 1, 27, or 28)
    #[error("Invalid recovery ID: {0}")]
    InvalidRecoveryId(u8),

    /// Failed to recover public key from signature
    #[error("Failed to recover public key")]
    RecoveryFailed,

    /// Expected address could not be parsed
    #[error("Invalid expected address: {0}")]
    InvalidAddress(String),

    /// Recovered signer does not match expected signer
    #[error("Signer mismatch: expected {expected}, got {actual}")]
    SignerMismatch { expected: Address, actual: Address },
}
