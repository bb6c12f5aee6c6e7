//! # Inbound Ports (Driving Ports / API)
//!
//! Traits that define the public API of this subsystem.

use crate::domain::entities::{EcdsaSignature, VerificationResult};
use crate::domain::errors::SignatureError;
use shared_types::{Address, Hash};

/// Primary Signature Verification API.
///
/// This is the entry point the report service uses to check authorship.
/// Implementations must be thread-safe (`Send + Sync`).
pub trait SignatureVerificationApi: Send + Sync {
    // =========================================================================
    // Personal Messages (EIP-191)
    // =========================================================================

    /// Did `expected_address` sign `message`? Never fails; any problem is `false`.
    fn verify_signature(&self, message: &str, signature: &str, expected_address: &str) -> bool;

    /// Recover the signer of a personal message.
    fn recover_personal_signer(
        &self,
        message: &str,
        signature: &str,
    ) -> Result<Address, SignatureError>;

    /// Verification outcome with the recovered address and failure reason.
    fn verify_personal_signer(
        &self,
        message: &str,
        signature: &str,
        expected_address: &str,
    ) -> VerificationResult;

    // =========================================================================
    // Raw ECDSA
    // =========================================================================

    /// Verify an ECDSA signature over a prehashed message and recover the signer.
    ///
    /// # Security
    /// - Rejects signatures with high S values (EIP-2 malleability protection)
    fn verify_ecdsa(&self, message_hash: &Hash, signature: &EcdsaSignature) -> VerificationResult;
}
