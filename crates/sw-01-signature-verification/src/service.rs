//! # Signature Verification Service
//!
//! Application service layer that implements the `SignatureVerificationApi` trait
//! by delegating to the domain layer.

use crate::domain::ecdsa;
use crate::domain::entities::{EcdsaSignature, VerificationResult};
use crate::domain::errors::SignatureError;
use crate::domain::personal;
use crate::ports::inbound::SignatureVerificationApi;
use shared_types::{Address, Hash};

/// Stateless verifier for wallet personal messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct PersonalMessageVerifier;

impl PersonalMessageVerifier {
    pub fn new() -> Self {
        Self
    }
}

impl SignatureVerificationApi for PersonalMessageVerifier {
    fn verify_signature(&self, message: &str, signature: &str, expected_address: &str) -> bool {
        personal::verify_signature(message, signature, expected_address)
    }

    fn recover_personal_signer(
        &self,
        message: &str,
        signature: &str,
    ) -> Result<Address, SignatureError> {
        personal::recover_personal_signer(message, signature)
    }

    fn verify_personal_signer(
        &self,
        message: &str,
        signature: &str,
        expected_address: &str,
    ) -> VerificationResult {
        personal::verify_personal_signer(message, signature, expected_address)
    }

    fn verify_ecdsa(&self, message_hash: &Hash, signature: &EcdsaSignature) -> VerificationResult {
        ecdsa::verify_ecdsa(message_hash, signature)
    }
}
