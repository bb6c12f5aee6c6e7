//! # Domain Entities
//!
//! Core data structures for signature verification.

use super::errors::SignatureError;
use shared_types::Address;

// =============================================================================
// ECDSA Types (secp256k1)
// =============================================================================

/// ECDSA signature on the secp256k1 curve.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EcdsaSignature {
    /// R component (32 bytes)
    pub r: [u8; 32],
    /// S component (32 bytes)
    pub s: [u8; 32],
    /// Recovery ID (0, 1, 27, or 28)
    pub v: u8,
}

impl EcdsaSignature {
    /// Decode a wallet signature from bytes.
    ///
    /// Accepts the 65-byte `r || s || v` form returned by `personal_sign` and
    /// the 64-byte EIP-2098 compact form `r || yParityAndS`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SignatureError> {
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];

        match bytes.len() {
            65 => {
                r.copy_from_slice(&bytes[..32]);
                s.copy_from_slice(&bytes[32..64]);
                Ok(Self { r, s, v: bytes[64] })
            }
            64 => {
                r.copy_from_slice(&bytes[..32]);
                s.copy_from_slice(&bytes[32..]);
                let y_parity = s[0] >> 7;
                s[0] &= 0x7f;
                Ok(Self {
                    r,
                    s,
                    v: 27 + y_parity,
                })
            }
            other => Err(SignatureError::InvalidLength(other)),
        }
    }

    /// Decode a `0x`-prefixed (or bare) hex signature.
    pub fn from_hex(signature: &str) -> Result<Self, SignatureError> {
        let digits = signature
            .strip_prefix("0x")
            .or_else(|| signature.strip_prefix("0X"))
            .unwrap_or(signature);
        let bytes = hex::decode(digits).map_err(|_| SignatureError::InvalidEncoding)?;
        Self::from_bytes(&bytes)
    }

    /// 65-byte `r || s || v` encoding.
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[..32].copy_from_slice(&self.r);
        out[32..64].copy_from_slice(&self.s);
        out[64] = self.v;
        out
    }

    /// `0x`-prefixed hex of [`Self::to_bytes`].
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }
}

// =============================================================================
// Verification Result
// =============================================================================

/// Result of signature verification.
#[derive(Clone, Debug)]
pub struct VerificationResult {
    /// Whether the signature is valid
    pub valid: bool,
    /// The recovered address (if recovery succeeded)
    pub recovered_address: Option<Address>,
    /// Error details (if verification failed)
    pub error: Option<SignatureError>,
}

impl VerificationResult {
    /// Create a successful verification result.
    pub fn valid(recovered_address: Address) -> Self {
        Self {
            valid: true,
            recovered_address: Some(recovered_address),
            error: None,
        }
    }

    /// Create a failed verification result.
    pub fn invalid(error: SignatureError) -> Self {
        let recovered_address = match &error {
            SignatureError::SignerMismatch { actual, .. } => Some(*actual),
            _ => None,
        };
        Self {
            valid: false,
            recovered_address,
            error: Some(error),
        }
    }
}
