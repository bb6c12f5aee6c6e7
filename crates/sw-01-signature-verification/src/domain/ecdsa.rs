//! # secp256k1 Signer Recovery
//!
//! Recovers the Ethereum address behind a recoverable ECDSA signature over a
//! 32-byte digest. Scalar checks run in constant time with `subtle`; the curve
//! arithmetic is k256.

use super::entities::{EcdsaSignature, VerificationResult};
use super::errors::SignatureError;
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use shared_types::{keccak256, Address, Hash};
use subtle::{Choice, ConstantTimeEq};

/// Group order n.
const CURVE_ORDER: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
    0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
];

/// floor(n / 2). A canonical S is strictly below this (EIP-2).
const HALF_CURVE_ORDER: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D, 0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B, 0x20, 0xA0,
];

/// Big-endian `a < b` without data-dependent branches.
fn ct_less_than(a: &[u8; 32], b: &[u8; 32]) -> Choice {
    let mut lt = Choice::from(0u8);
    let mut decided = Choice::from(0u8);

    for (x, y) in a.iter().zip(b.iter()) {
        let byte_lt = Choice::from((*x < *y) as u8);
        let byte_eq = x.ct_eq(y);
        lt |= !decided & byte_lt;
        decided |= !byte_eq;
    }

    lt
}

fn ct_is_zero(bytes: &[u8; 32]) -> Choice {
    bytes
        .iter()
        .fold(Choice::from(1u8), |acc, b| acc & b.ct_eq(&0u8))
}

/// Scalar in `[1, n-1]`.
fn in_scalar_range(scalar: &[u8; 32]) -> bool {
    (!ct_is_zero(scalar) & ct_less_than(scalar, &CURVE_ORDER)).into()
}

fn is_low_s(s: &[u8; 32]) -> bool {
    ct_less_than(s, &HALF_CURVE_ORDER).into()
}

/// Map `v` (0, 1, 27 or 28) onto a k256 recovery id.
fn recovery_id(v: u8) -> Result<RecoveryId, SignatureError> {
    let parity = match v {
        0 | 27 => 0,
        1 | 28 => 1,
        _ => return Err(SignatureError::InvalidRecoveryId(v)),
    };
    RecoveryId::from_byte(parity).ok_or(SignatureError::InvalidRecoveryId(v))
}

/// Range and malleability checks that precede recovery.
fn check_canonical(signature: &EcdsaSignature) -> Result<(), SignatureError> {
    if !in_scalar_range(&signature.r) || !in_scalar_range(&signature.s) {
        return Err(SignatureError::InvalidFormat);
    }
    if !is_low_s(&signature.s) {
        return Err(SignatureError::MalleableSignature);
    }
    Ok(())
}

/// Check `signature` over `digest` and report who signed it.
///
/// Rejects out-of-range scalars, high-S signatures and unknown recovery ids
/// before attempting recovery.
pub fn verify_ecdsa(digest: &Hash, signature: &EcdsaSignature) -> VerificationResult {
    match check_canonical(signature).and_then(|()| recover_address(digest, signature)) {
        Ok(signer) => VerificationResult::valid(signer),
        Err(e) => VerificationResult::invalid(e),
    }
}

/// Recover the signer address without the canonical-form checks.
pub fn recover_address(digest: &Hash, signature: &EcdsaSignature) -> Result<Address, SignatureError> {
    let recid = recovery_id(signature.v)?;
    let sig = Signature::from_scalars(signature.r, signature.s)
        .map_err(|_| SignatureError::InvalidFormat)?;

    VerifyingKey::recover_from_prehash(digest, &sig, recid)
        .map(|key| address_from_pubkey(&key))
        .map_err(|_| SignatureError::RecoveryFailed)
}

/// Ethereum address of a public key: the low 20 bytes of keccak256 over the
/// uncompressed point without its `0x04` tag.
pub fn address_from_pubkey(public_key: &VerifyingKey) -> Address {
    let point = public_key.to_encoded_point(false);
    Address::from_hash(&keccak256(&point.as_bytes()[1..]))
}
