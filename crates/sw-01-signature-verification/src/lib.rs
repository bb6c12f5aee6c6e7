//! # Signature Verification Subsystem (SW-01)
//!
//! Recovers the signer of a wallet personal message and decides whether it
//! matches an expected address.
//!
//! ## Architecture
//!
//! This subsystem follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): Pure cryptographic logic, no I/O
//! - **Ports Layer** (`ports/`): Trait definitions for the inbound interface
//! - **Service Layer** (`service.rs`): Wires domain logic to ports
//!
//! ## Security Notes
//!
//! - **Malleability Prevention (EIP-2)**: Signatures with high S values are rejected
//! - **Never Throws**: [`verify_signature`] turns every failure into `false`

pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use domain::ecdsa::{address_from_pubkey, recover_address};
pub use domain::entities::{EcdsaSignature, VerificationResult};
pub use domain::errors::SignatureError;
pub use domain::personal::{
    personal_message_hash, recover_personal_signer, verify_personal_signer, verify_signature,
};
pub use ports::inbound::SignatureVerificationApi;
pub use service::PersonalMessageVerifier;
