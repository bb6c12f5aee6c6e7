//! # Shared Types Crate
//!
//! This crate contains the domain entities shared by the wallet core, the
//! report API and the node runtime.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Byte-level Identity**: Addresses are 20-byte values. Letter case only
//!   matters when rendering, never when comparing.
//! - **Canonical Authorship**: The message a reporter signs is derived from the
//!   report content by one function, used by both signer and verifier.

pub mod entities;
pub mod errors;
pub mod reports;

pub use entities::*;
pub use errors::*;
pub use reports::*;
