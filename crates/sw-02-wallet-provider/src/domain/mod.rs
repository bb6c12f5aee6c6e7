//! # Domain Layer
//!
//! Wallet identity types, error mapping and response parsing. No I/O.

pub mod entities;
pub mod errors;
pub mod format;
pub mod parse;
