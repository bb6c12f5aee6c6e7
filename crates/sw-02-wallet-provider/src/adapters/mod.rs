//! # Provider Adapters
//!
//! Concrete [`crate::Eip1193Provider`] implementations.

pub mod http;
pub mod local;
