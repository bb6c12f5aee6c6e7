//! Domain types for the report API.

pub mod config;
pub mod error;
pub mod types;
