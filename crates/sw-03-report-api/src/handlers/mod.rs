//! HTTP handlers.

pub mod reports;
pub mod system;
