//! # ScamWatch Node Runtime
//!
//! Startup plumbing for the `scamwatch` binary: configuration loading and
//! logging initialization. The main entry point is `main.rs`.

pub mod config;
pub mod logging;

pub use config::{load_config, ConfigSource, LoadError};
