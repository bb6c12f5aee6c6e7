//! # Ports Layer
//!
//! - **Outbound (Driven)**: report persistence

pub mod outbound;
