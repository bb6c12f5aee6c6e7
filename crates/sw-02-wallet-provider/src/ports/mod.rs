//! # Ports Layer
//!
//! - **Outbound (Driven)**: the host wallet provider this subsystem drives

pub mod outbound;
