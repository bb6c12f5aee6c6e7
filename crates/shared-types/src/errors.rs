//! # Error Types
//!
//! Defines error types used across subsystems.

use thiserror::Error;

/// Errors raised while parsing a textual address.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum AddressError {
    /// Address does not start with `0x`.
    #[error("address must start with 0x")]
    MissingPrefix,

    /// Wrong number of hex digits after the prefix.
    #[error("address must have 40 hex digits, got {0}")]
    InvalidLength(usize),

    /// Non-hex character in the address.
    #[error("address contains non-hex characters")]
    InvalidHex,
}

/// Errors raised while parsing report enums from user input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReportFieldError {
    /// Unknown report type.
    #[error("reportType must be either 'phishing_url' or 'scam_wallet'")]
    UnknownReportType(String),

    /// Unknown report status.
    #[error("status must be one of 'pending', 'verified', 'rejected'")]
    UnknownStatus(String),
}
