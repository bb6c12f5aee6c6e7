//! # Report Entities
//!
//! The scam report model shared by the report API and its clients, plus the
//! canonical authorship message a reporter signs with their wallet.

use crate::entities::{keccak256, Address, Hash};
use crate::errors::ReportFieldError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Store-assigned report identifier.
pub type ReportId = u64;

/// What kind of scam a report describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    /// A phishing website.
    PhishingUrl,
    /// A wallet address used by scammers.
    ScamWallet,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::PhishingUrl => "phishing_url",
            ReportType::ScamWallet => "scam_wallet",
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportType {
    type Err = ReportFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "phishing_url" => Ok(ReportType::PhishingUrl),
            "scam_wallet" => Ok(ReportType::ScamWallet),
            other => Err(ReportFieldError::UnknownReportType(other.to_string())),
        }
    }
}

/// Moderation status of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    #[default]
    Pending,
    Verified,
    Rejected,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Verified => "verified",
            ReportStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportStatus {
    type Err = ReportFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ReportStatus::Pending),
            "verified" => Ok(ReportStatus::Verified),
            "rejected" => Ok(ReportStatus::Rejected),
            other => Err(ReportFieldError::UnknownStatus(other.to_string())),
        }
    }
}

/// A persisted scam report.
///
/// `reporter_address` is tied to a wallet signature when the API enforces
/// signed submissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: ReportId,
    pub report_type: ReportType,
    pub target_value: String,
    pub description: String,
    pub reporter_address: Address,
    pub user_id: Option<String>,
    pub anchor_on_chain: bool,
    pub on_chain_tx_hash: Option<String>,
    pub contract_id: Option<String>,
    pub report_hash: Option<String>,
    pub vote_score: i64,
    pub upvotes: u64,
    pub downvotes: u64,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Report {
    /// Recompute the vote score from the up/down counters.
    ///
    /// The difference saturates at the `i64` bounds.
    pub fn recompute_vote_score(&mut self) {
        let score = self.upvotes as i128 - self.downvotes as i128;
        self.vote_score = score.clamp(i64::MIN as i128, i64::MAX as i128) as i64;
    }
}

/// Build the message a reporter signs to prove authorship of a report.
///
/// Both the signing client and the API derive it from the same fields, so a
/// signature over it binds the reporter to exactly this content.
pub fn authorship_message(
    report_type: ReportType,
    target_value: &str,
    description: &str,
    reporter: &Address,
) -> String {
    format!(
        "ScamWatch report authorship\nType: {}\nTarget: {}\nDescription: {}\nReporter: {}",
        report_type, target_value, description, reporter
    )
}

/// Content hash of a report, suitable for on-chain anchoring.
pub fn report_content_hash(
    report_type: ReportType,
    target_value: &str,
    description: &str,
    reporter: &Address,
) -> Hash {
    keccak256(authorship_message(report_type, target_value, description, reporter).as_bytes())
}
