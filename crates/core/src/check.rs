//! Compliance check records
//!
//! A check is created once per evaluation call. The only later mutation is
//! a manual review, which settles the status and fills the review fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::finding::Finding;
use crate::risk::{CheckStatus, RiskLevel};

/// Kind of evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CheckType {
    /// Know-Your-Customer identity verification
    Kyc,
    /// Anti-Money-Laundering transaction monitoring
    Aml,
}

/// Outcome of a manual review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ReviewDecision {
    Approved,
    Rejected,
}

impl From<ReviewDecision> for CheckStatus {
    fn from(decision: ReviewDecision) -> Self {
        match decision {
            ReviewDecision::Approved => CheckStatus::Approved,
            ReviewDecision::Rejected => CheckStatus::Rejected,
        }
    }
}

/// Persisted result of a KYC or AML evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceCheck {
    pub id: String,
    pub subject_id: String,
    pub check_type: CheckType,
    pub status: CheckStatus,
    /// Clamped score, 0..=100
    pub risk_score: u8,
    pub risk_level: RiskLevel,
    pub findings: Vec<Finding>,
    pub narrative: String,
    pub recommendations: Vec<String>,
    /// Rules whose strategy reported "not evaluated"
    #[serde(default)]
    pub skipped_rules: Vec<String>,
    pub checked_at: DateTime<Utc>,
    pub checked_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_notes: Option<String>,
}

impl ComplianceCheck {
    /// Whether a reviewer has already recorded a decision
    pub fn is_reviewed(&self) -> bool {
        self.reviewed_by.is_some()
    }

    /// Findings at or above the given severity
    pub fn findings_at_least(&self, severity: RiskLevel) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.severity >= severity)
    }

    /// Most severe finding, first one wins on ties
    pub fn most_severe_finding(&self) -> Option<&Finding> {
        self.findings
            .iter()
            .fold(None, |best: Option<&Finding>, f| match best {
                Some(b) if b.severity >= f.severity => Some(b),
                _ => Some(f),
            })
    }
}
