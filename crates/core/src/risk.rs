//! Risk levels and check statuses
//!
//! Both are pure step functions of the final 0..=100 score:
//!
//! ```text
//! score    0 ........ 40 ........ 60 ........ 80 ....... 100
//! level    low        medium      high        critical
//!
//! score    0 ............ 40] ........ 70] ............. 100
//! status   approved           pending       review_required
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use strum_macros::{Display, EnumString};

/// Upper bound of every risk score
pub const MAX_SCORE: u8 = 100;

/// Clamp a raw sum of rule contributions into `0..=MAX_SCORE`
pub fn clamp_score(raw: u32) -> u8 {
    raw.min(MAX_SCORE as u32) as u8
}

/// Risk bucket - ordered from lowest to highest
///
/// Doubles as the severity of findings and alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum RiskLevel {
    Low = 1,
    Medium = 2,
    High = 3,
    Critical = 4,
}

impl RiskLevel {
    /// All levels, lowest first
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::Low,
        RiskLevel::Medium,
        RiskLevel::High,
        RiskLevel::Critical,
    ];

    /// Map a score to its bucket: `>= 80` critical, `>= 60` high, `>= 40` medium
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => RiskLevel::Critical,
            60..=79 => RiskLevel::High,
            40..=59 => RiskLevel::Medium,
            _ => RiskLevel::Low,
        }
    }
}

impl PartialOrd for RiskLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RiskLevel {
    fn cmp(&self, other: &Self) -> Ordering {
        (*self as u8).cmp(&(*other as u8))
    }
}

impl Default for RiskLevel {
    fn default() -> Self {
        RiskLevel::Low
    }
}

/// Lifecycle status of a compliance check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CheckStatus {
    /// Medium risk, waiting for a decision
    Pending,
    /// Low risk, passed automatically (or approved by a reviewer)
    Approved,
    /// Rejected by a reviewer; never assigned automatically
    Rejected,
    /// High risk, a compliance officer must look at it
    ReviewRequired,
}

impl CheckStatus {
    /// All statuses in display order
    pub const ALL: [CheckStatus; 4] = [
        CheckStatus::Approved,
        CheckStatus::Pending,
        CheckStatus::ReviewRequired,
        CheckStatus::Rejected,
    ];

    /// Status assigned at evaluation time: `> 70` review, `> 40` pending
    pub fn from_score(score: u8) -> Self {
        if score > 70 {
            CheckStatus::ReviewRequired
        } else if score > 40 {
            CheckStatus::Pending
        } else {
            CheckStatus::Approved
        }
    }
}
