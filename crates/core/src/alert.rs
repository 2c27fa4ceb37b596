//! AML alerts
//!
//! Created only as a side effect of an AML check whose score exceeds the
//! alert threshold. Status moves forward through an investigation workflow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::risk::RiskLevel;

/// Investigation status of an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AlertStatus {
    Open,
    Investigating,
    Resolved,
    FalsePositive,
}

impl AlertStatus {
    /// Resolved and false-positive alerts are closed for good
    pub fn is_closed(&self) -> bool {
        matches!(self, AlertStatus::Resolved | AlertStatus::FalsePositive)
    }
}

/// Alert raised for a high-scoring AML check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmlAlert {
    pub id: String,
    /// Check that triggered this alert
    pub check_id: String,
    pub subject_id: String,
    pub alert_type: String,
    pub severity: RiskLevel,
    pub description: String,
    pub details: String,
    pub triggered_at: DateTime<Utc>,
    pub status: AlertStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}
