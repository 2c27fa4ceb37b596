//! Findings - atomic observations produced by rule evaluators
//!
//! A finding is immutable once created and owned by the check that
//! produced it.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::risk::RiskLevel;

/// Risk dimension a finding belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FindingCategory {
    Document,
    Age,
    Address,
    Sanctions,
    TransactionPattern,
    TransactionVolume,
    TransactionVelocity,
    /// Reserved for geographic risk providers backed by real location data;
    /// the built-in provider evaluates nothing
    Geographic,
    Structuring,
    /// An external screening integration failed under a fail-closed policy
    ScreeningFailure,
}

/// A single risk observation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub id: String,
    pub category: FindingCategory,
    pub severity: RiskLevel,
    pub description: String,
    pub evidence: Vec<String>,
    pub recommendation: String,
    /// Confidence in the observation, 0..=100
    pub confidence: u8,
}

impl Finding {
    /// Create a new finding with a fresh ID and no evidence
    pub fn new(
        category: FindingCategory,
        severity: RiskLevel,
        description: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            category,
            severity,
            description: description.into(),
            evidence: Vec::new(),
            recommendation: recommendation.into(),
            confidence: 100,
        }
    }

    /// Attach a piece of evidence
    pub fn with_evidence(mut self, evidence: impl Into<String>) -> Self {
        self.evidence.push(evidence.into());
        self
    }

    /// Set the confidence (capped at 100)
    pub fn with_confidence(mut self, confidence: u8) -> Self {
        self.confidence = confidence.min(100);
        self
    }
}
