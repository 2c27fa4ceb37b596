//! Compliance configuration with configurable thresholds
//!
//! Rule weights and thresholds live in [`KycRules`] / [`AmlRules`]; this
//! file adds the service-level settings around them. A partial JSON file
//! only overrides the fields it names.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use vigil_rules::{AmlRules, KycRules};
use vigil_store::DEFAULT_RETENTION;

use crate::error::{ComplianceError, ComplianceResult};

/// Configuration for the Compliance Service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceConfig {
    // === Rules ===
    #[serde(default)]
    pub kyc: KycRules,

    #[serde(default)]
    pub aml: AmlRules,

    // === Alerts ===
    /// AML checks scoring strictly above this raise an alert
    #[serde(default = "default_alert_threshold")]
    pub alert_threshold: u8,

    // === Storage ===
    /// Records retained per kind
    #[serde(default = "default_retention")]
    pub retention: usize,

    /// Recorded as `checked_by` on every automatic check
    #[serde(default = "default_checked_by")]
    pub checked_by: String,

    // === External screening ===
    /// Timeout for screening strategy calls
    #[serde(default = "default_external_timeout_ms")]
    pub external_timeout_ms: u64,

    /// Policy when a screening strategy fails or times out
    #[serde(default)]
    pub screening_fail_policy: FailPolicy,

    /// Contribution of a failed screening under `FailClosed`
    #[serde(default = "default_screening_failure_weight")]
    pub screening_failure_weight: u32,
}

/// Policy when a screening strategy (sanctions, geography) fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FailPolicy {
    /// Record a screening-failure finding that routes the check to review
    #[default]
    FailClosed,

    /// Skip the rule and record it as not evaluated
    FailOpen,
}

// Default value functions for serde
fn default_alert_threshold() -> u8 {
    60
}

fn default_retention() -> usize {
    DEFAULT_RETENTION
}

fn default_checked_by() -> String {
    "system".to_string()
}

fn default_external_timeout_ms() -> u64 {
    500
}

fn default_screening_failure_weight() -> u32 {
    75
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        Self {
            kyc: KycRules::default(),
            aml: AmlRules::default(),
            alert_threshold: default_alert_threshold(),
            retention: default_retention(),
            checked_by: default_checked_by(),
            external_timeout_ms: default_external_timeout_ms(),
            screening_fail_policy: FailPolicy::default(),
            screening_failure_weight: default_screening_failure_weight(),
        }
    }
}

impl ComplianceConfig {
    /// Load and validate configuration from a JSON file
    pub fn from_file(path: &Path) -> ComplianceResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the engine cannot honor
    pub fn validate(&self) -> ComplianceResult<()> {
        if self.alert_threshold > 100 {
            return Err(ComplianceError::ConfigError(format!(
                "alert_threshold must be within 0..=100, got {}",
                self.alert_threshold
            )));
        }
        if self.retention == 0 {
            return Err(ComplianceError::ConfigError(
                "retention must be at least 1".to_string(),
            ));
        }
        if self.aml.structuring_floor >= self.aml.structuring_ceiling {
            return Err(ComplianceError::ConfigError(format!(
                "structuring_floor {} must be below structuring_ceiling {}",
                self.aml.structuring_floor, self.aml.structuring_ceiling
            )));
        }
        if self.aml.round_amount_unit.is_zero() {
            return Err(ComplianceError::ConfigError(
                "round_amount_unit must not be zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Get external timeout as Duration
    pub fn external_timeout(&self) -> Duration {
        Duration::from_millis(self.external_timeout_ms)
    }
}
