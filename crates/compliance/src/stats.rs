//! Dashboard counters over the retained records

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use vigil_core::{AmlAlert, CheckStatus, CheckType, ComplianceCheck, RiskLevel};

/// Summary of the retained checks and alerts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplianceStats {
    pub total_checks: usize,
    pub kyc_checks: usize,
    pub aml_checks: usize,
    /// Count per check status (every status present, possibly zero)
    pub by_status: BTreeMap<String, usize>,
    /// Count per risk level (every level present, possibly zero)
    pub by_risk_level: BTreeMap<String, usize>,
    /// Mean risk score, 0.0 without checks
    pub average_score: f64,
    /// Checks still waiting for a reviewer
    pub awaiting_review: usize,
    pub total_alerts: usize,
    /// Alerts not yet resolved or dismissed
    pub open_alerts: usize,
}

impl ComplianceStats {
    pub fn compute(checks: &[ComplianceCheck], alerts: &[AmlAlert]) -> Self {
        let mut by_status: BTreeMap<String, usize> =
            CheckStatus::ALL.iter().map(|s| (s.to_string(), 0)).collect();
        let mut by_risk_level: BTreeMap<String, usize> =
            RiskLevel::ALL.iter().map(|l| (l.to_string(), 0)).collect();

        for check in checks {
            *by_status.entry(check.status.to_string()).or_default() += 1;
            *by_risk_level.entry(check.risk_level.to_string()).or_default() += 1;
        }

        let total_score: u64 = checks.iter().map(|c| c.risk_score as u64).sum();
        let average_score = if checks.is_empty() {
            0.0
        } else {
            total_score as f64 / checks.len() as f64
        };

        Self {
            total_checks: checks.len(),
            kyc_checks: checks.iter().filter(|c| c.check_type == CheckType::Kyc).count(),
            aml_checks: checks.iter().filter(|c| c.check_type == CheckType::Aml).count(),
            by_status,
            by_risk_level,
            average_score,
            awaiting_review: checks
                .iter()
                .filter(|c| {
                    !c.is_reviewed()
                        && matches!(c.status, CheckStatus::Pending | CheckStatus::ReviewRequired)
                })
                .count(),
            total_alerts: alerts.len(),
            open_alerts: alerts.iter().filter(|a| !a.status.is_closed()).count(),
        }
    }
}
