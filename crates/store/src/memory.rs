//! In-memory repository (volatile, single process)

use vigil_core::{AmlAlert, ComplianceCheck};

use crate::capped::{CappedLog, DEFAULT_RETENTION};
use crate::error::StoreResult;
use crate::repository::{ComplianceRepository, Record};

/// Repository holding the last `cap` checks and alerts in memory
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    checks: CappedLog<ComplianceCheck>,
    alerts: CappedLog<AmlAlert>,
}

impl InMemoryRepository {
    /// Create a repository with the default retention (100 per kind)
    pub fn new() -> Self {
        Self::with_retention(DEFAULT_RETENTION)
    }

    /// Create a repository with a custom retention cap
    pub fn with_retention(cap: usize) -> Self {
        Self {
            checks: CappedLog::new(cap),
            alerts: CappedLog::new(cap),
        }
    }
}

impl ComplianceRepository for InMemoryRepository {
    fn append_check(&mut self, check: ComplianceCheck) -> StoreResult<()> {
        if let Some(evicted) = self.checks.push(check) {
            tracing::debug!(id = evicted.id(), "Evicted oldest check");
        }
        Ok(())
    }

    fn recent_checks(&self, limit: Option<usize>) -> StoreResult<Vec<ComplianceCheck>> {
        Ok(self.checks.recent(limit))
    }

    fn find_check(&self, id: &str) -> StoreResult<Option<ComplianceCheck>> {
        Ok(self.checks.find(id).cloned())
    }

    fn replace_check(&mut self, check: ComplianceCheck) -> StoreResult<()> {
        self.checks.replace(check)
    }

    fn append_alert(&mut self, alert: AmlAlert) -> StoreResult<()> {
        if let Some(evicted) = self.alerts.push(alert) {
            tracing::debug!(id = evicted.id(), "Evicted oldest alert");
        }
        Ok(())
    }

    fn recent_alerts(&self, limit: Option<usize>) -> StoreResult<Vec<AmlAlert>> {
        Ok(self.alerts.recent(limit))
    }

    fn find_alert(&self, id: &str) -> StoreResult<Option<AmlAlert>> {
        Ok(self.alerts.find(id).cloned())
    }

    fn replace_alert(&mut self, alert: AmlAlert) -> StoreResult<()> {
        self.alerts.replace(alert)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Utc;
    use vigil_core::{AlertStatus, CheckStatus, CheckType, RiskLevel};

    pub(crate) fn check(n: usize) -> ComplianceCheck {
        ComplianceCheck {
            id: format!("CHK-{:03}", n),
            subject_id: "USER-001".to_string(),
            check_type: CheckType::Kyc,
            status: CheckStatus::Approved,
            risk_score: 0,
            risk_level: RiskLevel::Low,
            findings: vec![],
            narrative: "No significant risk indicators identified. Low risk profile.".to_string(),
            recommendations: vec![],
            skipped_rules: vec![],
            checked_at: Utc::now(),
            checked_by: "system".to_string(),
            reviewed_by: None,
            reviewed_at: None,
            review_notes: None,
        }
    }

    pub(crate) fn alert(n: usize) -> AmlAlert {
        AmlAlert {
            id: format!("ALERT-{:03}", n),
            check_id: format!("CHK-{:03}", n),
            subject_id: "USER-001".to_string(),
            alert_type: "structuring".to_string(),
            severity: RiskLevel::High,
            description: "AML check scored 65".to_string(),
            details: "Potential structuring".to_string(),
            triggered_at: Utc::now(),
            status: AlertStatus::Open,
            resolution: None,
            updated_by: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_retention_after_101_checks() {
        let mut repo = InMemoryRepository::new();
        for n in 0..101 {
            repo.append_check(check(n)).unwrap();
        }

        let checks = repo.recent_checks(None).unwrap();
        assert_eq!(checks.len(), 100);
        assert_eq!(checks.first().unwrap().id, "CHK-001");
        assert_eq!(checks.last().unwrap().id, "CHK-100");
        assert!(repo.find_check("CHK-000").unwrap().is_none());
    }

    #[test]
    fn test_kinds_are_capped_independently() {
        let mut repo = InMemoryRepository::with_retention(3);
        for n in 0..5 {
            repo.append_check(check(n)).unwrap();
        }
        repo.append_alert(alert(1)).unwrap();

        assert_eq!(repo.recent_checks(None).unwrap().len(), 3);
        assert_eq!(repo.recent_alerts(None).unwrap().len(), 1);
    }

    #[test]
    fn test_replace_alert() {
        let mut repo = InMemoryRepository::new();
        repo.append_alert(alert(1)).unwrap();

        let mut updated = alert(1);
        updated.status = AlertStatus::Investigating;
        repo.replace_alert(updated).unwrap();

        let stored = repo.find_alert("ALERT-001").unwrap().unwrap();
        assert_eq!(stored.status, AlertStatus::Investigating);
        assert!(repo.replace_alert(alert(2)).is_err());
    }
}
