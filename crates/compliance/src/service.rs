//! Compliance Service - Main orchestrator
//!
//! Coordinates rule evaluation, score aggregation, repository writes, alert
//! emission and the manual review workflow.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use vigil_core::{
    AlertStatus, AmlAlert, CheckStatus, CheckType, ComplianceCheck, Finding, FindingCategory,
    KycProfile, ReviewDecision, RiskLevel, TransactionRecord,
};
use vigil_rules::screening::{GEOGRAPHIC_RULE, SANCTIONS_RULE};
use vigil_rules::{
    aggregate, aml, kyc, Assessment, GeoRiskProvider, RuleOutcome, SanctionsScreener, Screening,
    ScreeningError, ScreeningResult, StaticCountryList, UnimplementedGeoRisk,
};
use vigil_store::{ComplianceRepository, InMemoryRepository};

use crate::alert::maybe_emit_alert;
use crate::config::{ComplianceConfig, FailPolicy};
use crate::error::{ComplianceError, ComplianceResult};
use crate::stats::ComplianceStats;

/// Result of one evaluation call
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    /// The recorded check
    pub check: ComplianceCheck,
    /// Alert emitted alongside the check, if any
    pub alert: Option<AmlAlert>,
}

/// Outcome of one screening strategy after timeout and fail policy
enum Screened {
    Outcome(RuleOutcome),
    Skipped(String),
}

/// Main Compliance Service
///
/// Orchestrates:
/// - Local rule evaluation (sync)
/// - Screening strategies (async, bounded by the configured timeout)
/// - Score aggregation
/// - Repository writes and alert emission
pub struct ComplianceService {
    /// Configuration (thresholds, etc.)
    config: ComplianceConfig,
    /// Check and alert storage
    repository: Box<dyn ComplianceRepository>,
    /// Sanctions screening strategy
    sanctions: Arc<dyn SanctionsScreener>,
    /// Geographic risk strategy
    geo_risk: Arc<dyn GeoRiskProvider>,
}

impl ComplianceService {
    /// Create a service with the default strategies: the configured
    /// nationality denylist and no geographic data source
    pub fn new(config: ComplianceConfig, repository: Box<dyn ComplianceRepository>) -> Self {
        let sanctions = StaticCountryList::new(
            &config.kyc.sanctioned_countries,
            config.kyc.sanctions_weight,
        );
        Self {
            config,
            repository,
            sanctions: Arc::new(sanctions),
            geo_risk: Arc::new(UnimplementedGeoRisk),
        }
    }

    /// Create a service with an in-memory repository (for testing)
    pub fn in_memory() -> Self {
        let config = ComplianceConfig::default();
        let repository = InMemoryRepository::with_retention(config.retention);
        Self::new(config, Box::new(repository))
    }

    /// Replace the sanctions screening strategy
    pub fn with_sanctions_screener(mut self, screener: Arc<dyn SanctionsScreener>) -> Self {
        self.sanctions = screener;
        self
    }

    /// Replace the geographic risk strategy
    pub fn with_geo_risk_provider(mut self, provider: Arc<dyn GeoRiskProvider>) -> Self {
        self.geo_risk = provider;
        self
    }

    // === Evaluation ===

    /// Run a KYC check on a profile and record it
    pub async fn check_kyc(&mut self, subject_id: &str, profile: &KycProfile) -> ComplianceResult<CheckOutcome> {
        self.check_kyc_at(subject_id, profile, Utc::now()).await
    }

    /// Run a KYC check as of `now` (dates are compared against `now`'s day)
    pub async fn check_kyc_at(
        &mut self,
        subject_id: &str,
        profile: &KycProfile,
        now: DateTime<Utc>,
    ) -> ComplianceResult<CheckOutcome> {
        let mut outcomes = kyc::evaluate_profile(profile, now.date_naive(), &self.config.kyc);
        let mut skipped = Vec::new();

        let screener = Arc::clone(&self.sanctions);
        let screening = screener.screen(&profile.full_name, profile.nationality.as_deref());
        match self.run_screening(SANCTIONS_RULE, screener.name(), screening).await {
            Screened::Outcome(outcome) => outcomes.push(outcome),
            Screened::Skipped(rule) => skipped.push(rule),
        }

        let assessment = aggregate(outcomes);
        self.record(subject_id, CheckType::Kyc, assessment, skipped, now)
    }

    /// Run an AML check on a subject's transactions and record it
    pub async fn check_aml(
        &mut self,
        subject_id: &str,
        transactions: &[TransactionRecord],
    ) -> ComplianceResult<CheckOutcome> {
        self.check_aml_at(subject_id, transactions, Utc::now()).await
    }

    /// Run an AML check stamped with `now`
    pub async fn check_aml_at(
        &mut self,
        subject_id: &str,
        transactions: &[TransactionRecord],
        now: DateTime<Utc>,
    ) -> ComplianceResult<CheckOutcome> {
        let mut outcomes = aml::evaluate_transactions(transactions, &self.config.aml);
        let mut skipped = Vec::new();

        let provider = Arc::clone(&self.geo_risk);
        let assessment_fut = provider.assess(subject_id, transactions);
        match self.run_screening(GEOGRAPHIC_RULE, provider.name(), assessment_fut).await {
            Screened::Outcome(outcome) => outcomes.push(outcome),
            Screened::Skipped(rule) => skipped.push(rule),
        }

        let assessment = aggregate(outcomes);
        self.record(subject_id, CheckType::Aml, assessment, skipped, now)
    }

    /// Await a screening strategy under the configured timeout and apply
    /// the fail policy to errors
    async fn run_screening<F>(&self, rule: &str, strategy: &str, screening: F) -> Screened
    where
        F: Future<Output = ScreeningResult<Screening>>,
    {
        let result = match tokio::time::timeout(self.config.external_timeout(), screening).await {
            Ok(result) => result,
            Err(_) => Err(ScreeningError::Timeout(self.config.external_timeout_ms)),
        };

        match result {
            Ok(Screening::Evaluated(outcome)) => Screened::Outcome(outcome),
            Ok(Screening::NotEvaluated { rule, reason }) => {
                tracing::debug!(rule = %rule, strategy, reason = %reason, "Rule not evaluated");
                Screened::Skipped(rule)
            }
            Err(e) => {
                tracing::error!(rule, strategy, error = %e, "Screening failed");

                match self.config.screening_fail_policy {
                    FailPolicy::FailClosed => {
                        let finding = Finding::new(
                            FindingCategory::ScreeningFailure,
                            RiskLevel::High,
                            format!("{} could not be completed: {}", rule, e),
                            "Complete the screening manually before approving",
                        )
                        .with_evidence(format!("Strategy: {}", strategy));
                        Screened::Outcome(
                            RuleOutcome::clear(rule).with(finding, self.config.screening_failure_weight),
                        )
                    }
                    FailPolicy::FailOpen => {
                        tracing::warn!(rule, strategy, "FailOpen: continuing without screening result");
                        Screened::Skipped(rule.to_string())
                    }
                }
            }
        }
    }

    /// Build the check record, store it, and emit an alert if applicable
    fn record(
        &mut self,
        subject_id: &str,
        check_type: CheckType,
        assessment: Assessment,
        skipped_rules: Vec<String>,
        now: DateTime<Utc>,
    ) -> ComplianceResult<CheckOutcome> {
        let check = ComplianceCheck {
            id: uuid::Uuid::new_v4().to_string(),
            subject_id: subject_id.to_string(),
            check_type,
            status: assessment.status,
            risk_score: assessment.score,
            risk_level: assessment.risk_level,
            findings: assessment.findings,
            narrative: assessment.narrative,
            recommendations: assessment.recommendations,
            skipped_rules,
            checked_at: now,
            checked_by: self.config.checked_by.clone(),
            reviewed_by: None,
            reviewed_at: None,
            review_notes: None,
        };

        self.repository.append_check(check.clone())?;
        tracing::info!(
            check_id = %check.id,
            subject = %check.subject_id,
            check_type = %check.check_type,
            score = check.risk_score,
            level = %check.risk_level,
            status = %check.status,
            "Compliance check recorded"
        );

        let alert = maybe_emit_alert(&check, self.config.alert_threshold, now);
        if let Some(ref alert) = alert {
            self.repository.append_alert(alert.clone())?;
            tracing::warn!(
                alert_id = %alert.id,
                subject = %alert.subject_id,
                alert_type = %alert.alert_type,
                severity = %alert.severity,
                "AML alert raised"
            );
        }

        Ok(CheckOutcome { check, alert })
    }

    // === Review workflow ===

    /// Record a manual review decision on a check
    pub fn review_check(
        &mut self,
        check_id: &str,
        decision: ReviewDecision,
        reviewer_id: &str,
        notes: &str,
    ) -> ComplianceResult<ComplianceCheck> {
        self.review_check_at(check_id, decision, reviewer_id, notes, Utc::now())
    }

    /// Record a manual review decision stamped with `now`
    pub fn review_check_at(
        &mut self,
        check_id: &str,
        decision: ReviewDecision,
        reviewer_id: &str,
        notes: &str,
        now: DateTime<Utc>,
    ) -> ComplianceResult<ComplianceCheck> {
        let mut check = self
            .repository
            .find_check(check_id)?
            .ok_or_else(|| ComplianceError::CheckNotFound(check_id.to_string()))?;

        if check.is_reviewed() {
            return Err(ComplianceError::CheckAlreadyReviewed(check_id.to_string()));
        }

        check.status = CheckStatus::from(decision);
        check.reviewed_by = Some(reviewer_id.to_string());
        check.reviewed_at = Some(now);
        check.review_notes = (!notes.is_empty()).then(|| notes.to_string());

        self.repository.replace_check(check.clone())?;
        tracing::info!(check_id, reviewer = reviewer_id, decision = %decision, "Check reviewed");
        Ok(check)
    }

    /// Move an alert through the investigation workflow
    ///
    /// Closed alerts (resolved, false positive) cannot change, and no alert
    /// can be moved back to open.
    pub fn update_alert(
        &mut self,
        alert_id: &str,
        status: AlertStatus,
        actor: &str,
        resolution: Option<&str>,
    ) -> ComplianceResult<AmlAlert> {
        self.update_alert_at(alert_id, status, actor, resolution, Utc::now())
    }

    /// Move an alert through the investigation workflow, stamped with `now`
    pub fn update_alert_at(
        &mut self,
        alert_id: &str,
        status: AlertStatus,
        actor: &str,
        resolution: Option<&str>,
        now: DateTime<Utc>,
    ) -> ComplianceResult<AmlAlert> {
        let mut alert = self
            .repository
            .find_alert(alert_id)?
            .ok_or_else(|| ComplianceError::AlertNotFound(alert_id.to_string()))?;

        if alert.status.is_closed() {
            return Err(ComplianceError::AlertClosed(alert_id.to_string()));
        }
        if status == AlertStatus::Open {
            return Err(ComplianceError::InvalidAlertTransition {
                id: alert_id.to_string(),
                from: alert.status,
                to: status,
            });
        }

        let from = alert.status;
        alert.status = status;
        alert.updated_by = Some(actor.to_string());
        alert.updated_at = Some(now);
        if let Some(resolution) = resolution {
            alert.resolution = Some(resolution.to_string());
        }

        self.repository.replace_alert(alert.clone())?;
        tracing::info!(alert_id, actor, from = %from, to = %status, "Alert updated");
        Ok(alert)
    }

    // === Queries ===

    /// Most recent checks, oldest first
    pub fn recent_checks(&self, limit: Option<usize>) -> ComplianceResult<Vec<ComplianceCheck>> {
        Ok(self.repository.recent_checks(limit)?)
    }

    /// Retained checks for one subject, oldest first
    pub fn checks_for_subject(&self, subject_id: &str) -> ComplianceResult<Vec<ComplianceCheck>> {
        Ok(self
            .repository
            .recent_checks(None)?
            .into_iter()
            .filter(|c| c.subject_id == subject_id)
            .collect())
    }

    /// Most recent alerts, oldest first
    pub fn recent_alerts(&self, limit: Option<usize>) -> ComplianceResult<Vec<AmlAlert>> {
        Ok(self.repository.recent_alerts(limit)?)
    }

    /// Retained alerts with the given status, oldest first
    pub fn alerts_with_status(&self, status: AlertStatus) -> ComplianceResult<Vec<AmlAlert>> {
        Ok(self
            .repository
            .recent_alerts(None)?
            .into_iter()
            .filter(|a| a.status == status)
            .collect())
    }

    /// Counters over all retained records
    pub fn stats(&self) -> ComplianceResult<ComplianceStats> {
        let checks = self.repository.recent_checks(None)?;
        let alerts = self.repository.recent_alerts(None)?;
        Ok(ComplianceStats::compute(&checks, &alerts))
    }

    /// Get the current configuration
    pub fn config(&self) -> &ComplianceConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
    }

    fn clean_profile() -> KycProfile {
        KycProfile {
            full_name: "Jane Doe".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1988, 4, 2),
            nationality: Some("Canada".to_string()),
            address: "221B Baker Street, London NW1 6XE".to_string(),
            document_type: Some("passport".to_string()),
            document_number: Some("P1234567".to_string()),
            document_expiry: NaiveDate::from_ymd_opt(2031, 1, 1),
            document_images: vec!["passport-front.jpg".to_string()],
        }
    }

    fn txs(amounts: &[Decimal]) -> Vec<TransactionRecord> {
        amounts
            .iter()
            .map(|a| TransactionRecord::new(*a, now(), "deposit"))
            .collect()
    }

    #[tokio::test]
    async fn test_clean_kyc_is_approved() {
        let mut service = ComplianceService::in_memory();
        let outcome = service.check_kyc_at("USER-001", &clean_profile(), now()).await.unwrap();

        assert_eq!(outcome.check.risk_score, 0);
        assert_eq!(outcome.check.status, CheckStatus::Approved);
        assert!(outcome.check.findings.is_empty());
        assert!(outcome.check.skipped_rules.is_empty());
        assert!(outcome.alert.is_none());
        assert_eq!(outcome.check.checked_by, "system");
    }

    #[tokio::test]
    async fn test_sanctioned_kyc_requires_review() {
        let mut service = ComplianceService::in_memory();
        let mut profile = clean_profile();
        profile.nationality = Some("iran".to_string());

        let outcome = service.check_kyc_at("USER-002", &profile, now()).await.unwrap();

        assert_eq!(outcome.check.risk_score, 80);
        assert_eq!(outcome.check.risk_level, RiskLevel::Critical);
        assert_eq!(outcome.check.status, CheckStatus::ReviewRequired);
        // KYC checks never alert
        assert!(outcome.alert.is_none());
        assert!(service.recent_alerts(None).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_aml_records_skipped_geographic_rule() {
        let mut service = ComplianceService::in_memory();
        let outcome = service.check_aml_at("USER-003", &txs(&[dec!(120)]), now()).await.unwrap();

        assert_eq!(outcome.check.skipped_rules, vec![GEOGRAPHIC_RULE.to_string()]);
        assert_eq!(outcome.check.risk_score, 0);
    }

    #[tokio::test]
    async fn test_aml_alert_above_threshold() {
        let mut service = ComplianceService::in_memory();
        // Structuring (50) + volume (25) = 75
        let mut amounts = vec![dec!(9500), dec!(9600), dec!(9700)];
        amounts.push(dec!(1000001));

        let outcome = service.check_aml_at("USER-004", &txs(&amounts), now()).await.unwrap();

        assert_eq!(outcome.check.risk_score, 75);
        let alert = outcome.alert.expect("alert expected above 60");
        assert_eq!(alert.check_id, outcome.check.id);
        assert_eq!(alert.severity, RiskLevel::High);
        assert_eq!(service.recent_alerts(None).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_review_check() {
        let mut service = ComplianceService::in_memory();
        let outcome = service.check_kyc_at("USER-005", &KycProfile::default(), now()).await.unwrap();

        let reviewed = service
            .review_check(&outcome.check.id, ReviewDecision::Rejected, "OFFICER-001", "No documents")
            .unwrap();

        assert_eq!(reviewed.status, CheckStatus::Rejected);
        assert_eq!(reviewed.reviewed_by.as_deref(), Some("OFFICER-001"));
        assert_eq!(reviewed.review_notes.as_deref(), Some("No documents"));
        assert!(reviewed.reviewed_at.is_some());

        let again = service.review_check(&outcome.check.id, ReviewDecision::Approved, "OFFICER-002", "");
        assert!(matches!(again, Err(ComplianceError::CheckAlreadyReviewed(_))));

        let missing = service.review_check("CHK-404", ReviewDecision::Approved, "OFFICER-001", "");
        assert!(matches!(missing, Err(ComplianceError::CheckNotFound(_))));
    }

    struct HighRiskRegion;

    #[async_trait::async_trait]
    impl GeoRiskProvider for HighRiskRegion {
        fn name(&self) -> &str {
            "high_risk_region"
        }

        async fn assess(
            &self,
            _subject_id: &str,
            transactions: &[TransactionRecord],
        ) -> ScreeningResult<Screening> {
            let finding = Finding::new(
                FindingCategory::Geographic,
                RiskLevel::High,
                "Transactions routed through a high-risk jurisdiction",
                "Apply enhanced due diligence",
            )
            .with_evidence(format!("{} transactions", transactions.len()));
            Ok(Screening::Evaluated(RuleOutcome::clear(GEOGRAPHIC_RULE).with(finding, 30)))
        }
    }

    #[tokio::test]
    async fn test_custom_geo_provider_contributes() {
        let mut service = ComplianceService::in_memory().with_geo_risk_provider(Arc::new(HighRiskRegion));
        let outcome = service.check_aml_at("USER-006", &txs(&[dec!(120)]), now()).await.unwrap();

        assert!(outcome.check.skipped_rules.is_empty());
        assert_eq!(outcome.check.risk_score, 30);
        assert_eq!(outcome.check.findings[0].category, FindingCategory::Geographic);
    }

    #[test]
    fn test_config_access() {
        let service = ComplianceService::in_memory();
        assert_eq!(service.config().alert_threshold, 60);
    }
}
