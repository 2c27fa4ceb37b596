//! AML alert emitter

use chrono::{DateTime, Utc};
use vigil_core::{AlertStatus, AmlAlert, CheckType, ComplianceCheck, RiskLevel};

/// Build an alert for an AML check scoring strictly above `threshold`
///
/// KYC checks never produce an alert, whatever their score.
pub fn maybe_emit_alert(check: &ComplianceCheck, threshold: u8, now: DateTime<Utc>) -> Option<AmlAlert> {
    if check.check_type != CheckType::Aml || check.risk_score <= threshold {
        return None;
    }

    let alert_type = check
        .most_severe_finding()
        .map(|f| f.category.to_string())
        .unwrap_or_else(|| "aml_risk".to_string());

    let details = check
        .findings
        .iter()
        .map(|f| f.description.as_str())
        .collect::<Vec<_>>()
        .join("; ");

    Some(AmlAlert {
        id: uuid::Uuid::new_v4().to_string(),
        check_id: check.id.clone(),
        subject_id: check.subject_id.clone(),
        alert_type,
        severity: RiskLevel::from_score(check.risk_score),
        description: format!(
            "AML check for {} scored {} ({} risk)",
            check.subject_id, check.risk_score, check.risk_level
        ),
        details,
        triggered_at: now,
        status: AlertStatus::Open,
        resolution: None,
        updated_by: None,
        updated_at: None,
    })
}
