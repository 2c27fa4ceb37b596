//! CLI commands

use anyhow::Context;
use serde::Serialize;
use std::path::Path;
use vigil_compliance::{CheckOutcome, ComplianceConfig, ComplianceService};
use vigil_core::{AlertStatus, KycProfile, ReviewDecision, TransactionRecord};

fn print_json<T: Serialize>(value: &T) -> Result<(), anyhow::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, anyhow::Error> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

fn print_outcome(outcome: &CheckOutcome) -> Result<(), anyhow::Error> {
    print_json(&outcome.check)?;

    let check = &outcome.check;
    eprintln!(
        "{} check {} for {}: score {} ({}), status {}",
        check.check_type, check.id, check.subject_id, check.risk_score, check.risk_level, check.status
    );
    if let Some(alert) = &outcome.alert {
        eprintln!("⚠️  Alert {} raised: {} ({})", alert.id, alert.alert_type, alert.severity);
    }
    Ok(())
}

/// Run a KYC check on a profile file
pub async fn kyc(service: &mut ComplianceService, subject_id: &str, profile: &Path) -> Result<(), anyhow::Error> {
    let profile: KycProfile = read_json(profile)?;
    let outcome = service.check_kyc(subject_id, &profile).await?;
    print_outcome(&outcome)
}

/// Run an AML check on a transactions file
pub async fn aml(
    service: &mut ComplianceService,
    subject_id: &str,
    transactions: &Path,
) -> Result<(), anyhow::Error> {
    let transactions: Vec<TransactionRecord> = read_json(transactions)?;
    let outcome = service.check_aml(subject_id, &transactions).await?;
    print_outcome(&outcome)
}

/// List recent checks, optionally for one subject
pub fn checks(service: &ComplianceService, subject_id: Option<&str>, limit: usize) -> Result<(), anyhow::Error> {
    let mut checks = match subject_id {
        Some(subject_id) => service.checks_for_subject(subject_id)?,
        None => service.recent_checks(None)?,
    };
    let skip = checks.len().saturating_sub(limit);
    checks.drain(..skip);

    print_json(&checks)
}

/// List recent alerts, optionally with one status
pub fn alerts(service: &ComplianceService, status: Option<AlertStatus>, limit: usize) -> Result<(), anyhow::Error> {
    let mut alerts = match status {
        Some(status) => service.alerts_with_status(status)?,
        None => service.recent_alerts(None)?,
    };
    let skip = alerts.len().saturating_sub(limit);
    alerts.drain(..skip);

    print_json(&alerts)
}

/// Record a review decision
pub fn review(
    service: &mut ComplianceService,
    check_id: &str,
    decision: ReviewDecision,
    reviewer_id: &str,
    notes: &str,
) -> Result<(), anyhow::Error> {
    let check = service.review_check(check_id, decision, reviewer_id, notes)?;

    println!("✅ Check {} marked {} by {}", check.id, check.status, reviewer_id);
    Ok(())
}

/// Update an alert's status
pub fn update_alert(
    service: &mut ComplianceService,
    alert_id: &str,
    status: AlertStatus,
    actor: &str,
    resolution: Option<&str>,
) -> Result<(), anyhow::Error> {
    let alert = service.update_alert(alert_id, status, actor, resolution)?;

    println!("✅ Alert {} is now {}", alert.id, alert.status);
    Ok(())
}

/// Show dashboard counters
pub fn stats(service: &ComplianceService) -> Result<(), anyhow::Error> {
    print_json(&service.stats()?)
}

/// Print the effective configuration
pub fn show_config(config: &ComplianceConfig) -> Result<(), anyhow::Error> {
    print_json(config)
}
